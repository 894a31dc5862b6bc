use crate::util::short_id;
use care_core::models::{Occurrence, OccurrenceStatus};
use chrono::{Local, NaiveDate};
use comfy_table::{Attribute, Cell, Color, Row, Table};

pub fn display_occurrences(occurrences: &[Occurrence]) {
    if occurrences.is_empty() {
        println!("No occurrences found.");
        return;
    }
    println!("{}", occurrences_table(occurrences, Local::now().date_naive()));
}

/// Builds the listing table; `today` decides which pending rows are overdue.
pub fn occurrences_table(occurrences: &[Occurrence], today: NaiveDate) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Time", "Activity", "What", "Caregiver", "Status", "Repeats"]);

    for occurrence in occurrences {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&occurrence.id)));

        let date_cell = Cell::new(occurrence.date.format("%Y-%m-%d %a"));
        let date_cell = match occurrence.status {
            OccurrenceStatus::Pending if occurrence.date < today => date_cell.fg(Color::Red),
            OccurrenceStatus::Pending if occurrence.date == today => date_cell.fg(Color::Yellow),
            _ => date_cell,
        };
        row.add_cell(date_cell);

        row.add_cell(Cell::new(
            occurrence
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ));
        row.add_cell(Cell::new(occurrence.activity));

        let mut what = String::new();
        if occurrence.series_id.is_some() {
            what.push_str("↻ ");
        }
        what.push_str(&occurrence.what);
        if occurrence.is_exception {
            what.push_str(" ⚠");
        }
        let what_cell = match occurrence.status {
            OccurrenceStatus::Done => Cell::new(what).fg(Color::DarkGrey),
            OccurrenceStatus::Missed => Cell::new(what)
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey),
            OccurrenceStatus::Pending => Cell::new(what).add_attribute(Attribute::Bold),
        };
        row.add_cell(what_cell);

        row.add_cell(Cell::new(&occurrence.caregiver));

        let status_cell = Cell::new(occurrence.status);
        let status_cell = match occurrence.status {
            OccurrenceStatus::Done => status_cell.fg(Color::Green),
            OccurrenceStatus::Missed => status_cell.fg(Color::Red),
            OccurrenceStatus::Pending => status_cell,
        };
        row.add_cell(status_cell);

        row.add_cell(Cell::new(repeats_label(occurrence)));
        table.add_row(row);
    }

    table
}

pub fn display_occurrence_details(occurrence: &Occurrence) {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);

    let optional = |value: Option<String>| value.unwrap_or_else(|| "None".to_string());
    let rows: Vec<(&str, String)> = vec![
        ("ID", occurrence.id.to_string()),
        ("What", occurrence.what.clone()),
        ("Activity", occurrence.activity.to_string()),
        ("Date", occurrence.date.to_string()),
        ("Time", optional(occurrence.time.map(|t| t.format("%H:%M").to_string()))),
        ("Status", occurrence.status.to_string()),
        ("Caregiver", occurrence.caregiver.clone()),
        ("Description", optional(occurrence.description.clone())),
        ("Medication", optional(occurrence.medication.clone())),
        ("Capsules", optional(occurrence.capsule_quantity.map(|q| q.to_string()))),
        ("Trend", optional(occurrence.progress_trend.map(|t| t.to_string()))),
        ("Created by", optional(occurrence.created_by.clone())),
        ("Repeats", repeats_label(occurrence)),
        ("Series", optional(occurrence.series_id.map(|s| s.to_string()))),
        ("Exception", occurrence.is_exception.to_string()),
        ("Updated", occurrence.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    ];

    for (field, value) in rows {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
    }

    println!("{table}");
}

fn repeats_label(occurrence: &Occurrence) -> String {
    match (occurrence.recurrence_kind.is_recurring(), occurrence.series_end_date) {
        (true, Some(until)) => format!("{} until {}", occurrence.recurrence_kind, until),
        (true, None) => occurrence.recurrence_kind.to_string(),
        (false, _) => "-".to_string(),
    }
}
