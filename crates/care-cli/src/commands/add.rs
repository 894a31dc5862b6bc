use anyhow::{anyhow, Result};
use care_core::models::{NewOccurrence, RecurrenceKind};
use care_core::repository::Repository;
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::config::Config;
use crate::parser::{parse_date_local, parse_time};
use crate::util::short_id;

pub async fn add_occurrence(repo: &impl Repository, command: AddCommand, config: &Config) -> Result<()> {
    let caregiver = command
        .caregiver
        .or_else(|| config.default_caregiver.clone())
        .ok_or_else(|| anyhow!("A caregiver is required: pass --caregiver or set default_caregiver"))?;

    let data = NewOccurrence {
        activity: command.activity,
        what: command.what,
        description: command.description,
        caregiver,
        date: parse_date_local(&command.date)?,
        time: command.time.as_deref().map(parse_time).transpose()?,
        medication: command.medication,
        capsule_quantity: command.capsules,
        progress_trend: command.trend,
        created_by: command.created_by,
        recurrence_kind: command.every.unwrap_or(RecurrenceKind::None),
        series_end_date: command.until.as_deref().map(parse_date_local).transpose()?,
    };

    let added = repo.add_occurrence(data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    match added.series_id {
        Some(series_id) => {
            let members = repo.find_series_members(series_id).await?;
            println!(
                "{} Created {} series: {}",
                "✓".style(success_style),
                added.recurrence_kind,
                added.what.bright_white().bold()
            );
            println!(
                "  {} {} occurrences from {} to {}",
                "→".style(info_style),
                members.len(),
                added.date,
                added.series_end_date.map(|d| d.to_string()).unwrap_or_default()
            );
        }
        None => {
            println!(
                "{} Created occurrence: {}",
                "✓".style(success_style),
                added.what.bright_white().bold()
            );
        }
    }
    println!("  {} ID: {}", "→".style(info_style), short_id(&added.id).yellow());

    Ok(())
}
