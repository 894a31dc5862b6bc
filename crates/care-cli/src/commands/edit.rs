use anyhow::Result;
use care_core::models::UpdateOccurrence;
use care_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::parser::{parse_date_local, parse_time};
use crate::util::resolve_occurrence_id;

/// Collapses a `--field` / `--field-clear` pair into the nested option the
/// core expects: `None` leaves the field alone, `Some(None)` clears it.
fn clearable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

pub async fn edit_occurrence(repo: &impl Repository, command: EditCommand) -> Result<()> {
    let id = resolve_occurrence_id(repo, &command.id).await?;

    let time = command.time.as_deref().map(parse_time).transpose()?;
    let until = command.until.as_deref().map(parse_date_local).transpose()?;

    let update = UpdateOccurrence {
        activity: command.activity,
        what: command.what,
        description: clearable(command.description, command.description_clear),
        caregiver: command.caregiver,
        medication: clearable(command.medication, command.medication_clear),
        capsule_quantity: clearable(command.capsules, command.capsules_clear),
        progress_trend: clearable(command.trend, command.trend_clear),
        date: command.date.as_deref().map(parse_date_local).transpose()?,
        time: clearable(time, command.time_clear),
        recurrence_kind: command.every,
        series_end_date: clearable(until, command.until_clear),
    };
    let resync = update.touches_recurrence();

    let updated = repo.update_occurrence(id, update).await?;

    println!("Updated occurrence '{}' on {}", updated.what, updated.date);
    if resync {
        match updated.series_id {
            Some(series_id) => {
                let members = repo.find_series_members(series_id).await?;
                println!(
                    "  {} Series regenerated: {} occurrences",
                    "↻".cyan(),
                    members.len()
                );
            }
            None => println!("  {} No longer repeats", "↻".cyan()),
        }
    }

    Ok(())
}
