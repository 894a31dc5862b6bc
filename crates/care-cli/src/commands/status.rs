use anyhow::Result;
use care_core::models::ActualTime;
use care_core::repository::Repository;
use chrono::Local;
use owo_colors::OwoColorize;

use crate::cli::{BulkStatusCommand, StatusCommand};
use crate::parser::{parse_date_local, parse_time};
use crate::util::{resolve_occurrence_id, resolve_occurrence_ids};

pub async fn set_status(repo: &impl Repository, command: StatusCommand) -> Result<()> {
    let id = resolve_occurrence_id(repo, &command.id).await?;

    let actual = match (command.at_date, command.at_time) {
        (Some(date), Some(time)) => Some(ActualTime {
            date: parse_date_local(&date)?,
            time: parse_time(&time)?,
        }),
        _ => None,
    };

    let updated = repo
        .set_status(id, command.status, actual, Local::now().naive_local())
        .await?;

    println!(
        "{} '{}' on {} is now {}",
        "✓".green().bold(),
        updated.what,
        updated.date,
        updated.status
    );
    Ok(())
}

pub async fn bulk_set_status(repo: &impl Repository, command: BulkStatusCommand) -> Result<()> {
    let ids = resolve_occurrence_ids(repo, &command.ids).await?;
    let updated = repo.bulk_set_status(&ids, command.status).await?;

    println!(
        "{} Marked {} occurrence(s) {}",
        "✓".green().bold(),
        updated.len(),
        command.status
    );
    Ok(())
}
