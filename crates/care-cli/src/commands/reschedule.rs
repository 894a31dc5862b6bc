use anyhow::Result;
use care_core::repository::Repository;

use crate::cli::RescheduleCommand;
use crate::parser::{parse_date_local, parse_time};
use crate::util::resolve_occurrence_id;

pub async fn reschedule_occurrence(repo: &impl Repository, command: RescheduleCommand) -> Result<()> {
    let id = resolve_occurrence_id(repo, &command.id).await?;
    let date = parse_date_local(&command.date)?;
    let time = command.time.as_deref().map(parse_time).transpose()?;

    let moved = repo.reschedule(id, date, time).await?;

    match moved.time {
        Some(time) => println!("Moved '{}' to {} {}", moved.what, moved.date, time.format("%H:%M")),
        None => println!("Moved '{}' to {}", moved.what, moved.date),
    }
    Ok(())
}
