use anyhow::{anyhow, Result};
use care_core::repository::Repository;

use crate::cli::SeriesCommand;
use crate::util::resolve_occurrence_id;
use crate::views::table::display_occurrences;

pub async fn show_series(repo: &impl Repository, command: SeriesCommand) -> Result<()> {
    let id = resolve_occurrence_id(repo, &command.id).await?;
    let occurrence = repo
        .find_occurrence_by_id(id)
        .await?
        .ok_or_else(|| anyhow!("Occurrence not found"))?;

    match occurrence.series_id {
        Some(series_id) => {
            let members = repo.find_series_members(series_id).await?;
            println!("Series {} ({} occurrences)", series_id, members.len());
            display_occurrences(&members);
        }
        None => {
            println!("'{}' on {} is not part of a series.", occurrence.what, occurrence.date);
        }
    }
    Ok(())
}
