use anyhow::{anyhow, Result};
use care_core::repository::Repository;

use crate::cli::ShowCommand;
use crate::util::resolve_occurrence_id;
use crate::views::table::display_occurrence_details;

pub async fn show_occurrence(repo: &impl Repository, command: ShowCommand) -> Result<()> {
    let id = resolve_occurrence_id(repo, &command.id).await?;
    let occurrence = repo
        .find_occurrence_by_id(id)
        .await?
        .ok_or_else(|| anyhow!("Occurrence not found"))?;

    display_occurrence_details(&occurrence);
    Ok(())
}
