use anyhow::Result;
use care_core::repository::Repository;

use crate::cli::ExceptionCommand;
use crate::util::resolve_occurrence_id;

pub async fn set_exception(repo: &impl Repository, command: ExceptionCommand) -> Result<()> {
    let id = resolve_occurrence_id(repo, &command.id).await?;
    let updated = repo.set_exception(id, command.on).await?;

    if updated.is_exception {
        println!("Flagged '{}' on {} as an exception", updated.what, updated.date);
    } else {
        println!("Cleared the exception flag on '{}' ({})", updated.what, updated.date);
    }
    Ok(())
}
