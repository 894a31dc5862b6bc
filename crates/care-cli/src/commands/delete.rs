use anyhow::Result;
use care_core::models::DeleteScope;
use care_core::repository::Repository;
use uuid::Uuid;

pub async fn delete_occurrence(repo: &impl Repository, id: Uuid, scope: DeleteScope) -> Result<()> {
    let deleted = repo.delete_with_scope(id, scope).await?;
    println!("Deleted {} occurrence(s).", deleted);
    Ok(())
}
