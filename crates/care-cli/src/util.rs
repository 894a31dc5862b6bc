use anyhow::{anyhow, Result};
use care_core::error::CoreError;
use care_core::repository::Repository;
use uuid::Uuid;

/// Length of the id prefix printed in tables.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &Uuid) -> String {
    let simple = id.simple().to_string();
    simple[..SHORT_ID_LEN].to_string()
}

pub async fn resolve_occurrence_id(repo: &impl Repository, short_id: &str) -> Result<Uuid> {
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    if !short_id.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "'{}' is not a hexadecimal id",
            short_id
        ))));
    }
    let occurrences = repo.find_occurrences_by_short_id_prefix(short_id).await?;
    if occurrences.len() == 1 {
        Ok(occurrences[0].id)
    } else if occurrences.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No occurrence found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let candidates: Vec<(String, String)> = occurrences
            .into_iter()
            .map(|o| (o.id.to_string(), format!("{} {}", o.date, o.what)))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(candidates)))
    }
}

pub async fn resolve_occurrence_ids(repo: &impl Repository, short_ids: &[String]) -> Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(short_ids.len());
    for short_id in short_ids {
        ids.push(resolve_occurrence_id(repo, short_id).await?);
    }
    Ok(ids)
}
