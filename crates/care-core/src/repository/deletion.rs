use crate::error::CoreError;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

#[async_trait]
impl super::DeletionRepository for SqliteRepository {
    #[instrument(skip(self))]
    async fn delete_single(&self, id: Uuid) -> Result<u64, CoreError> {
        let mut tx = self.pool().begin().await?;
        let result = sqlx::query("DELETE FROM occurrences WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(deleted = result.rows_affected(), "single occurrence deleted");
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_from_here_forward(&self, id: Uuid) -> Result<u64, CoreError> {
        let mut tx = self.pool().begin().await?;

        let Some(target) = Self::find_occurrence_in_transaction(&mut tx, id).await? else {
            debug!("target already gone");
            return Ok(0);
        };

        let result = match target.series_id {
            // The target itself always goes. On its own date, timed siblings
            // go when they are not earlier; untimed siblings always go.
            Some(series_id) => {
                sqlx::query(
                    r#"DELETE FROM occurrences
                    WHERE id = $1
                       OR (series_id = $2
                           AND (date > $3
                                OR (date = $4 AND ($5 IS NULL OR time IS NULL OR time >= $6))))"#,
                )
                .bind(target.id)
                .bind(series_id)
                .bind(target.date)
                .bind(target.date)
                .bind(target.time)
                .bind(target.time)
                .execute(&mut *tx)
                .await?
            }
            None => {
                sqlx::query("DELETE FROM occurrences WHERE id = $1")
                    .bind(target.id)
                    .execute(&mut *tx)
                    .await?
            }
        };
        tx.commit().await?;

        debug!(series_id = ?target.series_id, deleted = result.rows_affected(), "deleted from here forward");
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_whole_series(&self, id: Uuid) -> Result<u64, CoreError> {
        let mut tx = self.pool().begin().await?;

        let Some(target) = Self::find_occurrence_in_transaction(&mut tx, id).await? else {
            debug!("target already gone");
            return Ok(0);
        };

        let result = sqlx::query("DELETE FROM occurrences WHERE id = $1 OR series_id = $2")
            .bind(target.id)
            .bind(target.series_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(series_id = ?target.series_id, deleted = result.rows_affected(), "series deleted");
        Ok(result.rows_affected())
    }
}
