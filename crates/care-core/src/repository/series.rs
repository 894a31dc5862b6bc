use crate::error::CoreError;
use crate::models::{Occurrence, RecurrenceKind};
use crate::recurrence::SeriesDates;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// What a reconcile pass did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncSummary {
    /// Key the base carries after the pass; `None` when the series was cleared.
    pub series_id: Option<Uuid>,
    pub pruned: u64,
    pub generated: u64,
}

#[async_trait]
impl super::SeriesRepository for SqliteRepository {
    #[instrument(skip(self, base), fields(base_id = %base.id))]
    async fn sync_recurrence_series(
        &self,
        base: &mut Occurrence,
        previous_series_id: Option<Uuid>,
    ) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;
        // work on a copy so the caller's value is untouched if the transaction fails
        let mut synced = base.clone();
        Self::sync_in_transaction(&mut tx, &mut synced, previous_series_id).await?;
        tx.commit().await?;

        *base = synced;
        Ok(())
    }

    async fn find_series_members(&self, series_id: Uuid) -> Result<Vec<Occurrence>, CoreError> {
        let members = sqlx::query_as(
            "SELECT * FROM occurrences WHERE series_id = $1 ORDER BY date, time, created_at",
        )
        .bind(series_id)
        .fetch_all(self.pool())
        .await?;
        Ok(members)
    }
}

impl SqliteRepository {
    /// Reconciles the series of `base` inside the caller's transaction.
    ///
    /// A base that does not repeat, has no end date, or ends before its own
    /// date takes the clearing path: every sibling under the previous key is
    /// deleted and the base loses its series fields. Otherwise all siblings
    /// are pruned and regenerated from the base, one per stepped date up to
    /// the end date. Generated rows start pending and unflagged.
    pub(crate) async fn sync_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        base: &mut Occurrence,
        previous_series_id: Option<Uuid>,
    ) -> Result<SyncSummary, CoreError> {
        let previous = previous_series_id.or(base.series_id);

        let until = match base.series_end_date {
            Some(until) if base.recurrence_kind.is_recurring() && until >= base.date => until,
            _ => return Self::clear_series_in_transaction(tx, base, previous).await,
        };

        let series_id = previous.unwrap_or_else(Uuid::now_v7);

        // siblings go first so the base's new date cannot collide with a stale row
        let pruned = Self::prune_siblings_in_transaction(tx, series_id, base.id).await?;

        base.series_id = Some(series_id);
        base.updated_at = Utc::now();
        Self::write_occurrence_in_transaction(tx, base).await?;

        let clones: Vec<Occurrence> = SeriesDates::new(base.date, base.recurrence_kind, until)
            .map(|date| base.clone_for_date(date))
            .collect();
        let generated = Self::insert_occurrences_in_transaction(tx, &clones).await?;

        if generated < clones.len() as u64 {
            debug!(
                %series_id,
                dropped = clones.len() as u64 - generated,
                "ignored generated occurrences that already existed"
            );
        }
        info!(%series_id, pruned, generated, kind = %base.recurrence_kind, "series regenerated");

        Ok(SyncSummary {
            series_id: Some(series_id),
            pruned,
            generated,
        })
    }

    async fn clear_series_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        base: &mut Occurrence,
        previous_series_id: Option<Uuid>,
    ) -> Result<SyncSummary, CoreError> {
        let pruned = match previous_series_id {
            Some(series_id) => Self::prune_siblings_in_transaction(tx, series_id, base.id).await?,
            None => 0,
        };

        if base.series_id.is_some()
            || base.recurrence_kind.is_recurring()
            || base.series_end_date.is_some()
        {
            base.series_id = None;
            base.recurrence_kind = RecurrenceKind::None;
            base.series_end_date = None;
            base.updated_at = Utc::now();
            Self::write_occurrence_in_transaction(tx, base).await?;
        }

        if pruned > 0 {
            info!(series_id = ?previous_series_id, pruned, "series cleared");
        }
        Ok(SyncSummary {
            series_id: None,
            pruned,
            generated: 0,
        })
    }

    async fn prune_siblings_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        series_id: Uuid,
        base_id: Uuid,
    ) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM occurrences WHERE series_id = $1 AND id != $2")
            .bind(series_id)
            .bind(base_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
