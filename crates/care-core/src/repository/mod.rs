use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    ActualTime, DeleteScope, NewOccurrence, Occurrence, OccurrenceStatus, UpdateOccurrence,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

pub mod deletion;
pub mod occurrences;
pub mod series;

/// Occurrence CRUD and per-occurrence state changes.
#[async_trait]
pub trait OccurrenceRepository {
    /// Persists a new occurrence and, when it repeats, materializes its series.
    async fn add_occurrence(&self, data: NewOccurrence) -> Result<Occurrence, CoreError>;
    async fn find_occurrence_by_id(&self, id: Uuid) -> Result<Option<Occurrence>, CoreError>;
    async fn find_occurrences_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Occurrence>, CoreError>;
    async fn find_occurrences_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Occurrence>, CoreError>;
    /// Applies an edit. Edits to the date, time or recurrence fields make the
    /// occurrence the base of its series and resync it.
    async fn update_occurrence(&self, id: Uuid, data: UpdateOccurrence) -> Result<Occurrence, CoreError>;
    async fn set_status(
        &self,
        id: Uuid,
        status: OccurrenceStatus,
        actual: Option<ActualTime>,
        now: NaiveDateTime,
    ) -> Result<Occurrence, CoreError>;
    async fn bulk_set_status(&self, ids: &[Uuid], status: OccurrenceStatus) -> Result<Vec<Uuid>, CoreError>;
    async fn reschedule(&self, id: Uuid, date: NaiveDate, time: Option<NaiveTime>) -> Result<Occurrence, CoreError>;
    async fn set_exception(&self, id: Uuid, is_exception: bool) -> Result<Occurrence, CoreError>;
}

/// Series reconciliation.
#[async_trait]
pub trait SeriesRepository {
    /// Reconciles every occurrence sharing the base's series key with the
    /// base's recurrence configuration, in one transaction.
    ///
    /// `previous_series_id` is the key the base carried before the edit that
    /// triggered the sync; it defaults to the base's own key.
    async fn sync_recurrence_series(
        &self,
        base: &mut Occurrence,
        previous_series_id: Option<Uuid>,
    ) -> Result<(), CoreError>;
    async fn find_series_members(&self, series_id: Uuid) -> Result<Vec<Occurrence>, CoreError>;
}

/// Deletion at the three series scopes. Every operation returns the number
/// of rows removed; a target that no longer exists yields 0.
#[async_trait]
pub trait DeletionRepository {
    async fn delete_single(&self, id: Uuid) -> Result<u64, CoreError>;
    async fn delete_from_here_forward(&self, id: Uuid) -> Result<u64, CoreError>;
    async fn delete_whole_series(&self, id: Uuid) -> Result<u64, CoreError>;
    async fn delete_with_scope(&self, id: Uuid, scope: DeleteScope) -> Result<u64, CoreError> {
        match scope {
            DeleteScope::Single => self.delete_single(id).await,
            DeleteScope::Future => self.delete_from_here_forward(id).await,
            DeleteScope::Series => self.delete_whole_series(id).await,
        }
    }
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository: OccurrenceRepository + SeriesRepository + DeletionRepository + Send + Sync {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
