use crate::error::CoreError;
use crate::models::{
    ActualTime, NewOccurrence, Occurrence, OccurrenceStatus, UpdateOccurrence,
};
use crate::recurrence::validate_recurrence;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::{QueryBuilder, Sqlite, Transaction};
use tracing::{debug, instrument};
use uuid::Uuid;

// SQLite caps bound parameters per statement; 18 columns * 40 rows stays under 999.
const INSERT_CHUNK_ROWS: usize = 40;

const INSERT_COLUMNS: &str = "INSERT OR IGNORE INTO occurrences (id, series_id, recurrence_kind, series_end_date, date, time, status, is_exception, activity, what, description, caregiver, medication, capsule_quantity, progress_trend, created_by, created_at, updated_at) ";

#[async_trait]
impl super::OccurrenceRepository for SqliteRepository {
    #[instrument(skip(self, data), fields(activity = %data.activity, recurrence = %data.recurrence_kind))]
    async fn add_occurrence(&self, data: NewOccurrence) -> Result<Occurrence, CoreError> {
        validate_payload(&data.what, &data.caregiver, data.capsule_quantity)?;
        validate_recurrence(data.recurrence_kind, data.series_end_date, data.date)?;

        let now = Utc::now();
        let mut occurrence = Occurrence {
            id: Uuid::new_v4(),
            series_id: None,
            recurrence_kind: data.recurrence_kind,
            series_end_date: data.series_end_date,
            date: data.date,
            time: data.time,
            status: OccurrenceStatus::Pending,
            is_exception: false,
            activity: data.activity,
            what: data.what,
            description: data.description,
            caregiver: data.caregiver,
            medication: data.medication,
            capsule_quantity: data.capsule_quantity,
            progress_trend: data.progress_trend,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool().begin().await?;
        Self::insert_occurrences_in_transaction(&mut tx, std::slice::from_ref(&occurrence)).await?;
        if occurrence.recurrence_kind.is_recurring() {
            Self::sync_in_transaction(&mut tx, &mut occurrence, None).await?;
        }
        tx.commit().await?;

        debug!(id = %occurrence.id, series_id = ?occurrence.series_id, "occurrence added");
        Ok(occurrence)
    }

    async fn find_occurrence_by_id(&self, id: Uuid) -> Result<Option<Occurrence>, CoreError> {
        let occurrence = sqlx::query_as("SELECT * FROM occurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(occurrence)
    }

    async fn find_occurrences_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Occurrence>, CoreError> {
        // ids are stored as blobs, so match on their hex form
        let mut pattern: String = short_id
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        pattern.push('%');

        let occurrences = sqlx::query_as("SELECT * FROM occurrences WHERE lower(hex(id)) LIKE $1")
            .bind(pattern)
            .fetch_all(self.pool())
            .await?;
        Ok(occurrences)
    }

    async fn find_occurrences_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Occurrence>, CoreError> {
        if end < start {
            return Err(CoreError::InvalidInput(format!(
                "Range end {} is before range start {}",
                end, start
            )));
        }
        let occurrences = sqlx::query_as(
            "SELECT * FROM occurrences WHERE date >= $1 AND date <= $2 ORDER BY date, time, created_at",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;
        Ok(occurrences)
    }

    #[instrument(skip(self, data))]
    async fn update_occurrence(&self, id: Uuid, data: UpdateOccurrence) -> Result<Occurrence, CoreError> {
        let mut tx = self.pool().begin().await?;

        let mut occurrence = Self::find_occurrence_in_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        let previous_series_id = occurrence.series_id;
        let resync = data.touches_recurrence();
        let sets_end_date = data.series_end_date.is_some();

        apply_update(&mut occurrence, data);
        validate_payload(&occurrence.what, &occurrence.caregiver, occurrence.capsule_quantity)?;
        if resync {
            // a row that stops repeating drops the end date it carried over
            if !occurrence.recurrence_kind.is_recurring() && !sets_end_date {
                occurrence.series_end_date = None;
            }
            validate_recurrence(
                occurrence.recurrence_kind,
                occurrence.series_end_date,
                occurrence.date,
            )?;
            Self::sync_in_transaction(&mut tx, &mut occurrence, previous_series_id).await?;
        }

        occurrence.updated_at = Utc::now();
        Self::write_occurrence_in_transaction(&mut tx, &occurrence).await?;
        tx.commit().await?;

        Ok(occurrence)
    }

    #[instrument(skip(self, actual, now))]
    async fn set_status(
        &self,
        id: Uuid,
        status: OccurrenceStatus,
        actual: Option<ActualTime>,
        now: NaiveDateTime,
    ) -> Result<Occurrence, CoreError> {
        let mut tx = self.pool().begin().await?;

        let mut occurrence = Self::find_occurrence_in_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if status == OccurrenceStatus::Done && is_in_future(&occurrence, now) {
            let actual = actual.ok_or(CoreError::FutureNeedsTime)?;
            if actual.date.and_time(actual.time) > now {
                return Err(CoreError::TimeInFuture);
            }
            occurrence.date = actual.date;
            occurrence.time = Some(actual.time);
            Self::ensure_no_series_conflict(&mut tx, &occurrence).await?;
        }

        occurrence.status = status;
        occurrence.updated_at = Utc::now();
        Self::write_occurrence_in_transaction(&mut tx, &occurrence).await?;
        tx.commit().await?;

        Ok(occurrence)
    }

    async fn bulk_set_status(&self, ids: &[Uuid], status: OccurrenceStatus) -> Result<Vec<Uuid>, CoreError> {
        if status == OccurrenceStatus::Pending {
            return Err(CoreError::InvalidInput(
                "Bulk status changes only accept done or missed".to_string(),
            ));
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool().begin().await?;

        let mut select: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id FROM occurrences WHERE id IN (");
        let mut separated = select.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let existing: Vec<(Uuid,)> = select.build_query_as().fetch_all(&mut *tx).await?;

        let mut update: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE occurrences SET status = ");
        update.push_bind(status);
        update.push(", updated_at = ");
        update.push_bind(Utc::now());
        update.push(" WHERE id IN (");
        let mut separated = update.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        update.build().execute(&mut *tx).await?;

        tx.commit().await?;

        debug!(updated = existing.len(), %status, "bulk status change");
        Ok(existing.into_iter().map(|(id,)| id).collect())
    }

    async fn reschedule(&self, id: Uuid, date: NaiveDate, time: Option<NaiveTime>) -> Result<Occurrence, CoreError> {
        let mut tx = self.pool().begin().await?;

        let mut occurrence = Self::find_occurrence_in_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        occurrence.date = date;
        occurrence.time = time;
        Self::ensure_no_series_conflict(&mut tx, &occurrence).await?;

        occurrence.updated_at = Utc::now();
        Self::write_occurrence_in_transaction(&mut tx, &occurrence).await?;
        tx.commit().await?;

        Ok(occurrence)
    }

    async fn set_exception(&self, id: Uuid, is_exception: bool) -> Result<Occurrence, CoreError> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("UPDATE occurrences SET is_exception = $1, updated_at = $2 WHERE id = $3")
            .bind(is_exception)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }

        let occurrence = Self::find_occurrence_in_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        tx.commit().await?;
        Ok(occurrence)
    }
}

impl SqliteRepository {
    pub(crate) async fn find_occurrence_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        id: Uuid,
    ) -> Result<Option<Occurrence>, CoreError> {
        let occurrence = sqlx::query_as("SELECT * FROM occurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(occurrence)
    }

    /// Inserts rows with insert-or-ignore semantics: a row colliding with an
    /// existing member of the same series on the same date is dropped.
    /// Returns the number of rows actually written.
    pub(crate) async fn insert_occurrences_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        occurrences: &[Occurrence],
    ) -> Result<u64, CoreError> {
        let mut inserted = 0;
        for chunk in occurrences.chunks(INSERT_CHUNK_ROWS) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(INSERT_COLUMNS);
            qb.push_values(chunk, |mut row, o| {
                row.push_bind(o.id)
                    .push_bind(o.series_id)
                    .push_bind(o.recurrence_kind)
                    .push_bind(o.series_end_date)
                    .push_bind(o.date)
                    .push_bind(o.time)
                    .push_bind(o.status)
                    .push_bind(o.is_exception)
                    .push_bind(o.activity)
                    .push_bind(o.what.clone())
                    .push_bind(o.description.clone())
                    .push_bind(o.caregiver.clone())
                    .push_bind(o.medication.clone())
                    .push_bind(o.capsule_quantity)
                    .push_bind(o.progress_trend)
                    .push_bind(o.created_by.clone())
                    .push_bind(o.created_at)
                    .push_bind(o.updated_at);
            });
            inserted += qb.build().execute(&mut **tx).await?.rows_affected();
        }
        Ok(inserted)
    }

    /// Writes every mutable column of an existing row.
    pub(crate) async fn write_occurrence_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        o: &Occurrence,
    ) -> Result<(), CoreError> {
        let result = sqlx::query(
            r#"UPDATE occurrences SET
                series_id = $1, recurrence_kind = $2, series_end_date = $3, date = $4, time = $5,
                status = $6, is_exception = $7, activity = $8, what = $9, description = $10,
                caregiver = $11, medication = $12, capsule_quantity = $13, progress_trend = $14,
                updated_at = $15
            WHERE id = $16"#,
        )
        .bind(o.series_id)
        .bind(o.recurrence_kind)
        .bind(o.series_end_date)
        .bind(o.date)
        .bind(o.time)
        .bind(o.status)
        .bind(o.is_exception)
        .bind(o.activity)
        .bind(&o.what)
        .bind(&o.description)
        .bind(&o.caregiver)
        .bind(&o.medication)
        .bind(o.capsule_quantity)
        .bind(o.progress_trend)
        .bind(o.updated_at)
        .bind(o.id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(o.id.to_string()));
        }
        Ok(())
    }

    /// Rejects moving a series member onto a date a sibling already holds.
    async fn ensure_no_series_conflict(
        tx: &mut Transaction<'_, Sqlite>,
        o: &Occurrence,
    ) -> Result<(), CoreError> {
        let Some(series_id) = o.series_id else {
            return Ok(());
        };
        let (clashes,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM occurrences WHERE series_id = $1 AND date = $2 AND id != $3",
        )
        .bind(series_id)
        .bind(o.date)
        .bind(o.id)
        .fetch_one(&mut **tx)
        .await?;

        if clashes > 0 {
            return Err(CoreError::SeriesConflict(series_id.to_string(), o.date.to_string()));
        }
        Ok(())
    }
}

fn validate_payload(what: &str, caregiver: &str, capsule_quantity: Option<i64>) -> Result<(), CoreError> {
    if what.trim().is_empty() {
        return Err(CoreError::InvalidInput("What happened cannot be empty".to_string()));
    }
    if caregiver.trim().is_empty() {
        return Err(CoreError::InvalidInput("Caregiver cannot be empty".to_string()));
    }
    if capsule_quantity.is_some_and(|q| q < 0) {
        return Err(CoreError::InvalidInput("Capsule quantity cannot be negative".to_string()));
    }
    Ok(())
}

fn apply_update(o: &mut Occurrence, data: UpdateOccurrence) {
    if let Some(activity) = data.activity {
        o.activity = activity;
    }
    if let Some(what) = data.what {
        o.what = what;
    }
    if let Some(description) = data.description {
        o.description = description;
    }
    if let Some(caregiver) = data.caregiver {
        o.caregiver = caregiver;
    }
    if let Some(medication) = data.medication {
        o.medication = medication;
    }
    if let Some(capsule_quantity) = data.capsule_quantity {
        o.capsule_quantity = capsule_quantity;
    }
    if let Some(progress_trend) = data.progress_trend {
        o.progress_trend = progress_trend;
    }
    if let Some(date) = data.date {
        o.date = date;
    }
    if let Some(time) = data.time {
        o.time = time;
    }
    if let Some(kind) = data.recurrence_kind {
        o.recurrence_kind = kind;
    }
    if let Some(series_end_date) = data.series_end_date {
        o.series_end_date = series_end_date;
    }
}

/// An occurrence is still ahead of `now` when it falls on a later day, or on
/// the same day with no time or a later time.
pub(crate) fn is_in_future(o: &Occurrence, now: NaiveDateTime) -> bool {
    let today = now.date();
    if o.date > today {
        return true;
    }
    o.date == today && o.time.map_or(true, |t| t > now.time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(date: (i32, u32, u32), time: Option<(u32, u32)>) -> Occurrence {
        Occurrence {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: time.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(at((2024, 5, 11), Some((8, 0))), true)]
    #[case(at((2024, 5, 10), None), true)]
    #[case(at((2024, 5, 10), Some((14, 0))), true)]
    #[case(at((2024, 5, 10), Some((12, 0))), false)]
    #[case(at((2024, 5, 10), Some((9, 0))), false)]
    #[case(at((2024, 5, 9), None), false)]
    fn future_detection(#[case] occurrence: Occurrence, #[case] expected: bool) {
        let now = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(is_in_future(&occurrence, now), expected);
    }

    #[test]
    fn payload_validation() {
        assert!(validate_payload("Lunch", "Ana", None).is_ok());
        assert!(validate_payload("  ", "Ana", None).is_err());
        assert!(validate_payload("Lunch", "", None).is_err());
        assert!(validate_payload("Pills", "Ana", Some(-1)).is_err());
    }

    #[test]
    fn update_applies_only_given_fields() {
        let mut occurrence = at((2024, 1, 1), Some((9, 0)));
        occurrence.description = Some("before".to_string());
        occurrence.what = "Breakfast".to_string();

        apply_update(
            &mut occurrence,
            UpdateOccurrence {
                description: Some(None),
                time: Some(None),
                ..Default::default()
            },
        );

        assert_eq!(occurrence.what, "Breakfast");
        assert_eq!(occurrence.description, None);
        assert_eq!(occurrence.time, None);
    }
}
