use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceStatus {
    Pending,
    Done,
    Missed,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid occurrence status: {0}")]
pub struct ParseOccurrenceStatusError(String);

impl FromStr for OccurrenceStatus {
    type Err = ParseOccurrenceStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OccurrenceStatus::Pending),
            "done" => Ok(OccurrenceStatus::Done),
            "missed" => Ok(OccurrenceStatus::Missed),
            _ => Err(ParseOccurrenceStatusError(s.to_string())),
        }
    }
}

impl std::fmt::Display for OccurrenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OccurrenceStatus::Pending => write!(f, "pending"),
            OccurrenceStatus::Done => write!(f, "done"),
            OccurrenceStatus::Missed => write!(f, "missed"),
        }
    }
}

/// Step pattern of a recurring series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceKind {
    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrenceKind::None)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence kind: {0}")]
pub struct ParseRecurrenceKindError(String);

impl FromStr for RecurrenceKind {
    type Err = ParseRecurrenceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(RecurrenceKind::None),
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            _ => Err(ParseRecurrenceKindError(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceKind::None => write!(f, "none"),
            RecurrenceKind::Daily => write!(f, "daily"),
            RecurrenceKind::Weekly => write!(f, "weekly"),
            RecurrenceKind::Monthly => write!(f, "monthly"),
        }
    }
}

/// Category of care activity an occurrence records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Medication,
    Meal,
    Vital,
    Activity,
    Sleep,
    Bathroom,
    Progress,
    Other,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid activity kind: {0}")]
pub struct ParseActivityKindError(String);

impl FromStr for ActivityKind {
    type Err = ParseActivityKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "medication" => Ok(ActivityKind::Medication),
            "meal" => Ok(ActivityKind::Meal),
            "vital" => Ok(ActivityKind::Vital),
            "activity" | "exercise" => Ok(ActivityKind::Activity),
            "sleep" => Ok(ActivityKind::Sleep),
            "bathroom" => Ok(ActivityKind::Bathroom),
            "progress" => Ok(ActivityKind::Progress),
            "other" => Ok(ActivityKind::Other),
            _ => Err(ParseActivityKindError(s.to_string())),
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ActivityKind::Medication => "medication",
            ActivityKind::Meal => "meal",
            ActivityKind::Vital => "vital",
            ActivityKind::Activity => "activity",
            ActivityKind::Sleep => "sleep",
            ActivityKind::Bathroom => "bathroom",
            ActivityKind::Progress => "progress",
            ActivityKind::Other => "other",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProgressTrend {
    Evolution,
    Regression,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid progress trend: {0}")]
pub struct ParseProgressTrendError(String);

impl FromStr for ProgressTrend {
    type Err = ParseProgressTrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "evolution" => Ok(ProgressTrend::Evolution),
            "regression" => Ok(ProgressTrend::Regression),
            _ => Err(ParseProgressTrendError(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProgressTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProgressTrend::Evolution => "evolution",
            ProgressTrend::Regression => "regression",
        };
        write!(f, "{}", label)
    }
}

/// One dated care activity. Standalone when `series_id` is `None`,
/// otherwise a member of the series sharing that key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Occurrence {
    pub id: Uuid,
    pub series_id: Option<Uuid>,
    pub recurrence_kind: RecurrenceKind,
    /// Inclusive upper bound for generation.
    pub series_end_date: Option<NaiveDate>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub status: OccurrenceStatus,
    /// Advisory marker for a manually adjusted member of a series.
    pub is_exception: bool,
    pub activity: ActivityKind,
    pub what: String,
    pub description: Option<String>,
    pub caregiver: String,
    pub medication: Option<String>,
    pub capsule_quantity: Option<i64>,
    pub progress_trend: Option<ProgressTrend>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Occurrence {
    /// Builds a pending, non-exception member of the base's series on `date`,
    /// with the payload snapshot copied from the base.
    pub fn clone_for_date(&self, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            series_id: self.series_id,
            recurrence_kind: self.recurrence_kind,
            series_end_date: self.series_end_date,
            date,
            time: self.time,
            status: OccurrenceStatus::Pending,
            is_exception: false,
            activity: self.activity,
            what: self.what.clone(),
            description: self.description.clone(),
            caregiver: self.caregiver.clone(),
            medication: self.medication.clone(),
            capsule_quantity: self.capsule_quantity,
            progress_trend: self.progress_trend,
            created_by: self.created_by.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Occurrence {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id: None,
            recurrence_kind: RecurrenceKind::None,
            series_end_date: None,
            date: Utc::now().date_naive(),
            time: None,
            status: OccurrenceStatus::Pending,
            is_exception: false,
            activity: ActivityKind::Other,
            what: String::new(),
            description: None,
            caregiver: String::new(),
            medication: None,
            capsule_quantity: None,
            progress_trend: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewOccurrence {
    pub activity: ActivityKind,
    pub what: String,
    pub description: Option<String>,
    pub caregiver: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub medication: Option<String>,
    pub capsule_quantity: Option<i64>,
    pub progress_trend: Option<ProgressTrend>,
    pub created_by: Option<String>,
    pub recurrence_kind: RecurrenceKind,
    pub series_end_date: Option<NaiveDate>,
}

impl Default for NewOccurrence {
    fn default() -> Self {
        Self {
            activity: ActivityKind::Other,
            what: String::new(),
            description: None,
            caregiver: String::new(),
            date: Utc::now().date_naive(),
            time: None,
            medication: None,
            capsule_quantity: None,
            progress_trend: None,
            created_by: None,
            recurrence_kind: RecurrenceKind::None,
            series_end_date: None,
        }
    }
}

/// Field edits for one occurrence. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct UpdateOccurrence {
    pub activity: Option<ActivityKind>,
    pub what: Option<String>,
    pub description: Option<Option<String>>,
    pub caregiver: Option<String>,
    pub medication: Option<Option<String>>,
    pub capsule_quantity: Option<Option<i64>>,
    pub progress_trend: Option<Option<ProgressTrend>>,
    pub date: Option<NaiveDate>,
    pub time: Option<Option<NaiveTime>>,
    pub recurrence_kind: Option<RecurrenceKind>,
    pub series_end_date: Option<Option<NaiveDate>>,
}

impl UpdateOccurrence {
    /// Whether the edit can change the shape of a series and therefore
    /// requires a resync.
    pub fn touches_recurrence(&self) -> bool {
        self.date.is_some()
            || self.time.is_some()
            || self.recurrence_kind.is_some()
            || self.series_end_date.is_some()
    }
}

/// Breadth of a deletion relative to the target's series membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    /// Only the selected occurrence
    Single,
    /// The selected occurrence and every later member of its series
    Future,
    /// Every member of the series
    Series,
}

impl std::fmt::Display for DeleteScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteScope::Single => write!(f, "single"),
            DeleteScope::Future => write!(f, "future"),
            DeleteScope::Series => write!(f, "series"),
        }
    }
}

impl FromStr for DeleteScope {
    type Err = ParseDeleteScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "this" | "occurrence" => Ok(DeleteScope::Single),
            "future" | "this_and_future" => Ok(DeleteScope::Future),
            "series" | "all" => Ok(DeleteScope::Series),
            _ => Err(ParseDeleteScopeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid delete scope: {0}")]
pub struct ParseDeleteScopeError(String);

/// Actual instant a caregiver reports when completing an occurrence
/// that was scheduled in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActualTime {
    pub date: NaiveDate,
    pub time: NaiveTime,
}
