//! # Care Core Library
//!
//! Shared engine behind the care coordination tool: caregivers record a
//! patient's daily activities (medication, meals, vitals, sleep, ...) as dated
//! occurrences, and recurring activities are materialized as a series of
//! occurrences that share a grouping key.
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Occurrence entity, enums and transfer objects
//! - [`recurrence`]: Date stepping and recurrence validation
//! - [`repository`]: Data access layer, series synchronization and scoped deletion
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use care_core::{
//!     db,
//!     models::{ActivityKind, NewOccurrence, RecurrenceKind},
//!     repository::{OccurrenceRepository, SqliteRepository},
//! };
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("care.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//!     let base = repo
//!         .add_occurrence(NewOccurrence {
//!             activity: ActivityKind::Medication,
//!             what: "Losartan 50mg".to_string(),
//!             caregiver: "Ana".to_string(),
//!             date: start,
//!             recurrence_kind: RecurrenceKind::Daily,
//!             series_end_date: NaiveDate::from_ymd_opt(2024, 3, 7),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created series {:?}", base.series_id);
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
