use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Occurrence not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, what)

    #[error("Occurrence is scheduled in the future; provide the date and time it was done.")]
    FutureNeedsTime,

    #[error("The date and time an occurrence was done cannot be in the future.")]
    TimeInFuture,

    #[error("Another occurrence of series {0} is already scheduled on {1}")]
    SeriesConflict(String, String),
}
