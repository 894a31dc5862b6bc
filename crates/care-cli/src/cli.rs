use care_core::models::{ActivityKind, DeleteScope, OccurrenceStatus, ProgressTrend, RecurrenceKind};
use clap::{ArgGroup, Parser, Subcommand};

/// Care: coordinate a patient's daily care activities
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log or schedule an occurrence, optionally repeating
    Add(AddCommand),
    /// List occurrences in a date range
    List(ListCommand),
    /// Show every field of one occurrence
    Show(ShowCommand),
    /// List the members of an occurrence's series
    Series(SeriesCommand),
    /// Edit an occurrence; schedule edits regenerate its series
    Edit(EditCommand),
    /// Change the status of one occurrence
    Status(StatusCommand),
    /// Mark several occurrences done or missed
    BulkStatus(BulkStatusCommand),
    /// Move one occurrence without touching its series
    Reschedule(RescheduleCommand),
    /// Flag or unflag an occurrence as an exception
    Exception(ExceptionCommand),
    /// Delete an occurrence, its future or its whole series
    Delete(DeleteCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// Short summary of what happens
    pub what: String,
    /// Kind of activity (medication, meal, vital, activity, sleep, bathroom, progress, other)
    #[clap(short, long, default_value = "other")]
    pub activity: ActivityKind,
    /// Date of the occurrence (e.g. '2024-05-01', 'tomorrow')
    #[clap(short, long, default_value = "today")]
    pub date: String,
    /// Time of day (e.g. '09:00', '2:30 PM')
    #[clap(short, long)]
    pub time: Option<String>,
    #[clap(long)]
    pub description: Option<String>,
    /// Caregiver responsible; falls back to the configured default
    #[clap(short, long)]
    pub caregiver: Option<String>,
    #[clap(long)]
    pub medication: Option<String>,
    #[clap(long)]
    pub capsules: Option<i64>,
    /// Progress trend (evolution, regression)
    #[clap(long)]
    pub trend: Option<ProgressTrend>,
    #[clap(long)]
    pub created_by: Option<String>,
    /// Repeat daily, weekly or monthly
    #[clap(long, requires = "until")]
    pub every: Option<RecurrenceKind>,
    /// Last date of the series (inclusive)
    #[clap(long, requires = "every")]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// First date of the range (defaults to today)
    #[clap(long)]
    pub from: Option<String>,
    /// Last date of the range (defaults to the configured upcoming window)
    #[clap(long)]
    pub to: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID (or unique prefix) of the occurrence
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SeriesCommand {
    /// The ID (or unique prefix) of any member of the series
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or unique prefix) of the occurrence to edit
    pub id: String,

    #[arg(long)]
    pub what: Option<String>,
    #[arg(long)]
    pub activity: Option<ActivityKind>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub caregiver: Option<String>,

    #[arg(long)]
    pub medication: Option<String>,
    #[arg(long, conflicts_with = "medication")]
    pub medication_clear: bool,

    #[arg(long)]
    pub capsules: Option<i64>,
    #[arg(long, conflicts_with = "capsules")]
    pub capsules_clear: bool,

    #[arg(long)]
    pub trend: Option<ProgressTrend>,
    #[arg(long, conflicts_with = "trend")]
    pub trend_clear: bool,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub time: Option<String>,
    #[arg(long, conflicts_with = "time")]
    pub time_clear: bool,

    /// New recurrence kind; `none` turns the series back into a single occurrence
    #[arg(long)]
    pub every: Option<RecurrenceKind>,

    #[arg(long)]
    pub until: Option<String>,
    #[arg(long, conflicts_with = "until")]
    pub until_clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct StatusCommand {
    /// The ID (or unique prefix) of the occurrence
    pub id: String,
    /// New status (pending, done, missed)
    pub status: OccurrenceStatus,
    /// Date the activity actually happened, required when completing ahead of schedule
    #[arg(long, requires = "at_time")]
    pub at_date: Option<String>,
    /// Time the activity actually happened
    #[arg(long, requires = "at_date")]
    pub at_time: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct BulkStatusCommand {
    /// New status (done or missed)
    pub status: OccurrenceStatus,
    /// IDs (or unique prefixes) of the occurrences
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RescheduleCommand {
    /// The ID (or unique prefix) of the occurrence
    pub id: String,
    /// New date
    pub date: String,
    /// New time of day; omitted means untimed
    pub time: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("flag").required(true).args(["on", "off"])))]
pub struct ExceptionCommand {
    /// The ID (or unique prefix) of the occurrence
    pub id: String,
    #[arg(long)]
    pub on: bool,
    #[arg(long)]
    pub off: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique prefix) of the occurrence to delete
    pub id: String,
    /// How much of the series to delete (single, future, series)
    #[clap(long, default_value = "single")]
    pub scope: DeleteScope,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recurring_add() {
        let cli = Cli::try_parse_from([
            "care", "add", "Losartan", "--activity", "medication", "--date", "2024-01-01",
            "--time", "09:00", "--every", "daily", "--until", "2024-01-05",
        ])
        .unwrap();
        match cli.command {
            Commands::Add(add) => {
                assert_eq!(add.activity, ActivityKind::Medication);
                assert_eq!(add.every, Some(RecurrenceKind::Daily));
                assert_eq!(add.until.as_deref(), Some("2024-01-05"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn add_every_requires_until() {
        assert!(Cli::try_parse_from(["care", "add", "Walk", "--every", "weekly"]).is_err());
    }

    #[test]
    fn delete_scope_defaults_to_single() {
        let cli = Cli::try_parse_from(["care", "delete", "abcd"]).unwrap();
        match cli.command {
            Commands::Delete(delete) => assert_eq!(delete.scope, DeleteScope::Single),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn exception_requires_a_flag() {
        assert!(Cli::try_parse_from(["care", "exception", "abcd"]).is_err());
        assert!(Cli::try_parse_from(["care", "exception", "abcd", "--on", "--off"]).is_err());
    }
}
