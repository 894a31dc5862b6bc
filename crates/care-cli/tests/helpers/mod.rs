use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands against a temporary database
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing. It runs inside the temp
    /// directory so no stray `care.toml` is picked up.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("care").expect("Failed to find care binary");
        cmd.current_dir(self.temp_dir.path())
            .env("CARE_DATABASE_PATH", &self.db_path)
            .env_remove("CARE_DEFAULT_CAREGIVER")
            .env_remove("CARE_UPCOMING_DAYS")
            .env_remove("CARE_LOG");
        cmd
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs `add` and returns the short id it printed.
    pub fn add(&self, args: &[&str]) -> String {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let output = self.run_success(&full).get_output().stdout.clone();
        extract_id(&String::from_utf8_lossy(&output)).expect("add did not print an ID")
    }
}

/// Drops ANSI colour sequences so output can be matched as plain text.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub fn extract_id(stdout: &str) -> Option<String> {
    strip_ansi(stdout)
        .lines()
        .find_map(|line| line.trim().strip_prefix("→ ID:").map(|id| id.trim().to_string()))
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Daily medication from 2024-01-01 to 2024-01-05 at 09:00
    pub fn daily_medication_args() -> Vec<&'static str> {
        vec![
            "Losartan 50mg",
            "--activity", "medication",
            "--medication", "Losartan",
            "--capsules", "1",
            "--caregiver", "Ana",
            "--date", "2024-01-01",
            "--time", "09:00",
            "--every", "daily",
            "--until", "2024-01-05",
        ]
    }

    pub fn single_meal_args(date: &'static str) -> Vec<&'static str> {
        vec!["Lunch", "--activity", "meal", "--caregiver", "Ana", "--date", date, "--time", "12:00"]
    }
}

pub mod assertions {
    use predicates::prelude::*;

    pub fn has_occurrence_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Date"))
            .and(predicate::str::contains("Status"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
