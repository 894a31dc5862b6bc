use anyhow::Result;
use care_core::repository::Repository;
use chrono::{Days, Local};

use crate::cli::ListCommand;
use crate::config::Config;
use crate::parser::parse_date_local;
use crate::views::table::display_occurrences;

pub async fn list_occurrences(repo: &impl Repository, command: ListCommand, config: &Config) -> Result<()> {
    let start = match command.from {
        Some(from) => parse_date_local(&from)?,
        None => Local::now().date_naive(),
    };
    let end = match command.to {
        Some(to) => parse_date_local(&to)?,
        None => start
            .checked_add_days(Days::new(u64::from(config.upcoming_days)))
            .unwrap_or(start),
    };

    let occurrences = repo.find_occurrences_between(start, end).await?;
    display_occurrences(&occurrences);

    Ok(())
}
