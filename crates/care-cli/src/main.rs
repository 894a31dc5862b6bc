use clap::Parser;
use care_core::db;
use care_core::error::CoreError;
use care_core::models::DeleteScope;
use care_core::repository::{OccurrenceRepository, SqliteRepository};
use dialoguer::Confirm;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;
use util::resolve_occurrence_id;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level);

    let cli = cli::Cli::parse();

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_occurrence(&repository, command, &config).await,
        cli::Commands::List(command) => commands::list::list_occurrences(&repository, command, &config).await,
        cli::Commands::Show(command) => commands::show::show_occurrence(&repository, command).await,
        cli::Commands::Series(command) => commands::series::show_series(&repository, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_occurrence(&repository, command).await,
        cli::Commands::Status(command) => commands::status::set_status(&repository, command).await,
        cli::Commands::BulkStatus(command) => commands::status::bulk_set_status(&repository, command).await,
        cli::Commands::Reschedule(command) => {
            commands::reschedule::reschedule_occurrence(&repository, command).await
        }
        cli::Commands::Exception(command) => commands::exception::set_exception(&repository, command).await,
        cli::Commands::Delete(command) => {
            let occurrence_id = match resolve_occurrence_id(&repository, &command.id).await {
                Ok(id) => id,
                Err(e) => {
                    handle_error(e);
                    std::process::exit(1);
                }
            };
            let occurrence = match repository.find_occurrence_by_id(occurrence_id).await {
                Ok(Some(o)) => o,
                Ok(None) => {
                    let error_style = Style::new().red().bold();
                    eprintln!(
                        "{} Occurrence with ID '{}' not found.",
                        "Error:".style(error_style),
                        occurrence_id
                    );
                    std::process::exit(1);
                }
                Err(e) => {
                    handle_error(e.into());
                    std::process::exit(1);
                }
            };

            if !command.force {
                let target = match (command.scope, occurrence.series_id) {
                    (DeleteScope::Single, _) | (_, None) => {
                        format!("'{}' on {}", occurrence.what, occurrence.date)
                    }
                    (DeleteScope::Future, Some(_)) => {
                        format!("'{}' from {} onwards", occurrence.what, occurrence.date)
                    }
                    (DeleteScope::Series, Some(_)) => format!("the whole '{}' series", occurrence.what),
                };
                let confirmation = Confirm::new()
                    .with_prompt(format!("Are you sure you want to delete {}?", target))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return;
                }
            }
            commands::delete::delete_occurrence(&repository, occurrence_id, command.scope).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

/// Installs the stderr subscriber. `CARE_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("CARE_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(occurrences) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, label) in occurrences {
                    eprintln!("  {} ({})", id.yellow(), label);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::FutureNeedsTime => {
                eprintln!(
                    "{} This occurrence is still in the future. Pass {} and {} with when it actually happened.",
                    "Error:".style(error_style),
                    "--at-date".yellow(),
                    "--at-time".yellow()
                );
            }
            CoreError::SeriesConflict(series, date) => {
                eprintln!(
                    "{} Series {} already has an occurrence on {}",
                    "Error:".style(error_style),
                    series.yellow(),
                    date.yellow()
                );
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
