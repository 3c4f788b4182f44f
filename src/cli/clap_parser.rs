use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use crate::config::AppConfig;

pub const USAGE: &str = "Please provide the filepaths of the messages and categories \
datasets as the first and second argument respectively, as \
well as the filepath of the database to save the cleaned data \
to as the third argument. \n\nExample: disaster_etl \
disaster_messages.csv disaster_categories.csv \
DisasterResponse.db";

/// Program name plus the three positionals.
const EXPECTED_ARGS: usize = 4;

#[derive(Parser, Debug)]
#[command(
    name = "disaster_etl",
    about = "Merge disaster messages with their categories and store them in SQLite",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Messages CSV (header row, shared id column)
    #[arg(value_name = "MESSAGES", allow_hyphen_values = true)]
    pub messages: PathBuf,
    /// Categories CSV with the compound `categories` column
    #[arg(value_name = "CATEGORIES", allow_hyphen_values = true)]
    pub categories: PathBuf,
    /// SQLite database file to create or update
    #[arg(value_name = "DATABASE", allow_hyphen_values = true)]
    pub database: PathBuf,
}

impl Cli {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig::new(&self.messages, &self.categories, &self.database)
    }
}

#[derive(Debug)]
pub enum CliOutcome {
    Run(AppConfig),
    /// Anything but three arguments; the caller prints `USAGE` and stops without an error status.
    Usage,
}

/// Three arguments run the pipeline, whatever they look like. Any other count,
/// `--help` and `--version` included, is a usage request.
pub fn parse_cli_to_app_config<I, T>(args: I) -> CliOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() != EXPECTED_ARGS {
        return CliOutcome::Usage;
    }
    match Cli::try_parse_from(args) {
        Ok(cli) => CliOutcome::Run(cli.to_app_config()),
        Err(e) => {
            debug!("argument parsing failed: {}", e);
            CliOutcome::Usage
        }
    }
}
