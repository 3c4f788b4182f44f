//! CLI module: three positional paths parsed with clap and mapped onto `AppConfig`.

mod clap_parser;

pub use clap_parser::{Cli, CliOutcome, USAGE, parse_cli_to_app_config};
