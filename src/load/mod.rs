//! Loader stage: read the messages and categories files and left-join them on the id column.

pub mod csv_source;
pub mod join;

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::PipelineConfig;
use crate::models::Table;

pub use csv_source::{read_csv, read_csv_from};
pub use join::{JoinOutcome, left_join};

/// Combined table plus the input sizes the run summary reports.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub table: Table,
    pub message_rows: usize,
    pub category_rows: usize,
    pub matched_rows: usize,
}

pub fn load_data(
    messages_path: &Path,
    categories_path: &Path,
    cfg: &PipelineConfig,
) -> Result<LoadedData> {
    let messages_name = messages_path.display().to_string();
    let categories_name = categories_path.display().to_string();
    let messages = read_csv(messages_path)
        .with_context(|| format!("Failed to load messages from {}", messages_name))?;
    let categories = read_csv(categories_path)
        .with_context(|| format!("Failed to load categories from {}", categories_name))?;
    info!(
        "Read {} message rows and {} category rows",
        messages.row_count(),
        categories.row_count()
    );

    let JoinOutcome {
        table,
        matched_left_rows,
    } = left_join(
        &messages,
        &messages_name,
        &categories,
        &categories_name,
        &cfg.id_column,
    )?;
    let unmatched = messages.row_count() - matched_left_rows;
    if unmatched > 0 {
        warn!(
            "{} message rows have no '{}' match in {}; their category fields are null",
            unmatched, cfg.id_column, categories_name
        );
    }
    info!(
        "Joined on '{}': {} rows, {} columns",
        cfg.id_column,
        table.row_count(),
        table.columns().len()
    );

    Ok(LoadedData {
        message_rows: messages.row_count(),
        category_rows: categories.row_count(),
        matched_rows: matched_left_rows,
        table,
    })
}
