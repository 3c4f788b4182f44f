//! Cleaner stage: expand the compound category column and remove duplicate rows.

pub mod categories;
pub mod dedup;

use anyhow::{Context, Result};
use log::info;

use crate::config::PipelineConfig;
use crate::models::Table;

pub use categories::{category_names, split_categories};
pub use dedup::drop_duplicates;

#[derive(Debug, Clone)]
pub struct CleanedData {
    pub table: Table,
    pub category_columns: usize,
    pub duplicates_removed: usize,
}

pub fn clean_data(table: Table, cfg: &PipelineConfig) -> Result<CleanedData> {
    let width_before = table.columns().len();
    let split = split_categories(table, cfg)
        .with_context(|| format!("Failed to split '{}' column", cfg.categories_column))?;
    // One compound column was replaced by the indicator columns.
    let category_columns = split.columns().len() + 1 - width_before;
    info!("Derived {} category columns", category_columns);

    let (table, duplicates_removed) = drop_duplicates(split);
    info!(
        "Removed {} duplicate rows; {} rows remain",
        duplicates_removed,
        table.row_count()
    );
    Ok(CleanedData {
        table,
        category_columns,
        duplicates_removed,
    })
}
