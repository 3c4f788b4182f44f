//! Orchestrator: runs load -> clean -> persist once, in order, and reports on it.
//!
//! Progress lines go to stdout with `println!`; details go through `log`.

pub mod summary;

use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::clean::clean_data;
use crate::config::AppConfig;
use crate::db::{make_pool, save_table};
use crate::load::load_data;
use crate::metrics::memory_stats_mb;

use summary::{RunSummary, SummaryBuilder};

pub async fn run_pipeline(cfg: &AppConfig) -> Result<RunSummary> {
    cfg.validate().context("Invalid configuration")?;
    let mem_start = memory_stats_mb();
    let builder = SummaryBuilder::new(&cfg.messages_path, &cfg.categories_path, &cfg.database.path)
        .with_table(&cfg.pipeline.table_name);

    println!(
        "Loading data...\n    MESSAGES: {}\n    CATEGORIES: {}",
        cfg.messages_path.display(),
        cfg.categories_path.display()
    );
    let t0 = Instant::now();
    let loaded = load_data(&cfg.messages_path, &cfg.categories_path, &cfg.pipeline)?;
    let builder = builder.with_load(
        loaded.message_rows,
        loaded.category_rows,
        loaded.table.row_count(),
        loaded.matched_rows,
        t0.elapsed(),
    );

    println!("Cleaning data...");
    let t0 = Instant::now();
    let cleaned = clean_data(loaded.table, &cfg.pipeline)?;
    let builder = builder.with_clean(
        cleaned.category_columns,
        cleaned.duplicates_removed,
        t0.elapsed(),
    );

    println!("Saving data...\n    DATABASE: {}", cfg.database.path.display());
    let t0 = Instant::now();
    let pool = make_pool(&cfg.database)
        .await
        .with_context(|| format!("Failed to open database {}", cfg.database.path.display()))?;
    let written = save_table(&pool, &cfg.pipeline.table_name, &cleaned.table)
        .await
        .with_context(|| {
            format!(
                "Failed to write table {} to {}",
                cfg.pipeline.table_name,
                cfg.database.path.display()
            )
        });
    pool.close().await;
    let written = written?;
    info!(
        "Wrote {} rows into {}.{}",
        written,
        cfg.database.path.display(),
        cfg.pipeline.table_name
    );
    let builder = builder.with_save(written, t0.elapsed());

    println!("Cleaned data saved to database!");
    let summary = builder
        .with_memory(mem_start.used_mb, memory_stats_mb().used_mb)
        .build();
    summary.log();
    Ok(summary)
}
