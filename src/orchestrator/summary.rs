//! Run summary: row counts, stage timings and memory use for one pipeline run.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::info;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub messages_path: String,
    pub categories_path: String,
    pub database_path: String,
    pub table_name: String,
    pub message_rows: usize,
    pub category_rows: usize,
    pub joined_rows: usize,
    pub matched_rows: usize,
    pub category_columns: usize,
    pub duplicates_removed: usize,
    pub persisted_rows: u64,
    pub load_time: Duration,
    pub clean_time: Duration,
    pub save_time: Duration,
    pub mem_used_start_mb: u64,
    pub mem_used_end_mb: u64,
    pub started_utc: DateTime<Utc>,
    pub ended_utc: DateTime<Utc>,
    pub duration_secs: f64,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            "Run summary: {} + {} -> {}.{}",
            self.messages_path, self.categories_path, self.database_path, self.table_name
        );
        info!(
            "  rows: messages={} categories={} joined={} matched={} duplicates_removed={} persisted={}",
            self.message_rows,
            self.category_rows,
            self.joined_rows,
            self.matched_rows,
            self.duplicates_removed,
            self.persisted_rows
        );
        info!("  category columns: {}", self.category_columns);
        info!(
            "  timings: load={:.3}s clean={:.3}s save={:.3}s total={:.3}s",
            self.load_time.as_secs_f64(),
            self.clean_time.as_secs_f64(),
            self.save_time.as_secs_f64(),
            self.duration_secs
        );
        info!(
            "  memory used: start={} MB end={} MB; started={} ended={}",
            self.mem_used_start_mb,
            self.mem_used_end_mb,
            self.started_utc.to_rfc3339(),
            self.ended_utc.to_rfc3339()
        );
    }
}

#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    messages_path: String,
    categories_path: String,
    database_path: String,
    table_name: String,
    message_rows: usize,
    category_rows: usize,
    joined_rows: usize,
    matched_rows: usize,
    category_columns: usize,
    duplicates_removed: usize,
    persisted_rows: u64,
    load_time: Duration,
    clean_time: Duration,
    save_time: Duration,
    mem_used_start_mb: u64,
    mem_used_end_mb: u64,
    started_utc: DateTime<Utc>,
}

impl SummaryBuilder {
    /// Start a summary; the start timestamp is taken now.
    pub fn new(messages_path: &Path, categories_path: &Path, database_path: &Path) -> Self {
        Self {
            messages_path: messages_path.display().to_string(),
            categories_path: categories_path.display().to_string(),
            database_path: database_path.display().to_string(),
            table_name: String::new(),
            message_rows: 0,
            category_rows: 0,
            joined_rows: 0,
            matched_rows: 0,
            category_columns: 0,
            duplicates_removed: 0,
            persisted_rows: 0,
            load_time: Duration::ZERO,
            clean_time: Duration::ZERO,
            save_time: Duration::ZERO,
            mem_used_start_mb: 0,
            mem_used_end_mb: 0,
            started_utc: Utc::now(),
        }
    }

    pub fn with_table(mut self, table_name: &str) -> Self {
        self.table_name = table_name.to_string();
        self
    }

    pub fn with_load(
        mut self,
        message_rows: usize,
        category_rows: usize,
        joined_rows: usize,
        matched_rows: usize,
        elapsed: Duration,
    ) -> Self {
        self.message_rows = message_rows;
        self.category_rows = category_rows;
        self.joined_rows = joined_rows;
        self.matched_rows = matched_rows;
        self.load_time = elapsed;
        self
    }

    pub fn with_clean(
        mut self,
        category_columns: usize,
        duplicates_removed: usize,
        elapsed: Duration,
    ) -> Self {
        self.category_columns = category_columns;
        self.duplicates_removed = duplicates_removed;
        self.clean_time = elapsed;
        self
    }

    pub fn with_save(mut self, persisted_rows: u64, elapsed: Duration) -> Self {
        self.persisted_rows = persisted_rows;
        self.save_time = elapsed;
        self
    }

    pub fn with_memory(mut self, start_mb: u64, end_mb: u64) -> Self {
        self.mem_used_start_mb = start_mb;
        self.mem_used_end_mb = end_mb;
        self
    }

    /// Finish the summary; the end timestamp is taken now.
    pub fn build(self) -> RunSummary {
        let ended_utc = Utc::now();
        let duration_secs = (ended_utc - self.started_utc).num_milliseconds() as f64 / 1000.0;
        RunSummary {
            messages_path: self.messages_path,
            categories_path: self.categories_path,
            database_path: self.database_path,
            table_name: self.table_name,
            message_rows: self.message_rows,
            category_rows: self.category_rows,
            joined_rows: self.joined_rows,
            matched_rows: self.matched_rows,
            category_columns: self.category_columns,
            duplicates_removed: self.duplicates_removed,
            persisted_rows: self.persisted_rows,
            load_time: self.load_time,
            clean_time: self.clean_time,
            save_time: self.save_time,
            mem_used_start_mb: self.mem_used_start_mb,
            mem_used_end_mb: self.mem_used_end_mb,
            started_utc: self.started_utc,
            ended_utc,
            duration_secs,
        }
    }
}
