use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_TABLE_NAME: &str = "DisasterResponse";

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            busy_timeout_ms: 5_000,
        }
    }
}

/// Column names and delimiters of the input convention, plus the destination table.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub id_column: String,
    pub categories_column: String,
    pub pair_delimiter: char,  // between `name-value` pairs
    pub value_delimiter: char, // between name and value
    pub table_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            id_column: "id".into(),
            categories_column: "categories".into(),
            pair_delimiter: ';',
            value_delimiter: '-',
            table_name: DEFAULT_TABLE_NAME.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub messages_path: PathBuf,
    pub categories_path: PathBuf,
    pub database: DatabaseConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn new(
        messages_path: impl Into<PathBuf>,
        categories_path: impl Into<PathBuf>,
        database_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            messages_path: messages_path.into(),
            categories_path: categories_path.into(),
            database: DatabaseConfig::new(database_path),
            pipeline: PipelineConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_blank(&self.messages_path) {
            return Err(ConfigError::MissingField {
                field: "messages_path",
            });
        }
        if is_blank(&self.categories_path) {
            return Err(ConfigError::MissingField {
                field: "categories_path",
            });
        }
        if is_blank(&self.database.path) {
            return Err(ConfigError::MissingField {
                field: "database.path",
            });
        }
        if self.database.busy_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.busy_timeout_ms",
                reason: "must be > 0".into(),
            });
        }
        let p = &self.pipeline;
        if p.id_column.is_empty() {
            return Err(ConfigError::MissingField {
                field: "pipeline.id_column",
            });
        }
        if p.categories_column.is_empty() {
            return Err(ConfigError::MissingField {
                field: "pipeline.categories_column",
            });
        }
        if p.pair_delimiter == p.value_delimiter {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.value_delimiter",
                reason: format!("'{}' is also the pair delimiter", p.value_delimiter),
            });
        }
        if p.table_name.is_empty()
            || !p
                .table_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.table_name",
                reason: format!("'{}' is not a plain identifier", p.table_name),
            });
        }
        Ok(())
    }
}

fn is_blank(path: &Path) -> bool {
    path.to_string_lossy().trim().is_empty()
}
