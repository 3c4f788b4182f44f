use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("{path} has no header row")]
    EmptyHeader { path: String },
    #[error("column '{column}' not found in {source_name}")]
    MissingColumn { source_name: String, column: String },
}

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("compound column '{0}' not present")]
    MissingColumn(String),
    #[error("table has no rows; category names cannot be derived")]
    EmptyTable,
    #[error("row {row}: category value is null")]
    NullCategories { row: usize },
    #[error("row {row}: category value is not text")]
    NotText { row: usize },
    #[error("row {row}: expected {expected} category fragments, found {found}")]
    FragmentCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column '{column}': '{fragment}' does not end in a digit")]
    InvalidIndicator {
        row: usize,
        column: String,
        fragment: String,
    },
    #[error("derived column '{0}' collides with an existing column")]
    DuplicateColumn(String),
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid identifier: {0}")]
    InvalidIdent(String),
    #[error("table '{0}' has no columns")]
    NoColumns(String),
    #[error("table '{0}' does not exist")]
    MissingTable(String),
    #[error("sqlite error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
