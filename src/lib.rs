pub mod clean;
pub mod cli;
pub mod config;
pub mod db;
pub mod load;
pub mod metrics;
pub mod models;
pub mod orchestrator;

pub mod error;
