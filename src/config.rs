//! Runtime configuration: CLI flag, then environment (including `.env`), then defaults

use std::env;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DB_PATH: &str = "trainweek.db";
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const DB_PATH_VAR: &str = "TRAINWEEK_DB";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: String,
    pub log_filter: String,
}

impl Config {
    /// Load `.env` if present and resolve against the process environment
    pub fn load(db_flag: Option<String>) -> Self {
        dotenvy::dotenv().ok();
        Self::resolve(db_flag, |key| env::var(key).ok())
    }

    pub fn resolve(db_flag: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            db_path: db_flag
                .or_else(|| non_empty(DB_PATH_VAR))
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            log_filter: non_empty(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Install the global fmt subscriber
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_new(&self.log_filter)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
