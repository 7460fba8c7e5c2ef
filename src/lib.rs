//! trainweek - weekly workout planner
//!
//! Exercise catalogue by muscle group, multi-day plans, a weekly calendar,
//! timed sessions and progress totals, all on one SQLite file.

pub mod config;
pub mod db;
pub mod error;
pub mod schedule;
pub mod seed;
pub mod service;
pub mod session;
pub mod stats;

pub use db::Database;
pub use error::StoreError;
pub use service::TrainingService;
