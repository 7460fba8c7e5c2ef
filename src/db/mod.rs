//! Database module - SQLite storage for plans, exercises and workout history

pub mod day_exercises;
pub mod exercises;
pub mod history;
pub mod muscle_groups;
pub mod plans;
pub mod profile;
pub mod weekday_plan;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use rusqlite::types::Type;
use tracing::{debug, warn};

use crate::error::Result;

pub use day_exercises::{DayExerciseAssignment, DayExerciseDetail, WorkoutDayWithExercises};
pub use exercises::Exercise;
pub use history::{ProgressStats, WorkoutSummary};
pub use muscle_groups::MuscleGroup;
pub use plans::{WorkoutDay, WorkoutPlan, WorkoutPlanWithDays, day_label};
pub use profile::{FITNESS_GOALS, UserProfile};
pub use weekday_plan::{ExercisesByDay, PlanExerciseByWeekday, WorkoutPlanModel};

/// Bumped whenever a table definition changes; a mismatch drops and recreates everything
pub const SCHEMA_VERSION: i32 = 2;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS muscle_groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exercises (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    muscle_group_id INTEGER NOT NULL
        REFERENCES muscle_groups(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    video_url TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_exercises_muscle_group ON exercises(muscle_group_id);

CREATE TABLE IF NOT EXISTS workout_plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    days_per_week INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS workout_days (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plan_id INTEGER NOT NULL
        REFERENCES workout_plans(id) ON DELETE CASCADE,
    day_number INTEGER NOT NULL,
    label TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_workout_days_plan ON workout_days(plan_id);

CREATE TABLE IF NOT EXISTS day_exercises (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    day_id INTEGER NOT NULL
        REFERENCES workout_days(id) ON DELETE CASCADE,
    exercise_id INTEGER NOT NULL
        REFERENCES exercises(id) ON DELETE RESTRICT,
    set_count INTEGER NOT NULL,
    rep_count INTEGER NOT NULL,
    order_index INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_day_exercises_day ON day_exercises(day_id);
CREATE INDEX IF NOT EXISTS idx_day_exercises_exercise ON day_exercises(exercise_id);

CREATE TABLE IF NOT EXISTS plan_exercise_by_weekday (
    plan_id INTEGER NOT NULL,
    day_of_week INTEGER NOT NULL,
    exercise_id INTEGER NOT NULL,
    PRIMARY KEY (plan_id, day_of_week, exercise_id)
);

CREATE TABLE IF NOT EXISTS workout_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plan_id INTEGER,
    day_id INTEGER,
    completed_at TEXT NOT NULL,
    exercises_completed INTEGER NOT NULL,
    duration_secs INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS user_profile (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    name TEXT NOT NULL,
    weight_kg REAL NOT NULL,
    height_cm INTEGER NOT NULL,
    fitness_goal TEXT NOT NULL
);
";

// Children first so foreign keys never block the drop
const DROP_TABLES: &str = "
DROP TABLE IF EXISTS user_profile;
DROP TABLE IF EXISTS workout_history;
DROP TABLE IF EXISTS plan_exercise_by_weekday;
DROP TABLE IF EXISTS day_exercises;
DROP TABLE IF EXISTS workout_days;
DROP TABLE IF EXISTS workout_plans;
DROP TABLE IF EXISTS exercises;
DROP TABLE IF EXISTS muscle_groups;
";

/// Database wrapper
///
/// One handle is opened at process start and passed explicitly to whatever
/// needs it.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Fresh private database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create tables, dropping everything first if the stored version differs
    fn init_schema(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == SCHEMA_VERSION {
            debug!("Schema version {} up to date", version);
            return Ok(());
        }

        if version != 0 {
            warn!(
                "Schema version mismatch (found {}, expected {}), recreating tables",
                version, SCHEMA_VERSION
            );
        }
        self.conn.execute_batch(DROP_TABLES)?;
        self.conn.execute_batch(CREATE_TABLES)?;
        self.conn
            .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(())
    }

    /// Stored schema version
    pub fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Run `f` inside a single transaction: commit on `Ok`, roll back on `Err`.
    ///
    /// Calls made while a transaction is already open join it instead of
    /// starting a nested one.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        if !self.conn.is_autocommit() {
            return f(self);
        }

        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Timestamps are stored as second-precision RFC 3339 in UTC so they sort as text
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(db: &Database) -> i64 {
        db.conn()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn test_open_in_memory_creates_schema() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(table_count(&db), 8);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let enabled: i32 = db
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keep.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::open(path).unwrap();
            db.insert_muscle_group("Chest").unwrap();
        }

        let db = Database::open(path).unwrap();
        assert_eq!(db.all_muscle_groups().unwrap().len(), 1);
    }

    #[test]
    fn test_version_mismatch_drops_and_recreates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::open(path).unwrap();
            db.insert_muscle_group("Chest").unwrap();
            db.conn()
                .pragma_update(None, "user_version", SCHEMA_VERSION + 1)
                .unwrap();
        }

        let db = Database::open(path).unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
        assert!(db.all_muscle_groups().unwrap().is_empty());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();

        let result: Result<()> = db.transaction(|db| {
            db.insert_muscle_group("Chest")?;
            Err(crate::error::StoreError::PlanNotFound(42))
        });

        assert!(result.is_err());
        assert!(db.all_muscle_groups().unwrap().is_empty());
    }

    #[test]
    fn test_nested_transaction_joins_outer() {
        let db = Database::open_in_memory().unwrap();

        db.transaction(|db| {
            db.insert_muscle_group("Chest")?;
            db.transaction(|db| db.insert_muscle_group("Back"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(db.all_muscle_groups().unwrap().len(), 2);
    }

    #[test]
    fn test_timestamp_roundtrip_is_second_precision() {
        let ts = DateTime::parse_from_rfc3339("2024-03-04T10:15:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let raw = format_timestamp(&ts);
        assert_eq!(raw, "2024-03-04T10:15:30Z");
        assert_eq!(parse_timestamp(0, &raw).unwrap(), ts);
        assert!(parse_timestamp(0, "yesterday").is_err());
    }
}
