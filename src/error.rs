//! Error types for the storage layer

use thiserror::Error;

/// Failures raised by database operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("workout plan {0} not found")]
    PlanNotFound(i64),

    #[error("workout day {0} not found")]
    DayNotFound(i64),

    #[error("muscle group {0} not found")]
    MuscleGroupNotFound(i64),

    #[error("exercise {0} not found")]
    ExerciseNotFound(i64),

    #[error("day exercise {0} not found")]
    AssignmentNotFound(i64),

    #[error("exercise {0} is assigned to a workout day and cannot be deleted")]
    ExerciseInUse(i64),

    #[error("muscle group {0} has exercises assigned to a workout day and cannot be deleted")]
    MuscleGroupInUse(i64),

    #[error("malformed exercise list for weekday {day}: {segment:?}")]
    MalformedExerciseList { day: i32, segment: String },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// True when SQLite rejected a statement because of a foreign key
    ///
    /// `ON DELETE RESTRICT` runs as an action trigger, so it surfaces as
    /// `SQLITE_CONSTRAINT_TRIGGER` carrying the foreign key message.
    pub fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
        match err {
            rusqlite::Error::SqliteFailure(e, msg) => {
                e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                    || (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER
                        && msg.as_deref().is_some_and(|m| m.contains("FOREIGN KEY")))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn failure(extended_code: i32, msg: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(extended_code), Some(msg.to_string()))
    }

    #[test]
    fn test_foreign_key_violation_codes() {
        assert!(StoreError::is_foreign_key_violation(&failure(
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            "FOREIGN KEY constraint failed"
        )));
        assert!(StoreError::is_foreign_key_violation(&failure(
            ffi::SQLITE_CONSTRAINT_TRIGGER,
            "FOREIGN KEY constraint failed"
        )));
        assert!(!StoreError::is_foreign_key_violation(&failure(
            ffi::SQLITE_CONSTRAINT_TRIGGER,
            "custom abort"
        )));
        assert!(!StoreError::is_foreign_key_violation(&failure(
            ffi::SQLITE_CONSTRAINT_UNIQUE,
            "UNIQUE constraint failed"
        )));
        assert!(!StoreError::is_foreign_key_violation(&rusqlite::Error::QueryReturnedNoRows));
    }
}
