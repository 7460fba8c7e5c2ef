//! Exercise catalogue - many exercises per muscle group

use rusqlite::{OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Database;
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub muscle_group_id: i64,
    pub name: String,
    pub description: String,
    pub video_url: String,
}

pub(crate) const EXERCISE_COLUMNS: &str = "id, muscle_group_id, name, description, video_url";

impl Exercise {
    /// Map a row selected with `EXERCISE_COLUMNS` starting at `offset`
    pub(crate) fn from_row_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            muscle_group_id: row.get(offset + 1)?,
            name: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
            video_url: row.get(offset + 4)?,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Self::from_row_at(row, 0)
    }
}

impl Database {
    pub fn all_exercises(&self) -> Result<Vec<Exercise>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY id"))?;
        let exercises = stmt
            .query_map([], Exercise::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(exercises)
    }

    pub fn exercise_by_id(&self, id: i64) -> Result<Option<Exercise>> {
        Ok(self
            .conn()
            .query_row(
                &format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = ?1"),
                params![id],
                Exercise::from_row,
            )
            .optional()?)
    }

    pub fn exercises_by_muscle_group(&self, muscle_group_id: i64) -> Result<Vec<Exercise>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE muscle_group_id = ?1 ORDER BY id"
        ))?;
        let exercises = stmt
            .query_map(params![muscle_group_id], Exercise::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(exercises)
    }

    pub fn insert_exercise(
        &self,
        muscle_group_id: i64,
        name: &str,
        description: &str,
        video_url: &str,
    ) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO exercises (muscle_group_id, name, description, video_url)
             VALUES (?1, ?2, ?3, ?4)",
            params![muscle_group_id, name, description, video_url],
        )?;
        let id = self.conn().last_insert_rowid();
        debug!("Inserted exercise {} ({}) into group {}", id, name, muscle_group_id);
        Ok(id)
    }

    pub fn update_exercise(&self, exercise: &Exercise) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE exercises
             SET muscle_group_id = ?1, name = ?2, description = ?3, video_url = ?4
             WHERE id = ?5",
            params![
                exercise.muscle_group_id,
                exercise.name,
                exercise.description,
                exercise.video_url,
                exercise.id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::ExerciseNotFound(exercise.id));
        }
        Ok(())
    }

    /// Delete an exercise; refused while any plan day still assigns it
    pub fn delete_exercise(&self, id: i64) -> Result<()> {
        match self
            .conn()
            .execute("DELETE FROM exercises WHERE id = ?1", params![id])
        {
            Ok(_) => {
                debug!("Deleted exercise {}", id);
                Ok(())
            }
            Err(e) if StoreError::is_foreign_key_violation(&e) => Err(StoreError::ExerciseInUse(id)),
            Err(e) => Err(e.into()),
        }
    }
}
