//! Exercises assigned to a plan day, with prescribed sets and reps

use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::exercises::Exercise;
use super::plans::WorkoutDay;
use super::Database;
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayExerciseAssignment {
    pub id: i64,
    pub day_id: i64,
    pub exercise_id: i64,
    pub set_count: i32,
    pub rep_count: i32,
    pub order_index: i32,
}

/// Assignment joined back to its exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayExerciseDetail {
    pub assignment: DayExerciseAssignment,
    pub exercise: Exercise,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDayWithExercises {
    pub day: WorkoutDay,
    pub exercises: Vec<DayExerciseDetail>,
}

impl DayExerciseAssignment {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            day_id: row.get(1)?,
            exercise_id: row.get(2)?,
            set_count: row.get(3)?,
            rep_count: row.get(4)?,
            order_index: row.get(5)?,
        })
    }
}

impl Database {
    pub fn exercises_for_day(&self, day_id: i64) -> Result<Vec<DayExerciseAssignment>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, day_id, exercise_id, set_count, rep_count, order_index
             FROM day_exercises WHERE day_id = ?1 ORDER BY order_index",
        )?;
        let rows = stmt
            .query_map(params![day_id], DayExerciseAssignment::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn detailed_exercises_for_day(&self, day_id: i64) -> Result<Vec<DayExerciseDetail>> {
        let mut stmt = self.conn().prepare(
            "SELECT de.id, de.day_id, de.exercise_id, de.set_count, de.rep_count, de.order_index,
                    e.id, e.muscle_group_id, e.name, e.description, e.video_url
             FROM day_exercises de
             JOIN exercises e ON e.id = de.exercise_id
             WHERE de.day_id = ?1
             ORDER BY de.order_index",
        )?;
        let rows = stmt
            .query_map(params![day_id], |row| {
                Ok(DayExerciseDetail {
                    assignment: DayExerciseAssignment::from_row(row)?,
                    exercise: Exercise::from_row_at(row, 6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn workout_day_with_exercises(&self, day_id: i64) -> Result<Option<WorkoutDayWithExercises>> {
        let Some(day) = self.workout_day_by_id(day_id)? else {
            return Ok(None);
        };
        let exercises = self.detailed_exercises_for_day(day_id)?;
        Ok(Some(WorkoutDayWithExercises { day, exercises }))
    }

    pub fn insert_day_exercise(
        &self,
        day_id: i64,
        exercise_id: i64,
        set_count: i32,
        rep_count: i32,
        order_index: i32,
    ) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO day_exercises (day_id, exercise_id, set_count, rep_count, order_index)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![day_id, exercise_id, set_count, rep_count, order_index],
        )?;
        let id = self.conn().last_insert_rowid();
        debug!("Assigned exercise {} to day {} ({}x{})", exercise_id, day_id, set_count, rep_count);
        Ok(id)
    }

    pub fn insert_day_exercises(&self, rows: &[DayExerciseAssignment]) -> Result<Vec<i64>> {
        self.transaction(|db| {
            rows.iter()
                .map(|r| {
                    db.insert_day_exercise(r.day_id, r.exercise_id, r.set_count, r.rep_count, r.order_index)
                })
                .collect()
        })
    }

    pub fn update_day_exercise(&self, row: &DayExerciseAssignment) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE day_exercises
             SET day_id = ?1, exercise_id = ?2, set_count = ?3, rep_count = ?4, order_index = ?5
             WHERE id = ?6",
            params![row.day_id, row.exercise_id, row.set_count, row.rep_count, row.order_index, row.id],
        )?;
        if changed == 0 {
            return Err(StoreError::AssignmentNotFound(row.id));
        }
        Ok(())
    }

    pub fn delete_day_exercise(&self, id: i64) -> Result<()> {
        self.conn()
            .execute("DELETE FROM day_exercises WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn delete_all_for_day(&self, day_id: i64) -> Result<()> {
        let removed = self
            .conn()
            .execute("DELETE FROM day_exercises WHERE day_id = ?1", params![day_id])?;
        debug!("Cleared {} exercises from day {}", removed, day_id);
        Ok(())
    }
}
