//! Plan-by-weekday association: a plan + weekday maps straight to exercise ids
//!
//! Simpler than workout days: no per-day identity, no sets or reps.

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::plans::WorkoutPlan;
use super::Database;
use crate::error::{Result, StoreError};

/// Weekday (Monday=1 … Sunday=7) → exercise ids
pub type ExercisesByDay = BTreeMap<i32, Vec<i64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanExerciseByWeekday {
    pub plan_id: i64,
    pub day_of_week: i32,
    pub exercise_id: i64,
}

/// Plan as edited on the plan screen: name, chosen weekdays, exercises per weekday
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlanModel {
    /// 0 for a plan not yet stored
    pub id: i64,
    pub name: String,
    pub days: Vec<i32>,
    pub exercises_by_day: ExercisesByDay,
}

/// Split one `GROUP_CONCAT` result back into ids, skipping blank segments
pub(crate) fn parse_exercise_list(day: i32, concatenated: &str) -> Result<Vec<i64>> {
    concatenated
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| StoreError::MalformedExerciseList {
                day,
                segment: s.to_string(),
            })
        })
        .collect()
}

impl Database {
    /// Weekday → exercise ids for a plan. Order within a weekday is whatever
    /// `GROUP_CONCAT` yields.
    pub fn exercises_for_plan(&self, plan_id: i64) -> Result<ExercisesByDay> {
        let mut stmt = self.conn().prepare(
            "SELECT day_of_week, GROUP_CONCAT(exercise_id, ',')
             FROM plan_exercise_by_weekday
             WHERE plan_id = ?1
             GROUP BY day_of_week",
        )?;
        let groups = stmt
            .query_map(params![plan_id], |row| {
                Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut map = ExercisesByDay::new();
        for (day, concatenated) in groups {
            map.insert(day, parse_exercise_list(day, &concatenated)?);
        }
        Ok(map)
    }

    /// Insert links; a link that already exists is replaced, not duplicated
    pub fn insert_weekday_exercises(&self, refs: &[PlanExerciseByWeekday]) -> Result<()> {
        self.transaction(|db| {
            let mut stmt = db.conn().prepare(
                "INSERT OR REPLACE INTO plan_exercise_by_weekday (plan_id, day_of_week, exercise_id)
                 VALUES (?1, ?2, ?3)",
            )?;
            for r in refs {
                stmt.execute(params![r.plan_id, r.day_of_week, r.exercise_id])?;
            }
            Ok(())
        })
    }

    pub fn delete_weekday_exercises_for_plan(&self, plan_id: i64) -> Result<()> {
        self.conn().execute(
            "DELETE FROM plan_exercise_by_weekday WHERE plan_id = ?1",
            params![plan_id],
        )?;
        Ok(())
    }

    /// Clear every link of a plan and insert `map` in its place
    pub fn replace_weekday_exercises(&self, plan_id: i64, map: &ExercisesByDay) -> Result<()> {
        let refs: Vec<_> = map
            .iter()
            .flat_map(|(&day_of_week, ids)| {
                ids.iter().map(move |&exercise_id| PlanExerciseByWeekday {
                    plan_id,
                    day_of_week,
                    exercise_id,
                })
            })
            .collect();

        self.transaction(|db| {
            db.delete_weekday_exercises_for_plan(plan_id)?;
            db.insert_weekday_exercises(&refs)
        })?;
        debug!("Replaced weekday links of plan {} ({} rows)", plan_id, refs.len());
        Ok(())
    }

    /// Add the exercise to the weekday if missing, remove it if present.
    /// Returns whether it is assigned afterwards.
    pub fn toggle_weekday_exercise(&self, plan_id: i64, day_of_week: i32, exercise_id: i64) -> Result<bool> {
        self.transaction(|db| {
            let removed = db.conn().execute(
                "DELETE FROM plan_exercise_by_weekday
                 WHERE plan_id = ?1 AND day_of_week = ?2 AND exercise_id = ?3",
                params![plan_id, day_of_week, exercise_id],
            )?;
            if removed > 0 {
                return Ok(false);
            }
            db.insert_weekday_exercises(&[PlanExerciseByWeekday {
                plan_id,
                day_of_week,
                exercise_id,
            }])?;
            Ok(true)
        })
    }

    /// Store a plan model: insert when `id` is 0, otherwise update name and day
    /// count of the existing row. Weekday links are replaced wholesale.
    pub fn save_plan_model(&self, model: &WorkoutPlanModel) -> Result<i64> {
        let plan_id = self.transaction(|db| {
            let days_per_week = model.days.len() as i32;
            let plan_id = if model.id == 0 {
                db.insert_workout_plan(&WorkoutPlan {
                    id: 0,
                    name: model.name.clone(),
                    days_per_week,
                    created_at: Utc::now(),
                    is_active: false,
                })?
            } else {
                let mut plan = db
                    .workout_plan_by_id(model.id)?
                    .ok_or(StoreError::PlanNotFound(model.id))?;
                plan.name = model.name.clone();
                plan.days_per_week = days_per_week;
                db.update_workout_plan(&plan)?;
                model.id
            };
            db.replace_weekday_exercises(plan_id, &model.exercises_by_day)?;
            Ok(plan_id)
        })?;
        info!("Saved plan model {} ({})", plan_id, model.name);
        Ok(plan_id)
    }

    pub fn load_plan_model(&self, plan_id: i64) -> Result<WorkoutPlanModel> {
        let plan = self
            .workout_plan_by_id(plan_id)?
            .ok_or(StoreError::PlanNotFound(plan_id))?;
        let exercises_by_day = self.exercises_for_plan(plan_id)?;
        Ok(WorkoutPlanModel {
            id: plan.id,
            name: plan.name,
            days: exercises_by_day.keys().copied().collect(),
            exercises_by_day,
        })
    }
}
