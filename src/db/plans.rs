//! Workout plans and their per-weekday day slots

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Database, format_timestamp, parse_timestamp};
use crate::error::{Result, StoreError};

/// Named multi-day workout schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: i64,
    pub name: String,
    pub days_per_week: i32,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// One weekday slot inside a plan (day_number: Monday=1 … Sunday=7)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub id: i64,
    pub plan_id: i64,
    pub day_number: i32,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanWithDays {
    pub plan: WorkoutPlan,
    pub days: Vec<WorkoutDay>,
}

const PLAN_COLUMNS: &str = "id, name, days_per_week, created_at, is_active";
const DAY_COLUMNS: &str = "id, plan_id, day_number, label";

impl WorkoutPlan {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let created_at: String = row.get(3)?;
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            days_per_week: row.get(2)?,
            created_at: parse_timestamp(3, &created_at)?,
            is_active: row.get(4)?,
        })
    }
}

impl WorkoutDay {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            plan_id: row.get(1)?,
            day_number: row.get(2)?,
            label: row.get(3)?,
        })
    }
}

/// Canned label for a plan day
pub fn day_label(day_number: i32) -> String {
    match day_number {
        1 => "Day 1 - Push".to_string(),
        2 => "Day 2 - Pull".to_string(),
        3 => "Day 3 - Legs".to_string(),
        4 => "Day 4 - Upper Body".to_string(),
        5 => "Day 5 - Lower Body".to_string(),
        6 => "Day 6 - Core".to_string(),
        7 => "Day 7 - Recovery".to_string(),
        n => format!("Day {}", n),
    }
}

impl Database {
    pub fn all_workout_plans(&self) -> Result<Vec<WorkoutPlan>> {
        self.query_plans(&format!("SELECT {PLAN_COLUMNS} FROM workout_plans ORDER BY id"))
    }

    pub fn active_workout_plans(&self) -> Result<Vec<WorkoutPlan>> {
        self.query_plans(&format!(
            "SELECT {PLAN_COLUMNS} FROM workout_plans WHERE is_active = 1 ORDER BY id"
        ))
    }

    fn query_plans(&self, sql: &str) -> Result<Vec<WorkoutPlan>> {
        let mut stmt = self.conn().prepare(sql)?;
        let plans = stmt
            .query_map([], WorkoutPlan::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(plans)
    }

    pub fn workout_plan_by_id(&self, id: i64) -> Result<Option<WorkoutPlan>> {
        Ok(self
            .conn()
            .query_row(
                &format!("SELECT {PLAN_COLUMNS} FROM workout_plans WHERE id = ?1"),
                params![id],
                WorkoutPlan::from_row,
            )
            .optional()?)
    }

    /// Insert a plan row; `plan.id` is ignored
    pub fn insert_workout_plan(&self, plan: &WorkoutPlan) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO workout_plans (name, days_per_week, created_at, is_active)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                plan.name,
                plan.days_per_week,
                format_timestamp(&plan.created_at),
                plan.is_active,
            ],
        )?;
        let id = self.conn().last_insert_rowid();
        debug!("Inserted workout plan {} ({})", id, plan.name);
        Ok(id)
    }

    pub fn update_workout_plan(&self, plan: &WorkoutPlan) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE workout_plans
             SET name = ?1, days_per_week = ?2, created_at = ?3, is_active = ?4
             WHERE id = ?5",
            params![
                plan.name,
                plan.days_per_week,
                format_timestamp(&plan.created_at),
                plan.is_active,
                plan.id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::PlanNotFound(plan.id));
        }
        debug!("Updated workout plan {}", plan.id);
        Ok(())
    }

    /// Delete a plan, its days (cascade) and its weekday associations
    pub fn delete_workout_plan(&self, id: i64) -> Result<()> {
        self.transaction(|db| {
            db.delete_weekday_exercises_for_plan(id)?;
            db.conn()
                .execute("DELETE FROM workout_plans WHERE id = ?1", params![id])?;
            Ok(())
        })?;
        info!("Deleted workout plan {}", id);
        Ok(())
    }

    pub fn workout_days_by_plan(&self, plan_id: i64) -> Result<Vec<WorkoutDay>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {DAY_COLUMNS} FROM workout_days WHERE plan_id = ?1 ORDER BY day_number"
        ))?;
        let days = stmt
            .query_map(params![plan_id], WorkoutDay::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(days)
    }

    pub fn workout_day_by_id(&self, id: i64) -> Result<Option<WorkoutDay>> {
        Ok(self
            .conn()
            .query_row(
                &format!("SELECT {DAY_COLUMNS} FROM workout_days WHERE id = ?1"),
                params![id],
                WorkoutDay::from_row,
            )
            .optional()?)
    }

    pub fn insert_workout_day(&self, plan_id: i64, day_number: i32, label: &str) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO workout_days (plan_id, day_number, label) VALUES (?1, ?2, ?3)",
            params![plan_id, day_number, label],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Insert several days at once; ids come back in input order
    pub fn insert_workout_days(&self, days: &[WorkoutDay]) -> Result<Vec<i64>> {
        debug!("Inserting {} workout days", days.len());
        self.transaction(|db| {
            days.iter()
                .map(|d| db.insert_workout_day(d.plan_id, d.day_number, &d.label))
                .collect()
        })
    }

    pub fn update_workout_day(&self, day: &WorkoutDay) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE workout_days SET plan_id = ?1, day_number = ?2, label = ?3 WHERE id = ?4",
            params![day.plan_id, day.day_number, day.label, day.id],
        )?;
        if changed == 0 {
            return Err(StoreError::DayNotFound(day.id));
        }
        Ok(())
    }

    pub fn delete_workout_day(&self, id: i64) -> Result<()> {
        self.conn()
            .execute("DELETE FROM workout_days WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn plan_with_days(&self, plan_id: i64) -> Result<Option<WorkoutPlanWithDays>> {
        let Some(plan) = self.workout_plan_by_id(plan_id)? else {
            return Ok(None);
        };
        let days = self.workout_days_by_plan(plan_id)?;
        Ok(Some(WorkoutPlanWithDays { plan, days }))
    }

    fn deactivate_all_plans(&self) -> Result<()> {
        self.conn()
            .execute("UPDATE workout_plans SET is_active = 0 WHERE is_active = 1", [])?;
        Ok(())
    }

    /// Make `id` the only active plan.
    ///
    /// Deactivate-all and activate-one run in one transaction, so a failure
    /// between them leaves the previous active plan in place.
    pub fn activate_workout_plan(&self, id: i64) -> Result<()> {
        self.activate_workout_plan_with(id, |_| Ok(()))
    }

    /// `between` runs after deactivation and before activation
    pub(crate) fn activate_workout_plan_with(
        &self,
        id: i64,
        between: impl FnOnce(&Self) -> Result<()>,
    ) -> Result<()> {
        self.transaction(|db| {
            db.deactivate_all_plans()?;
            between(db)?;
            let changed = db.conn().execute(
                "UPDATE workout_plans SET is_active = 1 WHERE id = ?1",
                params![id],
            )?;
            if changed == 0 {
                warn!("Plan not found: {}", id);
                return Err(StoreError::PlanNotFound(id));
            }
            Ok(())
        })?;
        info!("Activated workout plan {}", id);
        Ok(())
    }

    /// Create an active plan with one labeled day per day number 1..=days_per_week.
    ///
    /// The day count is clamped into 1..=7; every other plan is deactivated.
    pub fn create_workout_plan(&self, name: &str, days_per_week: i32) -> Result<i64> {
        let days = days_per_week.clamp(1, 7);
        if days != days_per_week {
            warn!("Clamped day count {} to {}", days_per_week, days);
        }

        let plan_id = self.transaction(|db| {
            db.deactivate_all_plans()?;
            let plan_id = db.insert_workout_plan(&WorkoutPlan {
                id: 0,
                name: name.to_string(),
                days_per_week: days,
                created_at: Utc::now(),
                is_active: true,
            })?;
            for day_number in 1..=days {
                db.insert_workout_day(plan_id, day_number, &day_label(day_number))?;
            }
            Ok(plan_id)
        })?;

        info!("Created workout plan {} ({}) with {} days", plan_id, name, days);
        Ok(plan_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(db: &Database, plan_id: i64) -> Vec<String> {
        db.workout_days_by_plan(plan_id)
            .unwrap()
            .into_iter()
            .map(|d| d.label)
            .collect()
    }

    fn active_ids(db: &Database) -> Vec<i64> {
        db.active_workout_plans()
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect()
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label(1), "Day 1 - Push");
        assert_eq!(day_label(4), "Day 4 - Upper Body");
        assert_eq!(day_label(7), "Day 7 - Recovery");
        assert_eq!(day_label(8), "Day 8");
        assert_eq!(day_label(0), "Day 0");
    }

    #[test]
    fn test_create_push_pull_legs() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_workout_plan("Push/Pull/Legs", 3).unwrap();

        let plan = db.workout_plan_by_id(id).unwrap().unwrap();
        assert_eq!(plan.name, "Push/Pull/Legs");
        assert_eq!(plan.days_per_week, 3);
        assert!(plan.is_active);
        assert_eq!(
            labels(&db, id),
            vec!["Day 1 - Push", "Day 2 - Pull", "Day 3 - Legs"]
        );
    }

    #[test]
    fn test_create_clamps_day_count() {
        let db = Database::open_in_memory().unwrap();

        let big = db.create_workout_plan("Every day", 10).unwrap();
        assert_eq!(db.workout_days_by_plan(big).unwrap().len(), 7);
        assert_eq!(db.workout_plan_by_id(big).unwrap().unwrap().days_per_week, 7);

        let none = db.create_workout_plan("Rest", 0).unwrap();
        assert_eq!(labels(&db, none), vec!["Day 1 - Push"]);
    }

    #[test]
    fn test_create_deactivates_previous() {
        let db = Database::open_in_memory().unwrap();
        let first = db.create_workout_plan("A", 2).unwrap();
        let second = db.create_workout_plan("B", 2).unwrap();

        assert_eq!(active_ids(&db), vec![second]);
        assert!(!db.workout_plan_by_id(first).unwrap().unwrap().is_active);
    }

    #[test]
    fn test_activate_switches_active_plan() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_workout_plan("A", 3).unwrap();
        let b = db.create_workout_plan("B", 3).unwrap();
        db.activate_workout_plan(a).unwrap();
        assert_eq!(active_ids(&db), vec![a]);

        db.activate_workout_plan(b).unwrap();

        assert_eq!(active_ids(&db), vec![b]);
    }

    #[test]
    fn test_activate_missing_plan_keeps_previous() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_workout_plan("A", 3).unwrap();

        let err = db.activate_workout_plan(999).unwrap_err();

        assert!(matches!(err, StoreError::PlanNotFound(999)));
        assert_eq!(active_ids(&db), vec![a]);
    }

    #[test]
    fn test_activate_failure_between_steps_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_workout_plan("A", 3).unwrap();
        let b = db.create_workout_plan("B", 3).unwrap();
        db.activate_workout_plan(a).unwrap();

        let result = db.activate_workout_plan_with(b, |db| {
            // Both plans are inactive at this point inside the transaction
            assert!(db.active_workout_plans()?.is_empty());
            Err(StoreError::PlanNotFound(-1))
        });

        assert!(result.is_err());
        assert_eq!(active_ids(&db), vec![a]);
    }

    #[test]
    fn test_update_plan() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_workout_plan("Old", 2).unwrap();
        let mut plan = db.workout_plan_by_id(id).unwrap().unwrap();
        plan.name = "New".to_string();

        db.update_workout_plan(&plan).unwrap();

        let stored = db.workout_plan_by_id(id).unwrap().unwrap();
        assert_eq!(stored.name, "New");
        assert_eq!(stored.created_at, plan.created_at);
    }

    #[test]
    fn test_update_missing_plan() {
        let db = Database::open_in_memory().unwrap();
        let plan = WorkoutPlan {
            id: 5,
            name: "Ghost".to_string(),
            days_per_week: 1,
            created_at: Utc::now(),
            is_active: false,
        };
        assert!(matches!(db.update_workout_plan(&plan), Err(StoreError::PlanNotFound(5))));
    }

    #[test]
    fn test_delete_cascades_days_and_weekday_links() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_workout_plan("Temp", 3).unwrap();
        db.insert_weekday_exercises(&[crate::db::PlanExerciseByWeekday {
            plan_id: id,
            day_of_week: 1,
            exercise_id: 7,
        }])
        .unwrap();

        db.delete_workout_plan(id).unwrap();

        assert!(db.workout_plan_by_id(id).unwrap().is_none());
        assert!(db.workout_days_by_plan(id).unwrap().is_empty());
        assert!(db.exercises_for_plan(id).unwrap().is_empty());
    }

    #[test]
    fn test_insert_days_and_plan_with_days() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_workout_plan(&WorkoutPlan {
            id: 0,
            name: "Custom".to_string(),
            days_per_week: 2,
            created_at: Utc::now(),
            is_active: false,
        })
        .unwrap();
        let ids = db
            .insert_workout_days(&[
                WorkoutDay { id: 0, plan_id: id, day_number: 5, label: "Fri".to_string() },
                WorkoutDay { id: 0, plan_id: id, day_number: 2, label: "Tue".to_string() },
            ])
            .unwrap();
        assert_eq!(ids.len(), 2);

        let full = db.plan_with_days(id).unwrap().unwrap();
        let numbers: Vec<_> = full.days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![2, 5]);
        assert!(db.plan_with_days(999).unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete_day() {
        let db = Database::open_in_memory().unwrap();
        let plan = db.create_workout_plan("P", 2).unwrap();
        let mut day = db.workout_days_by_plan(plan).unwrap().remove(0);
        day.label = "Chest day".to_string();

        db.update_workout_day(&day).unwrap();
        assert_eq!(db.workout_day_by_id(day.id).unwrap().unwrap().label, "Chest day");

        db.delete_workout_day(day.id).unwrap();
        assert!(db.workout_day_by_id(day.id).unwrap().is_none());
        assert_eq!(db.workout_days_by_plan(plan).unwrap().len(), 1);

        let err = db.update_workout_day(&day).unwrap_err();
        assert!(matches!(err, StoreError::DayNotFound(id) if id == day.id));
    }
}
