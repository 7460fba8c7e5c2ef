//! Async facade over the database for front ends
//!
//! rusqlite is blocking, so each call hops onto tokio's blocking pool and
//! locks the shared handle there.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::db::{
    Database, Exercise, ExercisesByDay, MuscleGroup, ProgressStats, UserProfile, WorkoutPlan,
    WorkoutPlanModel, WorkoutSummary,
};
use crate::schedule::{self, WeekSchedule};
use crate::seed;
use crate::session::WorkoutSession;
use crate::stats;

/// Workouts shown in the progress history list
pub const RECENT_WORKOUTS_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub stats: ProgressStats,
    pub recent: Vec<WorkoutSummary>,
}

#[derive(Clone)]
pub struct TrainingService {
    db: Arc<Mutex<Database>>,
}

impl TrainingService {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> crate::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let value = tokio::task::spawn_blocking(move || {
            let db = db.blocking_lock();
            f(&db)
        })
        .await??;
        Ok(value)
    }

    /// Seed the catalogue on first launch
    pub async fn populate(&self) -> Result<bool> {
        self.run(seed::populate_database).await
    }

    /// Muscle groups, or the built-in list if the table cannot be read
    pub async fn muscle_groups(&self) -> Vec<MuscleGroup> {
        match self.run(|db| db.all_muscle_groups()).await {
            Ok(groups) => groups,
            Err(e) => {
                warn!("Failed to load muscle groups, using fallback: {:#}", e);
                seed::fallback_muscle_groups()
            }
        }
    }

    /// Catalogue narrowed by muscle group (`None` or 0 keeps all) and search text
    pub async fn exercises(&self, muscle_group_id: Option<i64>, search: Option<String>) -> Result<Vec<Exercise>> {
        let all = self.run(|db| db.all_exercises()).await?;
        let in_group = stats::filter_by_muscle_group(&all, muscle_group_id);
        Ok(match search {
            Some(q) => stats::filter_by_search(&in_group, &q),
            None => in_group,
        })
    }

    pub async fn plans(&self) -> Result<Vec<WorkoutPlan>> {
        self.run(|db| db.all_workout_plans()).await
    }

    pub async fn create_plan(&self, name: String, days_per_week: i32) -> Result<i64> {
        self.run(move |db| db.create_workout_plan(&name, days_per_week)).await
    }

    pub async fn activate_plan(&self, plan_id: i64) -> Result<()> {
        self.run(move |db| db.activate_workout_plan(plan_id)).await
    }

    pub async fn delete_plan(&self, plan_id: i64) -> Result<()> {
        self.run(move |db| db.delete_workout_plan(plan_id)).await
    }

    pub async fn load_plan_model(&self, plan_id: i64) -> Result<WorkoutPlanModel> {
        self.run(move |db| db.load_plan_model(plan_id)).await
    }

    pub async fn save_plan_model(&self, model: WorkoutPlanModel) -> Result<i64> {
        self.run(move |db| db.save_plan_model(&model)).await
    }

    pub async fn exercises_for_plan(&self, plan_id: i64) -> Result<ExercisesByDay> {
        self.run(move |db| db.exercises_for_plan(plan_id)).await
    }

    /// Replace one weekday's exercises, leaving the other weekdays alone
    pub async fn assign_weekday(&self, plan_id: i64, day_of_week: i32, exercise_ids: Vec<i64>) -> Result<()> {
        self.run(move |db| {
            db.transaction(|db| {
                let mut map = db.exercises_for_plan(plan_id)?;
                if exercise_ids.is_empty() {
                    map.remove(&day_of_week);
                } else {
                    map.insert(day_of_week, exercise_ids);
                }
                db.replace_weekday_exercises(plan_id, &map)
            })
        })
        .await
    }

    pub async fn toggle_weekday_exercise(&self, plan_id: i64, day_of_week: i32, exercise_id: i64) -> Result<bool> {
        self.run(move |db| db.toggle_weekday_exercise(plan_id, day_of_week, exercise_id))
            .await
    }

    pub async fn week_schedule(&self, today: NaiveDate) -> Result<WeekSchedule> {
        self.run(move |db| schedule::week_schedule(db, today)).await
    }

    /// Start a session for the plan day falling on `today`
    pub async fn start_session(&self, plan_id: i64, today: NaiveDate) -> Result<WorkoutSession> {
        let weekday = schedule::day_of_week(today);
        self.run(move |db| WorkoutSession::start(db, plan_id, weekday)).await
    }

    pub async fn complete_session(&self, session: WorkoutSession) -> Result<WorkoutSummary> {
        self.run(move |db| session.complete(db)).await
    }

    pub async fn record_workout(&self, plan_id: Option<i64>, exercises_completed: i32, duration_secs: i64) -> Result<i64> {
        self.run(move |db| {
            db.record_workout(plan_id, None, chrono::Utc::now(), exercises_completed, duration_secs)
        })
        .await
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        self.run(|db| db.load_profile()).await
    }

    pub async fn save_profile(&self, profile: UserProfile) -> Result<()> {
        self.run(move |db| db.save_profile(&profile)).await
    }

    pub async fn progress(&self, today: NaiveDate) -> Result<ProgressReport> {
        self.run(move |db| {
            Ok(ProgressReport {
                stats: db.progress_stats(today)?,
                recent: db.recent_workouts(RECENT_WORKOUTS_LIMIT)?,
            })
        })
        .await
    }
}
