//! Completed workout history and progress totals

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Database, format_timestamp, parse_timestamp};
use crate::error::Result;
use crate::schedule::week_start;

/// One finished workout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub id: i64,
    pub plan_id: Option<i64>,
    pub day_id: Option<i64>,
    pub completed_at: DateTime<Utc>,
    pub exercises_completed: i32,
    pub duration_secs: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    /// Workouts completed Monday to Sunday of the current week
    pub weekly_workouts: i64,
    pub exercises_completed: i64,
    pub total_duration_secs: i64,
}

impl Database {
    pub fn record_workout(
        &self,
        plan_id: Option<i64>,
        day_id: Option<i64>,
        completed_at: DateTime<Utc>,
        exercises_completed: i32,
        duration_secs: i64,
    ) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO workout_history (plan_id, day_id, completed_at, exercises_completed, duration_secs)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                plan_id,
                day_id,
                format_timestamp(&completed_at),
                exercises_completed,
                duration_secs,
            ],
        )?;
        let id = self.conn().last_insert_rowid();
        info!(
            "Recorded workout {}: {} exercises in {}s",
            id, exercises_completed, duration_secs
        );
        Ok(id)
    }

    /// Newest first
    pub fn recent_workouts(&self, limit: usize) -> Result<Vec<WorkoutSummary>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, plan_id, day_id, completed_at, exercises_completed, duration_secs
             FROM workout_history
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let completed_at: String = row.get(3)?;
                Ok(WorkoutSummary {
                    id: row.get(0)?,
                    plan_id: row.get(1)?,
                    day_id: row.get(2)?,
                    completed_at: parse_timestamp(3, &completed_at)?,
                    exercises_completed: row.get(4)?,
                    duration_secs: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Weekly count relative to `today`, totals over the whole history
    pub fn progress_stats(&self, today: NaiveDate) -> Result<ProgressStats> {
        let monday = week_start(today).and_time(NaiveTime::default()).and_utc();
        let next_monday = monday + Duration::days(7);

        let weekly_workouts: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM workout_history WHERE completed_at >= ?1 AND completed_at < ?2",
            params![format_timestamp(&monday), format_timestamp(&next_monday)],
            |row| row.get(0),
        )?;
        let (exercises_completed, total_duration_secs): (i64, i64) = self.conn().query_row(
            "SELECT COALESCE(SUM(exercises_completed), 0), COALESCE(SUM(duration_secs), 0)
             FROM workout_history",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(ProgressStats {
            weekly_workouts,
            exercises_completed,
            total_duration_secs,
        })
    }
}
