//! Weekly calendar - which plan day and exercises fall on each date of the week

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::{Database, WorkoutDay, WorkoutPlan};
use crate::error::Result;

/// Weekday number used throughout the schema: Monday=1 … Sunday=7
pub fn day_of_week(date: NaiveDate) -> i32 {
    date.weekday().number_from_monday() as i32
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The seven dates Monday..Sunday of the week containing `date`
pub fn week_dates(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = week_start(date);
    (0..7).map(|i| monday + Duration::days(i)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub workout_day: Option<WorkoutDay>,
    pub exercise_ids: Vec<i64>,
}

impl DaySchedule {
    pub fn is_rest_day(&self) -> bool {
        self.workout_day.is_none() && self.exercise_ids.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekSchedule {
    pub plan: Option<WorkoutPlan>,
    pub days: Vec<DaySchedule>,
}

impl WeekSchedule {
    pub fn today(&self, today: NaiveDate) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.date == today)
    }
}

/// Build the calendar for the week containing `today` from the first active plan
pub fn week_schedule(db: &Database, today: NaiveDate) -> Result<WeekSchedule> {
    let plan = db.active_workout_plans()?.into_iter().next();

    let (days, exercises) = match &plan {
        Some(p) => (db.workout_days_by_plan(p.id)?, db.exercises_for_plan(p.id)?),
        None => Default::default(),
    };

    let schedule = week_dates(today)
        .into_iter()
        .map(|date| {
            let weekday = day_of_week(date);
            DaySchedule {
                date,
                workout_day: days.iter().find(|d| d.day_number == weekday).cloned(),
                exercise_ids: exercises.get(&weekday).cloned().unwrap_or_default(),
            }
        })
        .collect();

    Ok(WeekSchedule { plan, days: schedule })
}
