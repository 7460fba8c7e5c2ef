//! Timed workout session for today's plan day

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::{Database, Exercise, WorkoutSummary};
use crate::error::Result;

/// Pausable elapsed-time counter
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Stopwatch {
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// No-op when already running
    pub fn start_at(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    pub fn toggle(&mut self) {
        self.toggle_at(Instant::now());
    }

    pub fn toggle_at(&mut self, now: Instant) {
        if self.is_running() {
            self.pause_at(now);
        } else {
            self.start_at(now);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub target_reps: i32,
    pub completed_reps: Option<i32>,
    pub weight: Option<f32>,
    pub is_completed: bool,
}

impl WorkoutSet {
    fn pending(target_reps: i32) -> Self {
        Self {
            target_reps,
            completed_reps: None,
            weight: None,
            is_completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseWithSets {
    pub exercise: Exercise,
    pub sets: Vec<WorkoutSet>,
}

impl ExerciseWithSets {
    pub fn is_completed(&self) -> bool {
        !self.sets.is_empty() && self.sets.iter().all(|s| s.is_completed)
    }
}

/// In-progress workout
pub struct WorkoutSession {
    plan_id: i64,
    day_id: Option<i64>,
    exercises: Vec<ExerciseWithSets>,
    checked: HashMap<i64, bool>,
    stopwatch: Stopwatch,
}

impl WorkoutSession {
    /// Load the plan day matching `weekday` and start the clock
    pub fn start(db: &Database, plan_id: i64, weekday: i32) -> Result<Self> {
        Self::start_at(db, plan_id, weekday, Instant::now())
    }

    pub fn start_at(db: &Database, plan_id: i64, weekday: i32, now: Instant) -> Result<Self> {
        let day = db
            .workout_days_by_plan(plan_id)?
            .into_iter()
            .find(|d| d.day_number == weekday);

        let exercises = match &day {
            Some(day) => db
                .detailed_exercises_for_day(day.id)?
                .into_iter()
                .map(|detail| ExerciseWithSets {
                    sets: (0..detail.assignment.set_count)
                        .map(|_| WorkoutSet::pending(detail.assignment.rep_count))
                        .collect(),
                    exercise: detail.exercise,
                })
                .collect(),
            None => Vec::new(),
        };

        info!(
            "Started workout for plan {} weekday {} ({} exercises)",
            plan_id,
            weekday,
            exercises.len()
        );

        let mut stopwatch = Stopwatch::default();
        stopwatch.start_at(now);

        Ok(Self {
            plan_id,
            day_id: day.map(|d| d.id),
            exercises,
            checked: HashMap::new(),
            stopwatch,
        })
    }

    pub fn plan_id(&self) -> i64 {
        self.plan_id
    }

    pub fn day_id(&self) -> Option<i64> {
        self.day_id
    }

    pub fn exercises(&self) -> &[ExerciseWithSets] {
        &self.exercises
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn stopwatch_mut(&mut self) -> &mut Stopwatch {
        &mut self.stopwatch
    }

    /// Mark one set done. False if the exercise or set index is unknown.
    pub fn record_set(&mut self, exercise_id: i64, set_index: usize, reps: i32, weight: f32) -> bool {
        let Some(entry) = self.exercises.iter_mut().find(|e| e.exercise.id == exercise_id) else {
            return false;
        };
        let Some(set) = entry.sets.get_mut(set_index) else {
            return false;
        };

        set.completed_reps = Some(reps);
        set.weight = Some(weight);
        set.is_completed = true;
        debug!("Exercise {} set {}: {} reps @ {}", exercise_id, set_index, reps, weight);
        true
    }

    pub fn set_checked(&mut self, exercise_id: i64, done: bool) {
        self.checked.insert(exercise_id, done);
    }

    pub fn is_checked(&self, exercise_id: i64) -> bool {
        self.checked.get(&exercise_id).copied().unwrap_or(false)
    }

    /// Exercises with every set recorded
    pub fn exercises_completed(&self) -> i32 {
        self.exercises.iter().filter(|e| e.is_completed()).count() as i32
    }

    /// Stop the clock and store the session in history
    pub fn complete(self, db: &Database) -> Result<WorkoutSummary> {
        self.complete_at(db, Instant::now(), Utc::now())
    }

    pub fn complete_at(
        mut self,
        db: &Database,
        now: Instant,
        completed_at: DateTime<Utc>,
    ) -> Result<WorkoutSummary> {
        self.stopwatch.pause_at(now);
        let duration_secs = self.stopwatch.elapsed_at(now).as_secs() as i64;
        let exercises_completed = self.exercises_completed();

        let id = db.record_workout(
            Some(self.plan_id),
            self.day_id,
            completed_at,
            exercises_completed,
            duration_secs,
        )?;

        Ok(WorkoutSummary {
            id,
            plan_id: Some(self.plan_id),
            day_id: self.day_id,
            completed_at,
            exercises_completed,
            duration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    /// Plan whose Monday holds bench (3x10) and push-up (2x15)
    fn setup() -> (Database, i64, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let chest = db.insert_muscle_group("Chest").unwrap();
        let bench = db.insert_exercise(chest, "Bench Press", "", "").unwrap();
        let pushup = db.insert_exercise(chest, "Push-Up", "", "").unwrap();
        let plan = db.create_workout_plan("Chest", 2).unwrap();
        let monday = db.workout_days_by_plan(plan).unwrap()[0].id;
        db.insert_day_exercise(monday, pushup, 2, 15, 1).unwrap();
        db.insert_day_exercise(monday, bench, 3, 10, 0).unwrap();
        (db, plan, bench, pushup)
    }

    #[test]
    fn test_stopwatch_accumulates_across_pauses() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::default();
        assert_eq!(sw.elapsed_at(t0), Duration::ZERO);

        sw.start_at(t0);
        sw.start_at(t0 + secs(5)); // already running
        sw.pause_at(t0 + secs(10));
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed_at(t0 + secs(100)), secs(10));

        sw.toggle_at(t0 + secs(20));
        assert!(sw.is_running());
        assert_eq!(sw.elapsed_at(t0 + secs(25)), secs(15));

        sw.toggle_at(t0 + secs(30));
        assert_eq!(sw.elapsed_at(t0 + secs(40)), secs(20));

        sw.reset();
        assert_eq!(sw.elapsed_at(t0 + secs(40)), Duration::ZERO);
    }

    #[test]
    fn test_start_builds_default_sets() {
        let (db, plan, bench, pushup) = setup();

        let session = WorkoutSession::start(&db, plan, 1).unwrap();

        assert!(session.stopwatch().is_running());
        assert!(session.day_id().is_some());
        let exercises = session.exercises();
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].exercise.id, bench);
        assert_eq!(exercises[0].sets, vec![WorkoutSet::pending(10); 3]);
        assert_eq!(exercises[1].exercise.id, pushup);
        assert_eq!(exercises[1].sets.len(), 2);
        assert_eq!(exercises[1].sets[0].target_reps, 15);
    }

    #[test]
    fn test_start_without_matching_day_is_empty() {
        let (db, plan, _, _) = setup();

        let session = WorkoutSession::start(&db, plan, 6).unwrap();

        assert!(session.exercises().is_empty());
        assert!(session.day_id().is_none());
    }

    #[test]
    fn test_record_set() {
        let (db, plan, bench, _) = setup();
        let mut session = WorkoutSession::start(&db, plan, 1).unwrap();

        assert!(session.record_set(bench, 1, 8, 60.0));
        let set = &session.exercises()[0].sets[1];
        assert_eq!(set.completed_reps, Some(8));
        assert_eq!(set.weight, Some(60.0));
        assert!(set.is_completed);
        assert_eq!(set.target_reps, 10);

        assert!(!session.record_set(bench, 3, 8, 60.0));
        assert!(!session.record_set(9999, 0, 8, 60.0));
    }

    #[test]
    fn test_exercises_completed_counts_finished_only() {
        let (db, plan, bench, pushup) = setup();
        let mut session = WorkoutSession::start(&db, plan, 1).unwrap();
        for i in 0..3 {
            session.record_set(bench, i, 10, 60.0);
        }
        session.record_set(pushup, 0, 15, 0.0);
        // Re-recording a set must not count twice
        session.record_set(bench, 2, 9, 60.0);

        assert_eq!(session.exercises_completed(), 1);
    }

    #[test]
    fn test_checklist() {
        let (db, plan, bench, _) = setup();
        let mut session = WorkoutSession::start(&db, plan, 1).unwrap();

        assert!(!session.is_checked(bench));
        session.set_checked(bench, true);
        assert!(session.is_checked(bench));
        session.set_checked(bench, false);
        assert!(!session.is_checked(bench));
    }

    #[test]
    fn test_complete_records_history() {
        let (db, plan, bench, _) = setup();
        let t0 = Instant::now();
        let mut session = WorkoutSession::start_at(&db, plan, 1, t0).unwrap();
        for i in 0..3 {
            session.record_set(bench, i, 10, 60.0);
        }
        session.stopwatch_mut().pause_at(t0 + secs(600));
        session.stopwatch_mut().start_at(t0 + secs(900));

        let finished = Utc.with_ymd_and_hms(2024, 3, 4, 19, 0, 0).unwrap();
        let summary = session.complete_at(&db, t0 + secs(1500), finished).unwrap();

        assert_eq!(summary.duration_secs, 1200);
        assert_eq!(summary.exercises_completed, 1);
        assert_eq!(summary.plan_id, Some(plan));

        let stored = db.recent_workouts(10).unwrap();
        assert_eq!(stored, vec![summary]);
    }
}
