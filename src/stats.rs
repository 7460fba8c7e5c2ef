//! Workout math, body mass index and exercise list filtering

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::db::Exercise;

/// Estimated one-rep max (Brzycki)
pub fn one_rep_max(weight: f32, reps: i32) -> f32 {
    if reps < 1 {
        weight
    } else {
        weight * (36.0 / (37.0 - reps as f32))
    }
}

/// Total lifted load
pub fn volume(weight: f32, sets: i32, reps: i32) -> f32 {
    weight * sets as f32 * reps as f32
}

/// Next working weight given how the last session went against the target
pub fn suggest_next_weight(current: f32, reps_completed: i32, target_reps: i32) -> f32 {
    if reps_completed >= target_reps + 2 {
        current * 1.05
    } else if reps_completed >= target_reps {
        current * 1.025
    } else if reps_completed <= target_reps - 2 {
        current * 0.95
    } else {
        current
    }
}

/// Body mass index; `None` until both measurements are positive
pub fn bmi(weight_kg: f32, height_cm: i32) -> Option<f32> {
    if weight_kg <= 0.0 || height_cm <= 0 {
        return None;
    }
    let meters = height_cm as f32 / 100.0;
    Some(weight_kg / (meters * meters))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f32) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// "m:ss", or "h:mm:ss" once past an hour
pub fn format_time(secs: i64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Case-insensitive match on name or description; a blank query keeps everything
pub fn filter_by_search(exercises: &[Exercise], query: &str) -> Vec<Exercise> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return exercises.to_vec();
    }

    exercises
        .iter()
        .filter(|e| {
            e.name.to_lowercase().contains(&query) || e.description.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// `None` or 0 means "all groups"
pub fn filter_by_muscle_group(exercises: &[Exercise], muscle_group_id: Option<i64>) -> Vec<Exercise> {
    match muscle_group_id {
        None | Some(0) => exercises.to_vec(),
        Some(id) => exercises
            .iter()
            .filter(|e| e.muscle_group_id == id)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: i64, group: i64, name: &str, description: &str) -> Exercise {
        Exercise {
            id,
            muscle_group_id: group,
            name: name.to_string(),
            description: description.to_string(),
            video_url: String::new(),
        }
    }

    fn catalogue() -> Vec<Exercise> {
        vec![
            exercise(1, 1, "Bench Press", "Lower barbell to chest"),
            exercise(2, 1, "Push-Up", "Plank position, lower chest"),
            exercise(3, 3, "Squat", "Bend knees and hips"),
        ]
    }

    #[test]
    fn test_one_rep_max() {
        assert_eq!(one_rep_max(100.0, 0), 100.0);
        assert_eq!(one_rep_max(100.0, 1), 100.0);
        assert!((one_rep_max(100.0, 10) - 133.33).abs() < 0.01);
    }

    #[test]
    fn test_volume() {
        assert_eq!(volume(50.0, 3, 10), 1500.0);
        assert_eq!(volume(50.0, 0, 10), 0.0);
    }

    #[test]
    fn test_suggest_next_weight() {
        assert!((suggest_next_weight(100.0, 12, 10) - 105.0).abs() < 0.001);
        assert!((suggest_next_weight(100.0, 10, 10) - 102.5).abs() < 0.001);
        assert!((suggest_next_weight(100.0, 11, 10) - 102.5).abs() < 0.001);
        assert_eq!(suggest_next_weight(100.0, 9, 10), 100.0);
        assert!((suggest_next_weight(100.0, 8, 10) - 95.0).abs() < 0.001);
    }

    #[test]
    fn test_bmi() {
        assert!((bmi(70.0, 175).unwrap() - 22.857).abs() < 0.01);
        assert!((bmi(100.0, 200).unwrap() - 25.0).abs() < 0.001);
        assert_eq!(bmi(70.0, 0), None);
        assert_eq!(bmi(0.0, 175), None);
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.9), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
        assert_eq!(BmiCategory::Overweight.to_string(), "Overweight");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(75), "1:15");
        assert_eq!(format_time(3599), "59:59");
        assert_eq!(format_time(3600), "1:00:00");
        assert_eq!(format_time(9000), "2:30:00");
    }

    #[test]
    fn test_filter_by_search() {
        let all = catalogue();
        assert_eq!(filter_by_search(&all, "  ").len(), 3);

        let chest: Vec<_> = filter_by_search(&all, "CHEST").into_iter().map(|e| e.id).collect();
        assert_eq!(chest, vec![1, 2]);

        let squat: Vec<_> = filter_by_search(&all, "squat").into_iter().map(|e| e.id).collect();
        assert_eq!(squat, vec![3]);

        assert!(filter_by_search(&all, "deadlift").is_empty());
    }

    #[test]
    fn test_filter_by_muscle_group() {
        let all = catalogue();
        assert_eq!(filter_by_muscle_group(&all, None).len(), 3);
        assert_eq!(filter_by_muscle_group(&all, Some(0)).len(), 3);
        assert_eq!(filter_by_muscle_group(&all, Some(1)).len(), 2);
        assert!(filter_by_muscle_group(&all, Some(9)).is_empty());
    }
}
