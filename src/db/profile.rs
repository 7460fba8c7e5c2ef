//! User profile - a single settings row with body measurements and goal

use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Database;
use crate::error::Result;
use crate::stats::{self, BmiCategory};

/// Goals offered when editing the profile
pub const FITNESS_GOALS: [&str; 4] = [
    "Build Muscle",
    "Lose Weight",
    "Improve Fitness",
    "Increase Strength",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub weight_kg: f32,
    pub height_cm: i32,
    pub fitness_goal: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            weight_kg: 70.0,
            height_cm: 175,
            fitness_goal: FITNESS_GOALS[0].to_string(),
        }
    }
}

impl UserProfile {
    pub fn bmi(&self) -> Option<f32> {
        stats::bmi(self.weight_kg, self.height_cm)
    }

    pub fn bmi_category(&self) -> Option<BmiCategory> {
        self.bmi().map(BmiCategory::from_bmi)
    }
}

impl Database {
    /// Stored profile, or the defaults before anything was saved
    pub fn load_profile(&self) -> Result<UserProfile> {
        let stored = self
            .conn()
            .query_row(
                "SELECT name, weight_kg, height_cm, fitness_goal FROM user_profile WHERE id = 1",
                [],
                |row| {
                    Ok(UserProfile {
                        name: row.get(0)?,
                        weight_kg: row.get::<_, f64>(1)? as f32,
                        height_cm: row.get(2)?,
                        fitness_goal: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(stored.unwrap_or_default())
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO user_profile (id, name, weight_kg, height_cm, fitness_goal)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                profile.name,
                profile.weight_kg as f64,
                profile.height_cm,
                profile.fitness_goal,
            ],
        )?;
        info!("Saved profile for {}", profile.name);
        Ok(())
    }
}
