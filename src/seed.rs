//! Built-in catalogue - muscle groups and starter exercises inserted on first launch

use tracing::{debug, info};

use crate::db::{Database, MuscleGroup};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct SeedExercise {
    pub name: &'static str,
    pub description: &'static str,
    pub video_url: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SeedGroup {
    pub name: &'static str,
    pub exercises: &'static [SeedExercise],
}

const BURPEE: SeedExercise = SeedExercise {
    name: "Burpee",
    description: "Drop to push-up position, perform push-up, return to standing, then jump up.",
    video_url: "https://www.youtube.com/watch?v=qLBImHhCXSw&t=39s",
};

pub const SEED_GROUPS: &[SeedGroup] = &[
    SeedGroup {
        name: "Chest",
        exercises: &[
            SeedExercise {
                name: "Bench Press",
                description: "Lying on bench, lower barbell to chest and press up until arms are extended.",
                video_url: "https://www.youtube.com/shorts/hWbUlkb5Ms4",
            },
            SeedExercise {
                name: "Push-Up",
                description: "Start in plank position with hands shoulder-width apart, lower chest to ground, then push back up.",
                video_url: "https://www.youtube.com/shorts/ba8tr1NzwXU",
            },
            SeedExercise {
                name: "Dumbbell Fly",
                description: "Lying on bench with dumbbells extended above chest, lower weights out to sides in arc motion.",
                video_url: "https://www.youtube.com/watch?v=QENKPHhQVi4",
            },
        ],
    },
    SeedGroup {
        name: "Back",
        exercises: &[
            SeedExercise {
                name: "Pull-Up",
                description: "Hang from bar with palms facing away, pull body up until chin clears bar.",
                video_url: "https://www.youtube.com/watch?v=eGo4IYlbE5g",
            },
            SeedExercise {
                name: "Deadlift",
                description: "Lift barbell from ground to hip level with back straight and shoulders back.",
                video_url: "https://www.youtube.com/shorts/ZaTM37cfiDs",
            },
            SeedExercise {
                name: "Bent Over Row",
                description: "Bend at hips with barbell or dumbbells, pull weight to lower chest while keeping back straight.",
                video_url: "https://www.youtube.com/shorts/Nqh7q3zDCoQ",
            },
        ],
    },
    SeedGroup {
        name: "Legs",
        exercises: &[
            SeedExercise {
                name: "Squat",
                description: "Lower body by bending knees and hips, then return to standing position.",
                video_url: "https://www.youtube.com/shorts/PPmvh7gBTi0",
            },
            SeedExercise {
                name: "Leg Press",
                description: "Push weight platform away with feet while seated in machine.",
                video_url: "https://www.youtube.com/shorts/nDh_BlnLCGc",
            },
            SeedExercise {
                name: "Lunge",
                description: "Step forward, lowering hips until both knees are bent at 90 degrees.",
                video_url: "https://www.youtube.com/watch?v=wrwwXE_x-pQ",
            },
        ],
    },
    SeedGroup {
        name: "Shoulders",
        exercises: &[
            SeedExercise {
                name: "Overhead Press",
                description: "Press weight overhead from shoulder level until arms are fully extended.",
                video_url: "https://www.youtube.com/watch?v=_RlRDWO2jfg",
            },
            SeedExercise {
                name: "Lateral Raise",
                description: "Raise dumbbells out to sides until arms are parallel to floor.",
                video_url: "https://www.youtube.com/watch?v=geenhiHju-o&t=19s",
            },
            SeedExercise {
                name: "Front Raise",
                description: "Raise weights in front of body to shoulder height with straight arms.",
                video_url: "https://www.youtube.com/watch?v=X2BPkPvWd34",
            },
        ],
    },
    SeedGroup {
        name: "Arms",
        exercises: &[
            SeedExercise {
                name: "Bicep Curl",
                description: "Curl weight from extended arm position to shoulder while keeping elbows fixed.",
                video_url: "https://www.youtube.com/watch?v=yTWO2th-RIY",
            },
            SeedExercise {
                name: "Tricep Extension",
                description: "Extend arms against resistance to work triceps.",
                video_url: "https://www.youtube.com/shorts/8FNGBJUHfsA",
            },
            SeedExercise {
                name: "Dips",
                description: "Lower and raise body between parallel bars, primarily working triceps.",
                video_url: "https://www.youtube.com/watch?v=l41SoWZiowI",
            },
        ],
    },
    SeedGroup {
        name: "Core",
        exercises: &[
            SeedExercise {
                name: "Crunch",
                description: "Lying on back, raise shoulders towards knees to work abdominal muscles.",
                video_url: "https://www.youtube.com/watch?v=MKmrqcoCZ-M",
            },
            SeedExercise {
                name: "Plank",
                description: "Hold body in straight line from head to heels, supported by forearms and toes.",
                video_url: "https://www.youtube.com/shorts/v25dawSzRTM",
            },
            SeedExercise {
                name: "Russian Twist",
                description: "Seated with torso at 45-degree angle, rotate torso from side to side.",
                video_url: "https://www.youtube.com/watch?v=DJQGX2J4IVw",
            },
        ],
    },
    SeedGroup {
        name: "Cardio",
        exercises: &[
            SeedExercise {
                name: "Running",
                description: "Continuous running at steady pace to improve cardiovascular fitness.",
                video_url: "https://www.youtube.com/watch?v=kVnyY17VS9Y",
            },
            SeedExercise {
                name: "Jumping Rope",
                description: "Skip over rope swung under feet and over head.",
                video_url: "https://www.youtube.com/watch?v=vEJ7XbbAMAg",
            },
            BURPEE,
        ],
    },
    SeedGroup {
        name: "Full Body",
        exercises: &[
            SeedExercise {
                name: "Kettlebell Swing",
                description: "Swing kettlebell from between legs to shoulder height using hip drive.",
                video_url: "https://www.youtube.com/watch?v=DqkYuWR4zRI",
            },
            SeedExercise {
                name: "Thruster",
                description: "Combination of front squat and overhead press in one fluid movement.",
                video_url: "https://www.youtube.com/watch?v=rqPNxGQqYLA",
            },
            BURPEE,
        ],
    },
];

/// Shown when the muscle group list cannot be read
pub const FALLBACK_MUSCLE_GROUPS: &[(i64, &str)] = &[
    (1, "Back"),
    (2, "Chest"),
    (3, "Arms"),
    (4, "Legs"),
    (5, "Shoulders"),
    (6, "Core"),
    (7, "Cardio"),
    (8, "Full Body"),
];

pub fn fallback_muscle_groups() -> Vec<MuscleGroup> {
    FALLBACK_MUSCLE_GROUPS
        .iter()
        .map(|&(id, name)| MuscleGroup { id, name: name.to_string() })
        .collect()
}

/// Insert the built-in catalogue unless muscle groups already exist.
/// Returns true when anything was inserted.
pub fn populate_database(db: &Database) -> Result<bool> {
    if db.muscle_group_count()? > 0 {
        debug!("Catalogue already populated");
        return Ok(false);
    }

    let inserted = db.transaction(|db| {
        let mut count = 0;
        for group in SEED_GROUPS {
            let group_id = db.insert_muscle_group(group.name)?;
            for ex in group.exercises {
                db.insert_exercise(group_id, ex.name, ex.description, ex.video_url)?;
                count += 1;
            }
        }
        Ok(count)
    })?;

    info!(
        "Seeded {} muscle groups and {} exercises",
        SEED_GROUPS.len(),
        inserted
    );
    Ok(true)
}
