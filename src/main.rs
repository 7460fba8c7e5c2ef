//! trainweek - weekly workout planner

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use serde::Serialize;

use trainweek::config::Config;
use trainweek::db::{FITNESS_GOALS, UserProfile};
use trainweek::schedule::day_of_week;
use trainweek::stats::{self, BmiCategory, format_time};
use trainweek::{Database, TrainingService};

/// Longest workout `log` accepts
const MAX_LOG_MINUTES: i64 = 24 * 60;

#[derive(Parser)]
#[command(name = "trainweek")]
#[command(author, version, about = "Weekly workout planner")]
struct Cli {
    /// SQLite file (default: $TRAINWEEK_DB or trainweek.db)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List muscle groups
    Groups,

    /// List exercises
    Exercises {
        /// Only this muscle group
        #[arg(short, long)]
        group: Option<i64>,

        /// Match name or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Manage workout plans
    #[command(subcommand)]
    Plan(PlanCommand),

    /// Set the exercises of one weekday (1=Mon … 7=Sun); no ids clears it
    Assign {
        plan: i64,
        #[arg(value_parser = clap::value_parser!(i32).range(1..=7))]
        weekday: i32,
        exercises: Vec<i64>,
    },

    /// Add or remove one exercise on a weekday
    Toggle {
        plan: i64,
        #[arg(value_parser = clap::value_parser!(i32).range(1..=7))]
        weekday: i32,
        exercise: i64,
    },

    /// Show this week's calendar for the active plan
    Week,

    /// Show today's session for the active plan
    Today,

    /// Record a finished workout
    Log {
        #[arg(short, long)]
        plan: Option<i64>,

        /// Exercises completed
        #[arg(short, long, default_value = "0", value_parser = clap::value_parser!(i32).range(0..=1000))]
        exercises: i32,

        /// Duration in minutes
        #[arg(short, long, default_value = "0", value_parser = clap::value_parser!(i64).range(0..=MAX_LOG_MINUTES))]
        minutes: i64,
    },

    /// Show progress statistics
    Stats,

    /// Show or edit the user profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Estimate one-rep max, volume and the next working weight for a lift
    Lift {
        /// Weight lifted (kg)
        #[arg(value_parser = parse_weight)]
        weight: f32,

        /// Reps completed per set
        #[arg(value_parser = clap::value_parser!(i32).range(1..=100))]
        reps: i32,

        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(i32).range(1..=100))]
        sets: i32,

        /// Target reps for the set (default: REPS)
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=100))]
        target: Option<i32>,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show the profile with BMI
    Show,
    /// Change some profile fields, keeping the rest
    Set {
        #[arg(long)]
        name: Option<String>,

        /// Body weight (kg)
        #[arg(long, value_parser = parse_weight)]
        weight: Option<f32>,

        /// Height (cm)
        #[arg(long, value_parser = clap::value_parser!(i32).range(50..=272))]
        height: Option<i32>,

        #[arg(long, value_parser = FITNESS_GOALS)]
        goal: Option<String>,
    },
}

#[derive(Serialize)]
struct ProfileView {
    #[serde(flatten)]
    profile: UserProfile,
    bmi: Option<f32>,
    bmi_category: Option<BmiCategory>,
}

#[derive(Serialize)]
struct LiftEstimate {
    one_rep_max: f32,
    volume: f32,
    next_weight: f32,
}

fn parse_weight(raw: &str) -> std::result::Result<f32, String> {
    let weight: f32 = raw.parse().map_err(|e| format!("{e}"))?;
    if weight.is_finite() && weight > 0.0 && weight <= 1000.0 {
        Ok(weight)
    } else {
        Err("expected a weight between 0 and 1000 kg".to_string())
    }
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Create a plan with labeled days and make it active
    Create {
        name: String,

        /// Training days per week (1-7)
        #[arg(short, long, default_value = "3")]
        days: i32,
    },
    /// List all plans
    List,
    /// Show a plan's days and weekday exercises
    Show { id: i64 },
    /// Make a plan the only active one
    Activate { id: i64 },
    /// Delete a plan and everything attached to it
    Delete { id: i64 },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.db.clone());
    config.init_tracing();

    let db = Database::open(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path))?;
    let service = TrainingService::new(db);
    service.populate().await?;

    let today = Local::now().date_naive();

    match cli.command {
        Commands::Groups => {
            let groups = service.muscle_groups().await;
            if cli.json {
                return print_json(&groups);
            }
            for g in groups {
                println!("{:3} | {}", g.id, g.name);
            }
        }

        Commands::Exercises { group, search } => {
            let exercises = service.exercises(group, search).await?;
            if cli.json {
                return print_json(&exercises);
            }
            for e in exercises {
                println!("{:3} | {:20} | {}", e.id, e.name, e.description);
            }
        }

        Commands::Plan(PlanCommand::Create { name, days }) => {
            let id = service.create_plan(name.clone(), days).await?;
            println!("Created plan: {} (id: {})", name, id);
        }

        Commands::Plan(PlanCommand::List) => {
            let plans = service.plans().await?;
            if cli.json {
                return print_json(&plans);
            }
            for p in plans {
                println!(
                    "{:3} | {:20} | {} days | {} {}",
                    p.id,
                    p.name,
                    p.days_per_week,
                    p.created_at.format("%Y-%m-%d"),
                    if p.is_active { "(active)" } else { "" }
                );
            }
        }

        Commands::Plan(PlanCommand::Show { id }) => {
            let model = service.load_plan_model(id).await?;
            if cli.json {
                return print_json(&model);
            }
            println!("{} (id: {})", model.name, model.id);
            for (day, ids) in &model.exercises_by_day {
                println!("  weekday {}: {:?}", day, ids);
            }
        }

        Commands::Plan(PlanCommand::Activate { id }) => {
            service.activate_plan(id).await?;
            println!("Active plan: {}", id);
        }

        Commands::Plan(PlanCommand::Delete { id }) => {
            service.delete_plan(id).await?;
            println!("Deleted plan: {}", id);
        }

        Commands::Assign { plan, weekday, exercises } => {
            service.assign_weekday(plan, weekday, exercises).await?;
            let map = service.exercises_for_plan(plan).await?;
            println!("Weekday {}: {:?}", weekday, map.get(&weekday).cloned().unwrap_or_default());
        }

        Commands::Toggle { plan, weekday, exercise } => {
            let assigned = service.toggle_weekday_exercise(plan, weekday, exercise).await?;
            let verb = if assigned { "added to" } else { "removed from" };
            println!("Exercise {} {} weekday {}", exercise, verb, weekday);
        }

        Commands::Week => {
            let week = service.week_schedule(today).await?;
            if cli.json {
                return print_json(&week);
            }
            match &week.plan {
                Some(p) => println!("{} (id: {})", p.name, p.id),
                None => println!("No active plan"),
            }
            println!("{:-<60}", "");
            for d in &week.days {
                let marker = if d.date == today { ">" } else { " " };
                let label = d
                    .workout_day
                    .as_ref()
                    .map(|w| w.label.as_str())
                    .unwrap_or("rest");
                println!("{} {} | {:20} | {:?}", marker, d.date.format("%a %d %b"), label, d.exercise_ids);
            }
        }

        Commands::Today => {
            let Some(plan) = service.plans().await?.into_iter().find(|p| p.is_active) else {
                println!("No active plan");
                return Ok(());
            };
            let session = service.start_session(plan.id, today).await?;
            if cli.json {
                return print_json(&session.exercises());
            }
            println!("{} - weekday {}", plan.name, day_of_week(today));
            if session.exercises().is_empty() {
                println!("Rest day");
            }
            for e in session.exercises() {
                let target = e.sets.first().map(|s| s.target_reps).unwrap_or(0);
                println!("  {:20} {}x{}", e.exercise.name, e.sets.len(), target);
            }
        }

        Commands::Log { plan, exercises, minutes } => {
            let duration_secs = minutes * 60;
            let id = service.record_workout(plan, exercises, duration_secs).await?;
            println!("Logged workout: {} exercises, {} (id: {})", exercises, format_time(duration_secs), id);
        }

        Commands::Stats => {
            let report = service.progress(today).await?;
            if cli.json {
                return print_json(&report);
            }
            println!("Training Statistics");
            println!("{:-<40}", "");
            println!("This week: {} workouts", report.stats.weekly_workouts);
            println!("Exercises completed: {}", report.stats.exercises_completed);
            println!("Total time: {}", format_time(report.stats.total_duration_secs));
            println!();
            println!("Recent workouts:");
            for w in &report.recent {
                println!(
                    "{} | {} exercises | {}",
                    w.completed_at.format("%b %-d, %Y"),
                    w.exercises_completed,
                    format_time(w.duration_secs)
                );
            }
        }

        Commands::Profile(ProfileCommand::Show) => {
            let profile = service.profile().await?;
            let view = ProfileView {
                bmi: profile.bmi(),
                bmi_category: profile.bmi_category(),
                profile,
            };
            if cli.json {
                return print_json(&view);
            }
            println!("Name:   {}", view.profile.name);
            println!("Weight: {:.1} kg", view.profile.weight_kg);
            println!("Height: {} cm", view.profile.height_cm);
            println!("Goal:   {}", view.profile.fitness_goal);
            match (view.bmi, view.bmi_category) {
                (Some(bmi), Some(category)) => println!("BMI:    {:.1} ({})", bmi, category),
                _ => println!("BMI:    -"),
            }
        }

        Commands::Profile(ProfileCommand::Set { name, weight, height, goal }) => {
            let current = service.profile().await?;
            let profile = UserProfile {
                name: name.unwrap_or(current.name),
                weight_kg: weight.unwrap_or(current.weight_kg),
                height_cm: height.unwrap_or(current.height_cm),
                fitness_goal: goal.unwrap_or(current.fitness_goal),
            };
            service.save_profile(profile.clone()).await?;
            println!("Saved profile: {}", profile.name);
        }

        Commands::Lift { weight, reps, sets, target } => {
            let estimate = LiftEstimate {
                one_rep_max: stats::one_rep_max(weight, reps),
                volume: stats::volume(weight, sets, reps),
                next_weight: stats::suggest_next_weight(weight, reps, target.unwrap_or(reps)),
            };
            if cli.json {
                return print_json(&estimate);
            }
            println!("Estimated 1RM: {:.1} kg", estimate.one_rep_max);
            println!("Volume:        {:.1} kg", estimate.volume);
            println!("Next session:  {:.1} kg", estimate.next_weight);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("trainweek").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_minutes_bounded() {
        let cli = parse(&["log", "--minutes", "90"]).unwrap();
        assert!(matches!(cli.command, Commands::Log { minutes: 90, .. }));

        assert!(parse(&["log", "--minutes", "1441"]).is_err());
        assert!(parse(&["log", "--minutes", "-5"]).is_err());
        assert!(parse(&["log", "--minutes", "9223372036854775807"]).is_err());
    }

    #[test]
    fn test_weekday_bounded() {
        assert!(parse(&["assign", "1", "7", "3"]).is_ok());
        assert!(parse(&["assign", "1", "8", "3"]).is_err());
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("82.5"), Ok(82.5));
        assert!(parse_weight("0").is_err());
        assert!(parse_weight("-10").is_err());
        assert!(parse_weight("NaN").is_err());
        assert!(parse_weight("heavy").is_err());
    }

    #[test]
    fn test_profile_goal_must_be_known() {
        let cli = parse(&["profile", "set", "--goal", "Lose Weight"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Profile(ProfileCommand::Set { goal: Some(ref g), .. }) if g == "Lose Weight"
        ));

        assert!(parse(&["profile", "set", "--goal", "Dance"]).is_err());
    }
}
