//! Print a user's profile, targets and a sample meal plan
//! Usage: cargo run --bin show_targets -- <user_id> [seed]

use dietplan::models::UserProfile;
use dietplan::nutrition::{generate_meal_plan, FirstChoices, FoodSelector, RandomSelector};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let user_id: i64 = match args.get(1) {
        Some(arg) => arg.parse()?,
        None => {
            eprintln!("Usage: show_targets <user_id> [seed]");
            std::process::exit(2);
        }
    };
    let seed: Option<u64> = args.get(2).map(|s| s.parse()).transpose()?;

    let db_path = dietplan::config::database_path();
    println!("Database: {}", db_path.display());

    let database = dietplan::db::Database::open(&db_path)?;

    let stored = match database.with_conn(|conn| UserProfile::get_for_user(conn, user_id))? {
        Some(p) => p,
        None => {
            println!("No profile found for user {}", user_id);
            return Ok(());
        }
    };

    let profile = &stored.profile;
    println!("\nProfile (updated {}):", stored.updated_at);
    println!("  {} yrs, {}, {:.1} cm, {:.1} kg", profile.age_years, profile.gender, profile.height_cm, profile.weight_kg);
    println!("  Activity: {} (x{})", profile.activity_level, profile.activity_level.multiplier());
    println!("  Goal: {}", profile.goal);
    println!("  BMR: {:.1} kcal", profile.bmr());
    println!("  TDEE: {:.1} kcal", profile.tdee());

    let targets = profile.targets();
    println!("\nDaily targets:");
    println!("  {:.0} kcal | protein {:.1} g | carbs {:.1} g | fats {:.1} g",
        targets.calories, targets.protein_g, targets.carbs_g, targets.fats_g);

    let mut selector: Box<dyn FoodSelector> = match seed {
        Some(seed) => Box::new(RandomSelector::seeded(seed)),
        None => Box::new(FirstChoices),
    };
    let plan = generate_meal_plan(&targets, profile.goal, selector.as_mut());

    println!("\nMeal plan:");
    for (meal_type, meal) in plan.iter() {
        println!("  {:<10} {:>6.0} kcal | P {:>5.1} g | C {:>5.1} g | F {:>5.1} g",
            meal_type.display_name(), meal.calories, meal.protein_g, meal.carbs_g, meal.fats_g);
        println!("             {}", meal.foods.join(", "));
    }

    Ok(())
}
