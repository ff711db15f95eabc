//! Nutrition calculation module
//!
//! Pure calculations: BMR, TDEE, macro targets, meal plans and daily totals.

pub mod calculator;
pub mod dates;
pub mod meal_plan;
pub mod totals;
pub mod types;

pub use calculator::{
    calculate_bmr, calculate_macros, calculate_tdee, MacroRatios, MacroTargets, Profile,
};
pub use meal_plan::{
    generate_meal_plan, FirstChoices, FoodSelector, MealPlan, PlannedMeal, RandomSelector,
};
pub use totals::{daily_totals, MealLogEntry};
pub use types::{ActivityLevel, Gender, Goal, MealType, NutritionError};
