//! Data models
//!
//! Rust structs representing database entities.

mod diet_plan;
mod meal_log;
mod nutrition;
mod profile;
mod user;

pub use diet_plan::{DietPlan, DietPlanCreate, DietPlanDetail, PlanFoodItem, PlanMeal};
pub use meal_log::{totals_for_date, MealLog, MealLogCreate};
pub use nutrition::Nutrition;
pub use profile::{validate_profile, ProfileError, UserProfile};
pub use user::{hash_password, User, UserCreate};
