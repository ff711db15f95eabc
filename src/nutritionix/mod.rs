//! Nutritionix food database integration
//!
//! Looks up per-food nutrient values that feed meal logging.

mod client;
mod types;

pub use client::{NutritionixClient, NutritionixError};
pub use types::{BrandedFood, CommonFood, FoodNutrients, InstantSearchResults, NutrientsResponse};
