//! Nutritionix response types
//!
//! Only the fields the planner uses are decoded; everything is optional
//! except the food name.

use serde::{Deserialize, Serialize};

use crate::models::Nutrition;
use crate::nutrition::MealLogEntry;

/// Body of `POST /v2/natural/nutrients`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NutrientsResponse {
    #[serde(default)]
    pub foods: Vec<FoodNutrients>,
}

/// Nutrient breakdown for one recognised food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrients {
    pub food_name: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub serving_qty: Option<f64>,
    #[serde(default)]
    pub serving_unit: Option<String>,
    #[serde(default)]
    pub serving_weight_grams: Option<f64>,
    #[serde(default)]
    pub nf_calories: Option<f64>,
    #[serde(default)]
    pub nf_protein: Option<f64>,
    #[serde(default)]
    pub nf_total_carbohydrate: Option<f64>,
    #[serde(default)]
    pub nf_total_fat: Option<f64>,
}

impl FoodNutrients {
    pub fn entry(&self) -> MealLogEntry {
        MealLogEntry {
            calories: self.nf_calories,
            protein_g: self.nf_protein,
            carbs_g: self.nf_total_carbohydrate,
            fats_g: self.nf_total_fat,
        }
    }

    /// Per-serving nutrition with missing values as zero
    pub fn nutrition(&self) -> Nutrition {
        self.entry().nutrition()
    }
}

/// Body of `GET /v2/search/instant`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstantSearchResults {
    #[serde(default)]
    pub common: Vec<CommonFood>,
    #[serde(default)]
    pub branded: Vec<BrandedFood>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonFood {
    pub food_name: String,
    #[serde(default)]
    pub serving_qty: Option<f64>,
    #[serde(default)]
    pub serving_unit: Option<String>,
    #[serde(default)]
    pub tag_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandedFood {
    pub food_name: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub nix_item_id: Option<String>,
    #[serde(default)]
    pub nf_calories: Option<f64>,
    #[serde(default)]
    pub serving_qty: Option<f64>,
    #[serde(default)]
    pub serving_unit: Option<String>,
}

/// Error body returned on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
