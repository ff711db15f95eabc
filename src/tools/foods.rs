//! Food Lookup MCP Tools
//!
//! Thin wrappers over the Nutritionix client that flatten results for logging.

use serde::Serialize;

use crate::nutritionix::{FoodNutrients, InstantSearchResults, NutritionixClient, NutritionixError};

/// One food from a nutrients lookup, ready to pass to log_meal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodMatch {
    pub food_name: String,
    pub brand_name: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub serving_weight_grams: Option<f64>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl From<&FoodNutrients> for FoodMatch {
    fn from(food: &FoodNutrients) -> Self {
        let nutrition = food.nutrition();
        Self {
            food_name: food.food_name.clone(),
            brand_name: food.brand_name.clone(),
            serving_size: food.serving_qty.unwrap_or(1.0),
            serving_unit: food.serving_unit.clone().unwrap_or_else(|| "serving".to_string()),
            serving_weight_grams: food.serving_weight_grams,
            calories: nutrition.calories,
            protein: nutrition.protein,
            carbs: nutrition.carbs,
            fats: nutrition.fats,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub foods: Vec<FoodMatch>,
    pub total: usize,
}

fn require_client(client: Option<&NutritionixClient>) -> Result<&NutritionixClient, String> {
    client.ok_or_else(|| NutritionixError::MissingCredentials.to_string())
}

fn require_query(query: &str) -> Result<&str, String> {
    let query = query.trim();
    if query.is_empty() {
        return Err("Search query must not be empty".to_string());
    }
    Ok(query)
}

/// Natural-language nutrient lookup
pub async fn search_foods(client: Option<&NutritionixClient>, query: &str) -> Result<SearchFoodsResponse, String> {
    let client = require_client(client)?;
    let query = require_query(query)?;

    let foods: Vec<FoodMatch> = client
        .natural_nutrients(query)
        .await
        .map_err(|e| e.to_string())?
        .iter()
        .map(FoodMatch::from)
        .collect();

    Ok(SearchFoodsResponse {
        query: query.to_string(),
        total: foods.len(),
        foods,
    })
}

/// Autocomplete over common and branded food names
pub async fn instant_search_foods(client: Option<&NutritionixClient>, query: &str) -> Result<InstantSearchResults, String> {
    let client = require_client(client)?;
    let query = require_query(query)?;
    client.instant_search(query).await.map_err(|e| e.to_string())
}
