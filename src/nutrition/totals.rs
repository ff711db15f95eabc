//! Daily totals aggregation

use serde::{Deserialize, Serialize};

use crate::models::Nutrition;

/// Nutrient values of one logged meal. Missing values count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealLogEntry {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fats_g: Option<f64>,
}

impl MealLogEntry {
    pub fn nutrition(&self) -> Nutrition {
        Nutrition {
            calories: self.calories.unwrap_or(0.0),
            protein: self.protein_g.unwrap_or(0.0),
            carbs: self.carbs_g.unwrap_or(0.0),
            fats: self.fats_g.unwrap_or(0.0),
        }
    }
}

impl From<Nutrition> for MealLogEntry {
    fn from(n: Nutrition) -> Self {
        Self {
            calories: Some(n.calories),
            protein_g: Some(n.protein),
            carbs_g: Some(n.carbs),
            fats_g: Some(n.fats),
        }
    }
}

/// Element-wise sum of logged meals
pub fn daily_totals<'a, I>(entries: I) -> Nutrition
where
    I: IntoIterator<Item = &'a MealLogEntry>,
{
    entries.into_iter().map(MealLogEntry::nutrition).sum()
}
