//! Closed vocabularies for profile and meal data
//!
//! Gender, activity level, goal and meal slot parse case-insensitively.
//! `FromStr` is strict; the `from_str_lenient` constructors keep the
//! fallback behavior used for rows written before values were validated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when parsing profile or meal vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NutritionError {
    #[error("Invalid gender '{0}' (expected male or female)")]
    InvalidGender(String),

    #[error("Invalid activity level '{0}' (expected sedentary, lightly_active, moderately_active, very_active or extra_active)")]
    InvalidActivityLevel(String),

    #[error("Invalid goal '{0}' (expected weight_loss, maintenance or muscle_gain)")]
    InvalidGoal(String),

    #[error("Invalid meal type '{0}' (expected breakfast, lunch, dinner or snack)")]
    InvalidMealType(String),
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// ============================================================================
// Gender
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Anything other than "male" is treated as female
    pub fn from_str_lenient(s: &str) -> Self {
        match normalize(s).as_str() {
            "male" => Gender::Male,
            _ => Gender::Female,
        }
    }
}

impl FromStr for Gender {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(NutritionError::InvalidGender(s.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Activity Level
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job or training twice a day
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    /// TDEE multiplier applied to BMR
    pub const fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Unknown labels fall back to sedentary
    pub fn from_str_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(activity_level = s, "Unknown activity level, using sedentary");
            ActivityLevel::Sedentary
        })
    }
}

impl FromStr for ActivityLevel {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" => Ok(ActivityLevel::ExtraActive),
            _ => Err(NutritionError::InvalidActivityLevel(s.to_string())),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Goal
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    MuscleGain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::WeightLoss, Goal::Maintenance, Goal::MuscleGain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight_loss",
            Goal::Maintenance => "maintenance",
            Goal::MuscleGain => "muscle_gain",
        }
    }

    /// Unknown goals are planned as maintenance
    pub fn from_str_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(goal = s, "Unknown goal, using maintenance");
            Goal::Maintenance
        })
    }
}

impl FromStr for Goal {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "weight_loss" => Ok(Goal::WeightLoss),
            "maintenance" => Ok(Goal::Maintenance),
            "muscle_gain" => Ok(Goal::MuscleGain),
            _ => Err(NutritionError::InvalidGoal(s.to_string())),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Meal Type
// ============================================================================

/// A meal slot. Declaration order is the order slots appear in a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Display name used for saved plan meals ("Breakfast", ...)
    pub fn display_name(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl FromStr for MealType {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(NutritionError::InvalidMealType(s.to_string())),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("MALE".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!(" Female ".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("Very_Active".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryActive));
        assert_eq!("WEIGHT_LOSS".parse::<Goal>(), Ok(Goal::WeightLoss));
        assert_eq!("Snack".parse::<MealType>(), Ok(MealType::Snack));
    }

    #[test]
    fn test_strict_parse_rejects_unknown_values() {
        assert_eq!(
            "couch_potato".parse::<ActivityLevel>(),
            Err(NutritionError::InvalidActivityLevel("couch_potato".to_string()))
        );
        assert!("other".parse::<Gender>().is_err());
        assert!("bulk".parse::<Goal>().is_err());
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_unknown_activity_level_falls_back_to_sedentary() {
        let level = ActivityLevel::from_str_lenient("couch_potato");
        assert_eq!(level, ActivityLevel::Sedentary);
        assert_eq!(level.multiplier(), 1.2);
    }

    #[test]
    fn test_lenient_gender_and_goal() {
        assert_eq!(Gender::from_str_lenient("Male"), Gender::Male);
        assert_eq!(Gender::from_str_lenient("other"), Gender::Female);
        assert_eq!(Goal::from_str_lenient("bulk"), Goal::Maintenance);
        assert_eq!(Goal::from_str_lenient("muscle_gain"), Goal::MuscleGain);
    }

    #[test]
    fn test_as_str_round_trips() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.as_str().parse::<ActivityLevel>(), Ok(level));
        }
        for goal in Goal::ALL {
            assert_eq!(goal.as_str().parse::<Goal>(), Ok(goal));
        }
        for meal in MealType::ALL {
            assert_eq!(meal.as_str().parse::<MealType>(), Ok(meal));
        }
    }

    #[test]
    fn test_meal_types_order_by_time_of_day() {
        let mut meals = vec![MealType::Snack, MealType::Dinner, MealType::Breakfast, MealType::Lunch];
        meals.sort();
        assert_eq!(meals, MealType::ALL.to_vec());
    }

    #[test]
    fn test_serde_uses_snake_case_labels() {
        assert_eq!(serde_json::to_string(&ActivityLevel::ExtraActive).unwrap(), "\"extra_active\"");
        assert_eq!(serde_json::to_string(&Goal::MuscleGain).unwrap(), "\"muscle_gain\"");
        assert_eq!(serde_json::to_string(&MealType::Breakfast).unwrap(), "\"breakfast\"");
    }
}
