//! Energy and macronutrient calculations
//!
//! BMR uses the Mifflin-St Jeor equation. TDEE scales BMR by an activity
//! multiplier, and macro targets split goal-adjusted calories by fixed ratios.

use serde::{Deserialize, Serialize};

use super::types::{ActivityLevel, Gender, Goal};

// ============================================================================
// Energy Density Constants (kcal per gram)
// ============================================================================

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Fraction of calories taken from each macronutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroRatios {
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl MacroRatios {
    pub fn sum(&self) -> f64 {
        self.protein + self.fat + self.carbs
    }
}

impl Gender {
    /// Sex-specific constant of the Mifflin-St Jeor equation
    pub const fn bmr_offset(self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        }
    }
}

impl Goal {
    /// Multiplier applied to TDEE: 20% deficit, maintenance, 10% surplus
    pub const fn calorie_factor(self) -> f64 {
        match self {
            Goal::WeightLoss => 0.8,
            Goal::Maintenance => 1.0,
            Goal::MuscleGain => 1.1,
        }
    }

    pub const fn macro_ratios(self) -> MacroRatios {
        match self {
            Goal::WeightLoss => MacroRatios { protein: 0.35, fat: 0.30, carbs: 0.35 },
            Goal::MuscleGain => MacroRatios { protein: 0.30, fat: 0.25, carbs: 0.45 },
            Goal::Maintenance => MacroRatios { protein: 0.30, fat: 0.30, carbs: 0.40 },
        }
    }
}

/// Daily calorie and macronutrient targets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
}

/// Body profile used to derive energy needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl Profile {
    pub fn bmr(&self) -> f64 {
        calculate_bmr(self.weight_kg, self.height_cm, self.age_years, self.gender)
    }

    pub fn tdee(&self) -> f64 {
        calculate_tdee(self.bmr(), self.activity_level)
    }

    pub fn targets(&self) -> MacroTargets {
        calculate_macros(self.tdee(), self.goal)
    }
}

/// Basal metabolic rate in kcal/day
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    (10.0 * weight_kg) + (6.25 * height_cm) - (5.0 * f64::from(age_years)) + gender.bmr_offset()
}

/// Total daily energy expenditure in kcal/day
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Adjust calories for the goal and convert the macro split to grams
pub fn calculate_macros(tdee: f64, goal: Goal) -> MacroTargets {
    let calories = tdee * goal.calorie_factor();
    let ratios = goal.macro_ratios();

    MacroTargets {
        calories,
        protein_g: calories * ratios.protein / KCAL_PER_G_PROTEIN,
        carbs_g: calories * ratios.carbs / KCAL_PER_G_CARBS,
        fats_g: calories * ratios.fat / KCAL_PER_G_FAT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_bmr_reference_male() {
        assert_eq!(calculate_bmr(70.0, 175.0, 25, Gender::Male), 1673.75);
    }

    #[test]
    fn test_bmr_gender_gap_is_166() {
        for (weight, height, age) in [(70.0, 175.0, 25), (55.5, 160.2, 41), (120.0, 190.0, 67)] {
            let male = calculate_bmr(weight, height, age, Gender::Male);
            let female = calculate_bmr(weight, height, age, Gender::Female);
            assert_close(male - female, 166.0);
        }
    }

    #[test]
    fn test_tdee_sedentary() {
        assert_close(calculate_tdee(1673.75, ActivityLevel::Sedentary), 2008.5);
    }

    #[test]
    fn test_tdee_multipliers() {
        assert_close(calculate_tdee(1000.0, ActivityLevel::LightlyActive), 1375.0);
        assert_close(calculate_tdee(1000.0, ActivityLevel::ModeratelyActive), 1550.0);
        assert_close(calculate_tdee(1000.0, ActivityLevel::VeryActive), 1725.0);
        assert_close(calculate_tdee(1000.0, ActivityLevel::ExtraActive), 1900.0);
    }

    #[test]
    fn test_macro_ratios_sum_to_one() {
        for goal in Goal::ALL {
            assert_close(goal.macro_ratios().sum(), 1.0);
        }
    }

    #[test]
    fn test_maintenance_macros() {
        let targets = calculate_macros(2008.5, Goal::Maintenance);
        assert_close(targets.calories, 2008.5);
        assert_close(targets.protein_g, 150.6375);
        assert_close(targets.carbs_g, 200.85);
        assert_close(targets.fats_g, 66.95);
    }

    #[test]
    fn test_goal_calorie_adjustment() {
        assert_close(calculate_macros(2000.0, Goal::WeightLoss).calories, 1600.0);
        assert_close(calculate_macros(2000.0, Goal::MuscleGain).calories, 2200.0);
    }

    #[test]
    fn test_weight_loss_macros() {
        let targets = calculate_macros(2000.0, Goal::WeightLoss);
        // 1600 kcal: 35% protein, 35% carbs, 30% fat
        assert_close(targets.protein_g, 140.0);
        assert_close(targets.carbs_g, 140.0);
        assert_close(targets.fats_g, 480.0 / 9.0);
    }

    #[test]
    fn test_macro_grams_recompose_calories() {
        for goal in Goal::ALL {
            let t = calculate_macros(2500.0, goal);
            let kcal = t.protein_g * KCAL_PER_G_PROTEIN
                + t.carbs_g * KCAL_PER_G_CARBS
                + t.fats_g * KCAL_PER_G_FAT;
            assert!((kcal - t.calories).abs() < 1e-6);
        }
    }

    #[test]
    fn test_profile_pipeline() {
        let profile = Profile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 25,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintenance,
        };
        assert_eq!(profile.bmr(), 1673.75);
        assert_close(profile.tdee(), 2008.5);
        assert_close(profile.targets().protein_g, 150.6375);
    }
}
