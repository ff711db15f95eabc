//! Meal plan generation
//!
//! Splits daily targets across meal slots and attaches food suggestions.
//! Suggestions are picked through a [`FoodSelector`] so callers decide
//! whether the choice is random, seeded, or fixed.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::calculator::MacroTargets;
use super::types::{Goal, MealType};

// ============================================================================
// Food Suggestions
// ============================================================================

pub const BREAKFAST_SUGGESTIONS: [&str; 5] = [
    "Oatmeal with berries and nuts",
    "Greek yogurt with honey and granola",
    "Whole grain toast with avocado and eggs",
    "Protein smoothie with banana and spinach",
    "Vegetable omelette with whole grain toast",
];

pub const LUNCH_SUGGESTIONS: [&str; 5] = [
    "Grilled chicken salad with olive oil dressing",
    "Quinoa bowl with roasted vegetables and tofu",
    "Turkey and avocado wrap with mixed greens",
    "Lentil soup with whole grain bread",
    "Tuna salad sandwich on whole grain bread",
];

pub const DINNER_SUGGESTIONS: [&str; 5] = [
    "Grilled salmon with roasted vegetables",
    "Lean beef stir-fry with brown rice",
    "Baked chicken with sweet potato and broccoli",
    "Vegetable and bean chili",
    "Whole grain pasta with turkey meatballs and tomato sauce",
];

pub const SNACK_SUGGESTIONS: [&str; 6] = [
    "Apple with almond butter",
    "Protein bar",
    "Handful of mixed nuts",
    "Greek yogurt with berries",
    "Cottage cheese with pineapple",
    "Hummus with carrot sticks",
];

impl MealType {
    /// Curated food ideas for this slot
    pub fn food_suggestions(self) -> &'static [&'static str] {
        match self {
            MealType::Breakfast => &BREAKFAST_SUGGESTIONS,
            MealType::Lunch => &LUNCH_SUGGESTIONS,
            MealType::Dinner => &DINNER_SUGGESTIONS,
            MealType::Snack => &SNACK_SUGGESTIONS,
        }
    }

    /// How many suggestions a generated plan carries for this slot
    pub const fn suggestion_count(self) -> usize {
        match self {
            MealType::Snack => 2,
            _ => 3,
        }
    }
}

impl Goal {
    /// Share of daily intake per slot, in slot order
    pub const fn meal_distribution(self) -> [(MealType, f64); 4] {
        match self {
            Goal::WeightLoss => [
                (MealType::Breakfast, 0.25),
                (MealType::Lunch, 0.35),
                (MealType::Dinner, 0.30),
                (MealType::Snack, 0.10),
            ],
            Goal::MuscleGain | Goal::Maintenance => [
                (MealType::Breakfast, 0.25),
                (MealType::Lunch, 0.30),
                (MealType::Dinner, 0.30),
                (MealType::Snack, 0.15),
            ],
        }
    }
}

// ============================================================================
// Food Selection
// ============================================================================

/// Picks `count` distinct entries from `candidates`
pub trait FoodSelector {
    fn select(&mut self, candidates: &[&'static str], count: usize) -> Vec<String>;
}

/// Random selection without replacement
pub struct RandomSelector<R> {
    rng: R,
}

impl<R: Rng> RandomSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSelector<StdRng> {
    /// Reproducible selector for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> FoodSelector for RandomSelector<R> {
    fn select(&mut self, candidates: &[&'static str], count: usize) -> Vec<String> {
        candidates
            .choose_multiple(&mut self.rng, count.min(candidates.len()))
            .map(|food| food.to_string())
            .collect()
    }
}

/// Deterministic selector that takes candidates in list order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoices;

impl FoodSelector for FirstChoices {
    fn select(&mut self, candidates: &[&'static str], count: usize) -> Vec<String> {
        candidates.iter().take(count).map(|food| food.to_string()).collect()
    }
}

// ============================================================================
// Meal Plan
// ============================================================================

/// Targets and suggestions for one meal slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    pub foods: Vec<String>,
}

/// A day's targets split by meal slot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan {
    pub meals: BTreeMap<MealType, PlannedMeal>,
}

impl MealPlan {
    pub fn get(&self, meal_type: MealType) -> Option<&PlannedMeal> {
        self.meals.get(&meal_type)
    }

    /// Iterate slots in time-of-day order
    pub fn iter(&self) -> impl Iterator<Item = (MealType, &PlannedMeal)> {
        self.meals.iter().map(|(meal_type, meal)| (*meal_type, meal))
    }

    /// Sum of all slots
    pub fn totals(&self) -> MacroTargets {
        self.meals.values().fold(MacroTargets::default(), |acc, meal| MacroTargets {
            calories: acc.calories + meal.calories,
            protein_g: acc.protein_g + meal.protein_g,
            carbs_g: acc.carbs_g + meal.carbs_g,
            fats_g: acc.fats_g + meal.fats_g,
        })
    }
}

/// Split daily targets across meal slots for a goal
pub fn generate_meal_plan<S>(targets: &MacroTargets, goal: Goal, selector: &mut S) -> MealPlan
where
    S: FoodSelector + ?Sized,
{
    let meals = goal
        .meal_distribution()
        .into_iter()
        .map(|(meal_type, ratio)| {
            let foods = selector.select(meal_type.food_suggestions(), meal_type.suggestion_count());
            let meal = PlannedMeal {
                calories: targets.calories * ratio,
                protein_g: targets.protein_g * ratio,
                carbs_g: targets.carbs_g * ratio,
                fats_g: targets.fats_g * ratio,
                foods,
            };
            (meal_type, meal)
        })
        .collect();

    MealPlan { meals }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::nutrition::calculator::calculate_macros;

    fn assert_rel_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_meal_distribution_sums_to_one() {
        for goal in Goal::ALL {
            let sum: f64 = goal.meal_distribution().iter().map(|(_, r)| r).sum();
            assert_rel_close(sum, 1.0);
        }
    }

    #[test]
    fn test_slot_totals_match_targets() {
        for goal in Goal::ALL {
            let targets = calculate_macros(2345.6, goal);
            let plan = generate_meal_plan(&targets, goal, &mut RandomSelector::seeded(7));
            let totals = plan.totals();
            assert_rel_close(totals.calories, targets.calories);
            assert_rel_close(totals.protein_g, targets.protein_g);
            assert_rel_close(totals.carbs_g, targets.carbs_g);
            assert_rel_close(totals.fats_g, targets.fats_g);
        }
    }

    #[test]
    fn test_weight_loss_slot_split() {
        let targets = MacroTargets { calories: 2000.0, protein_g: 100.0, carbs_g: 200.0, fats_g: 50.0 };
        let plan = generate_meal_plan(&targets, Goal::WeightLoss, &mut FirstChoices);

        assert_rel_close(plan.get(MealType::Breakfast).unwrap().calories, 500.0);
        assert_rel_close(plan.get(MealType::Lunch).unwrap().calories, 700.0);
        assert_rel_close(plan.get(MealType::Dinner).unwrap().calories, 600.0);
        assert_rel_close(plan.get(MealType::Snack).unwrap().calories, 200.0);
        assert_rel_close(plan.get(MealType::Snack).unwrap().fats_g, 5.0);
    }

    #[test]
    fn test_suggestion_counts_and_membership() {
        let targets = calculate_macros(2000.0, Goal::Maintenance);
        for seed in 0..20 {
            let plan = generate_meal_plan(&targets, Goal::Maintenance, &mut RandomSelector::seeded(seed));
            assert_eq!(plan.meals.len(), 4);

            for (meal_type, meal) in plan.iter() {
                assert_eq!(meal.foods.len(), meal_type.suggestion_count());

                let unique: HashSet<&String> = meal.foods.iter().collect();
                assert_eq!(unique.len(), meal.foods.len(), "duplicate suggestion in {meal_type}");

                for food in &meal.foods {
                    assert!(meal_type.food_suggestions().contains(&food.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let targets = calculate_macros(1800.0, Goal::MuscleGain);
        let first = generate_meal_plan(&targets, Goal::MuscleGain, &mut RandomSelector::seeded(42));
        let second = generate_meal_plan(&targets, Goal::MuscleGain, &mut RandomSelector::seeded(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_choices_selector() {
        let targets = calculate_macros(1800.0, Goal::Maintenance);
        let plan = generate_meal_plan(&targets, Goal::Maintenance, &mut FirstChoices);
        assert_eq!(
            plan.get(MealType::Snack).unwrap().foods,
            vec!["Apple with almond butter".to_string(), "Protein bar".to_string()]
        );
        assert_eq!(plan.get(MealType::Dinner).unwrap().foods.len(), 3);
    }

    #[test]
    fn test_selection_capped_at_list_length() {
        let mut selector = RandomSelector::seeded(1);
        let picked = selector.select(&["a", "b"], 5);
        assert_eq!(picked.len(), 2);
        assert_eq!(FirstChoices.select(&["a"], 3), vec!["a".to_string()]);
    }

    #[test]
    fn test_plan_serializes_slots_by_name() {
        let plan = generate_meal_plan(&MacroTargets::default(), Goal::Maintenance, &mut FirstChoices);
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json.get("breakfast").is_some());
        assert!(json.get("snack").is_some());
        assert_eq!(json["lunch"]["calories"], 0.0);
    }
}
