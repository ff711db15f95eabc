//! Diet Plan MCP Tools
//!
//! Tools for generating meal plans from a profile and managing saved plans.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbError};
use crate::models::{DietPlan, DietPlanCreate, DietPlanDetail, UserProfile};
use crate::nutrition::{
    generate_meal_plan, FoodSelector, Goal, MacroTargets, MealPlan, MealType, PlannedMeal,
    Profile, RandomSelector,
};
use super::profile::TargetsResponse;
use super::users::require_user;

/// Response for generate_diet_plan
#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub user_id: i64,
    pub goal: Goal,
    #[serde(flatten)]
    pub calculations: TargetsResponse,
    pub meal_plan: MealPlan,
}

/// One meal slot supplied when saving a plan
#[derive(Debug, Clone, Deserialize)]
pub struct PlanMealInput {
    pub meal_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    #[serde(default)]
    pub foods: Vec<String>,
}

/// Data supplied when saving a plan
#[derive(Debug, Clone, Deserialize)]
pub struct SavePlanInput {
    pub name: String,
    pub description: Option<String>,
    pub targets: MacroTargets,
    pub meals: Vec<PlanMealInput>,
}

/// Plan summary for listing
#[derive(Debug, Serialize)]
pub struct DietPlanSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub total_calories: f64,
    pub created_at: String,
}

impl From<DietPlan> for DietPlanSummary {
    fn from(plan: DietPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            total_calories: plan.total_calories,
            created_at: plan.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListDietPlansResponse {
    pub plans: Vec<DietPlanSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeletePlanResponse {
    pub id: i64,
    pub deleted: bool,
}

/// Targets and meal plan for a profile
pub fn plan_for_profile<S>(profile: &Profile, selector: &mut S) -> (TargetsResponse, MealPlan)
where
    S: FoodSelector + ?Sized,
{
    let calculations = TargetsResponse::for_profile(profile);
    let meal_plan = generate_meal_plan(&calculations.targets, profile.goal, selector);
    (calculations, meal_plan)
}

/// Generate a plan from the user's stored profile
pub fn generate_diet_plan(db: &Database, user_id: i64, seed: Option<u64>) -> Result<GeneratePlanResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let stored = UserProfile::get_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| "Please complete your profile first to generate a diet plan.".to_string())?;

    let mut selector = match seed {
        Some(seed) => RandomSelector::seeded(seed),
        None => RandomSelector::from_entropy(),
    };
    let (calculations, meal_plan) = plan_for_profile(&stored.profile, &mut selector);

    Ok(GeneratePlanResponse {
        user_id,
        goal: stored.profile.goal,
        calculations,
        meal_plan,
    })
}

fn check_non_negative(label: &str, fields: [(&str, f64); 4]) -> Result<(), String> {
    for (field, value) in fields {
        if !(value >= 0.0) {
            return Err(format!("{} {} must be non-negative (got {})", label, field, value));
        }
    }
    Ok(())
}

fn check_targets(targets: &MacroTargets) -> Result<(), String> {
    check_non_negative(
        "Target",
        [
            ("calories", targets.calories),
            ("protein_g", targets.protein_g),
            ("carbs_g", targets.carbs_g),
            ("fats_g", targets.fats_g),
        ],
    )
}

fn build_meal_plan(meals: &[PlanMealInput]) -> Result<MealPlan, String> {
    let mut slots = BTreeMap::new();

    for meal in meals {
        let meal_type: MealType = meal.meal_type.parse().map_err(|e| format!("{}", e))?;
        check_non_negative(
            meal_type.as_str(),
            [
                ("calories", meal.calories),
                ("protein_g", meal.protein_g),
                ("carbs_g", meal.carbs_g),
                ("fats_g", meal.fats_g),
            ],
        )?;

        let planned = PlannedMeal {
            calories: meal.calories,
            protein_g: meal.protein_g,
            carbs_g: meal.carbs_g,
            fats_g: meal.fats_g,
            foods: meal
                .foods
                .iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
        };
        if slots.insert(meal_type, planned).is_some() {
            return Err(format!("Meal type {} given more than once", meal_type));
        }
    }

    Ok(MealPlan { meals: slots })
}

pub fn save_diet_plan(db: &Database, user_id: i64, input: &SavePlanInput) -> Result<DietPlanDetail, String> {
    check_targets(&input.targets)?;
    let meal_plan = build_meal_plan(&input.meals)?;

    db.with_conn_mut(|conn| {
        require_user(conn, user_id).map_err(DbError::Invalid)?;
        DietPlan::create(
            conn,
            &DietPlanCreate {
                user_id,
                name: input.name.clone(),
                description: input.description.clone(),
                targets: input.targets,
                meal_plan,
            },
        )
    })
    .map_err(|e| match e {
        DbError::Invalid(msg) => msg,
        e => format!("Failed to save diet plan: {}", e),
    })
}

/// Load a plan, failing if it belongs to another user
fn owned_plan(conn: &rusqlite::Connection, user_id: i64, plan_id: i64, action: &str) -> Result<Option<DietPlan>, String> {
    let plan = DietPlan::get_by_id(conn, plan_id).map_err(|e| format!("Failed to get diet plan: {}", e))?;
    match plan {
        Some(plan) if plan.user_id != user_id => {
            tracing::warn!(plan_id, user_id, "Diet plan ownership check failed");
            Err(format!("You do not have permission to {} this plan.", action))
        }
        other => Ok(other),
    }
}

pub fn get_diet_plan(db: &Database, user_id: i64, plan_id: i64) -> Result<Option<DietPlanDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if owned_plan(&conn, user_id, plan_id, "view")?.is_none() {
        return Ok(None);
    }
    DietPlan::get_detail(&conn, plan_id).map_err(|e| format!("Failed to get diet plan: {}", e))
}

pub fn list_diet_plans(db: &Database, user_id: i64, limit: i64) -> Result<ListDietPlansResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let plans: Vec<DietPlanSummary> = DietPlan::list_for_user(&conn, user_id, limit)
        .map_err(|e| format!("Failed to list diet plans: {}", e))?
        .into_iter()
        .map(DietPlanSummary::from)
        .collect();

    Ok(ListDietPlansResponse {
        total: plans.len(),
        plans,
    })
}

pub fn delete_diet_plan(db: &Database, user_id: i64, plan_id: i64) -> Result<Option<DeletePlanResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if owned_plan(&conn, user_id, plan_id, "delete")?.is_none() {
        return Ok(None);
    }
    let deleted = DietPlan::delete(&conn, plan_id).map_err(|e| format!("Failed to delete diet plan: {}", e))?;
    Ok(Some(DeletePlanResponse { id: plan_id, deleted }))
}
