//! Dashboard MCP Tool

use serde::Serialize;

use crate::db::Database;
use crate::models::{totals_for_date, DietPlan, MealLog, Nutrition, UserProfile};
use crate::nutrition::dates::{format_date, today};
use crate::nutrition::MacroTargets;
use super::plans::DietPlanSummary;
use super::users::require_user;

/// Targets shown before a profile has been set
pub const DEFAULT_TARGETS: MacroTargets = MacroTargets {
    calories: 2000.0,
    protein_g: 150.0,
    carbs_g: 200.0,
    fats_g: 70.0,
};

const RECENT_LOGS: i64 = 5;
const RECENT_PLANS: i64 = 3;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user_id: i64,
    pub username: String,
    pub has_profile: bool,
    pub targets: MacroTargets,
    pub date: String,
    pub today_totals: Nutrition,
    /// Targets minus today's totals, floored at zero
    pub remaining: Nutrition,
    pub recent_logs: Vec<MealLog>,
    pub recent_plans: Vec<DietPlanSummary>,
}

fn remaining(targets: &MacroTargets, eaten: &Nutrition) -> Nutrition {
    Nutrition {
        calories: (targets.calories - eaten.calories).max(0.0),
        protein: (targets.protein_g - eaten.protein).max(0.0),
        carbs: (targets.carbs_g - eaten.carbs).max(0.0),
        fats: (targets.fats_g - eaten.fats).max(0.0),
    }
}

pub fn get_dashboard(db: &Database, user_id: i64) -> Result<DashboardResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let user = require_user(&conn, user_id)?;

    let profile = UserProfile::get_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;
    let targets = profile
        .as_ref()
        .map(|p| p.profile.targets())
        .unwrap_or(DEFAULT_TARGETS);

    let date = today();
    let today_totals = totals_for_date(&conn, user_id, date)
        .map_err(|e| format!("Failed to total today's logs: {}", e))?;
    let recent_logs = MealLog::list_recent(&conn, user_id, RECENT_LOGS)
        .map_err(|e| format!("Failed to list meal logs: {}", e))?;
    let recent_plans = DietPlan::list_for_user(&conn, user_id, RECENT_PLANS)
        .map_err(|e| format!("Failed to list diet plans: {}", e))?
        .into_iter()
        .map(DietPlanSummary::from)
        .collect();

    Ok(DashboardResponse {
        user_id,
        username: user.username,
        has_profile: profile.is_some(),
        remaining: remaining(&targets, &today_totals),
        targets,
        date: format_date(date),
        today_totals,
        recent_logs,
        recent_plans,
    })
}
