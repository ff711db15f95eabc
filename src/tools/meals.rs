//! Meal Log MCP Tools
//!
//! Tools for logging eaten foods and summarizing daily intake.

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbError};
use crate::models::{totals_for_date, MealLog, MealLogCreate, Nutrition, UserProfile};
use crate::nutrition::dates::{date_range, format_date, parse_date, parse_date_strict, today};
use crate::nutrition::{daily_totals, MacroTargets, MealType};
use super::users::require_user;

/// Days covered by weekly_summary
pub const WEEK_DAYS: u32 = 7;

/// Data supplied when logging a food
#[derive(Debug, Clone, Deserialize)]
pub struct LogMealInput {
    pub food_name: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub meal_type: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub log_date: Option<String>,
}

/// Logs for one day with their totals
#[derive(Debug, Serialize)]
pub struct DailyLogsResponse {
    pub date: String,
    pub logs: Vec<MealLog>,
    pub count: usize,
    pub totals: Nutrition,
}

#[derive(Debug, Serialize)]
pub struct DeleteLogResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub totals: Nutrition,
}

#[derive(Debug, Serialize)]
pub struct WeeklySummaryResponse {
    pub start_date: String,
    pub end_date: String,
    pub days: Vec<DaySummary>,
    pub average: Nutrition,
    /// Daily targets from the stored profile, if any
    pub targets: Option<MacroTargets>,
}

pub fn log_meal(db: &Database, user_id: i64, input: &LogMealInput) -> Result<MealLog, String> {
    let meal_type: MealType = input.meal_type.parse().map_err(|e| format!("{}", e))?;
    let log_date = match input.log_date.as_deref() {
        Some(s) => parse_date_strict(s).ok_or_else(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?,
        None => today(),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let data = MealLogCreate {
        user_id,
        food_name: input.food_name.trim().to_string(),
        serving_size: input.serving_size,
        serving_unit: input.serving_unit.trim().to_string(),
        meal_type,
        nutrition: Nutrition {
            calories: input.calories,
            protein: input.protein,
            carbs: input.carbs,
            fats: input.fats,
        },
        log_date,
    };

    match MealLog::create(&conn, &data) {
        Ok(log) => {
            tracing::info!(user_id, log_id = log.id, date = %log.log_date, "Meal logged");
            Ok(log)
        }
        Err(DbError::Invalid(msg)) => Err(msg),
        Err(e) => Err(format!("Failed to log meal: {}", e)),
    }
}

/// Logs for a date. A missing or malformed date means today.
pub fn list_meal_logs(db: &Database, user_id: i64, date: Option<&str>) -> Result<DailyLogsResponse, String> {
    let date = date.map(parse_date).unwrap_or_else(today);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let logs = MealLog::list_for_date(&conn, user_id, date)
        .map_err(|e| format!("Failed to list meal logs: {}", e))?;
    let entries: Vec<_> = logs.iter().map(MealLog::entry).collect();
    let totals = daily_totals(&entries);

    Ok(DailyLogsResponse {
        date: format_date(date),
        count: logs.len(),
        logs,
        totals,
    })
}

pub fn delete_meal_log(db: &Database, user_id: i64, log_id: i64) -> Result<Option<DeleteLogResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let log = match MealLog::get_by_id(&conn, log_id).map_err(|e| format!("Failed to get meal log: {}", e))? {
        Some(log) => log,
        None => return Ok(None),
    };
    if log.user_id != user_id {
        tracing::warn!(log_id, user_id, "Meal log ownership check failed");
        return Err("You do not have permission to delete this log.".to_string());
    }

    let deleted = MealLog::delete(&conn, log_id).map_err(|e| format!("Failed to delete meal log: {}", e))?;
    Ok(Some(DeleteLogResponse { id: log_id, deleted }))
}

/// Totals for the seven days ending at `end_date` (default today)
pub fn weekly_summary(db: &Database, user_id: i64, end_date: Option<&str>) -> Result<WeeklySummaryResponse, String> {
    let end = end_date.map(parse_date).unwrap_or_else(today);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let range = date_range(end, WEEK_DAYS)
        .ok_or_else(|| format!("Date {} is too early for a weekly summary", format_date(end)))?;

    let mut days = Vec::with_capacity(range.len());
    for date in range {
        let totals = totals_for_date(&conn, user_id, date)
            .map_err(|e| format!("Failed to total {}: {}", format_date(date), e))?;
        days.push(DaySummary {
            date: format_date(date),
            totals,
        });
    }

    let sum: Nutrition = days.iter().map(|d| d.totals).sum();
    let targets = UserProfile::get_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .map(|p| p.profile.targets());

    Ok(WeeklySummaryResponse {
        start_date: days.first().map(|d| d.date.clone()).unwrap_or_default(),
        end_date: format_date(end),
        average: sum.scale(1.0 / f64::from(WEEK_DAYS)),
        days,
        targets,
    })
}
