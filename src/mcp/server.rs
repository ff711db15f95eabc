//! Diet Planner MCP Server Implementation
//!
//! Implements the MCP server with all Diet Planner tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::{migrations, Database};
use crate::models::UserCreate;
use crate::nutrition::MacroTargets;
use crate::nutritionix::NutritionixClient;
use crate::tools::meals::LogMealInput;
use crate::tools::plans::{PlanMealInput, SavePlanInput};
use crate::tools::profile::ProfileInput;
use crate::tools::status::StatusTracker;
use crate::tools::{dashboard, foods, meals, plans, profile, users};

/// Diet Planner MCP Service
#[derive(Clone)]
pub struct DietPlanService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    nutritionix: Option<Arc<NutritionixClient>>,
    tool_router: ToolRouter<DietPlanService>,
}

impl DietPlanService {
    pub fn new(database_path: PathBuf, database: Database, nutritionix: Option<NutritionixClient>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            nutritionix: nutritionix.map(Arc::new),
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, id: i64) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!(r#"{{"error": "{} not found", "id": {}}}"#, what, id))])
}

// ============================================================================
// Account Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RegisterUserParams {
    /// Username, 2-20 characters
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct VerifyLoginParams {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserIdParams {
    /// User ID returned by register_user or verify_login
    pub user_id: i64,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileValues {
    /// Age in years (18-100)
    pub age: u32,
    /// male or female
    pub gender: String,
    /// Height in centimeters (100-250)
    pub height_cm: f64,
    /// Weight in kilograms (30-300)
    pub weight_kg: f64,
    /// sedentary, lightly_active, moderately_active, very_active or extra_active
    pub activity_level: String,
    /// weight_loss, maintenance or muscle_gain
    pub goal: String,
}

impl From<ProfileValues> for ProfileInput {
    fn from(p: ProfileValues) -> Self {
        ProfileInput {
            age: p.age,
            gender: p.gender,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level,
            goal: p.goal,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub user_id: i64,
    #[serde(flatten)]
    pub profile: ProfileValues,
}

// ============================================================================
// Diet Plan Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateDietPlanParams {
    pub user_id: i64,
    /// Seed for reproducible food suggestions (optional)
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanTargetsParams {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanMealParams {
    /// breakfast, lunch, dinner or snack
    pub meal_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    /// Food names for this meal, in order
    #[serde(default)]
    pub foods: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveDietPlanParams {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Daily targets, usually from generate_diet_plan
    pub targets: PlanTargetsParams,
    pub meals: Vec<PlanMealParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DietPlanIdParams {
    pub user_id: i64,
    /// Diet plan ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDietPlansParams {
    pub user_id: i64,
    #[serde(default = "default_plan_limit")]
    pub limit: i64,
}

fn default_plan_limit() -> i64 { 20 }

// ============================================================================
// Meal Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub user_id: i64,
    pub food_name: String,
    /// Amount eaten, at least 0.1
    pub serving_size: f64,
    pub serving_unit: String,
    /// breakfast, lunch, dinner or snack
    pub meal_type: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    /// Date (YYYY-MM-DD), defaults to today
    pub log_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealLogsParams {
    pub user_id: i64,
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealLogIdParams {
    pub user_id: i64,
    /// Meal log ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeeklySummaryParams {
    pub user_id: i64,
    /// Last day of the week (YYYY-MM-DD), defaults to today
    pub end_date: Option<String>,
}

// ============================================================================
// Food Search Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Natural-language query, e.g. "1 cup rice and 2 eggs"
    pub query: String,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl DietPlanService {
    // --- Status ---

    #[tool(description = "Get the current status of the Diet Planner service including build info, database status, and process information")]
    async fn dietplan_status(&self) -> Result<CallToolResult, McpError> {
        let schema_version = self
            .database
            .with_conn(migrations::get_schema_version)
            .ok();
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(schema_version, self.nutritionix.is_some());
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for the Diet Planner. Call this when starting a session or when unsure how to use the tools.")]
    fn planner_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PLANNER_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PLANNER_INSTRUCTIONS)]))
    }

    // --- Accounts ---

    #[tool(description = "Register a new user. Username must be 2-20 characters and unique.")]
    fn register_user(&self, Parameters(p): Parameters<RegisterUserParams>) -> Result<CallToolResult, McpError> {
        let data = UserCreate { username: p.username, email: p.email, password: p.password };
        let result = users::register_user(&self.database, &data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Check an email and password. Returns the user_id used by all other tools.")]
    fn verify_login(&self, Parameters(p): Parameters<VerifyLoginParams>) -> Result<CallToolResult, McpError> {
        let result = users::verify_login(&self.database, &p.email, &p.password)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(user) => to_json(&user),
            None => Ok(CallToolResult::success(vec![Content::text(r#"{"error": "Invalid email or password"}"#)])),
        }
    }

    // --- Profile ---

    #[tool(description = "Create or update a user's profile (age, gender, height, weight, activity level, goal). Returns computed BMR, TDEE and macro targets.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::set_profile(&self.database, p.user_id, &p.profile.into())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a user's stored profile with BMR, TDEE and daily macro targets")]
    fn get_profile(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, p.user_id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(found) => to_json(&found),
            None => Ok(not_found("Profile", p.user_id)),
        }
    }

    #[tool(description = "Calculate BMR (Mifflin-St Jeor), TDEE and macro targets for profile values without storing them")]
    fn calculate_targets(&self, Parameters(p): Parameters<ProfileValues>) -> Result<CallToolResult, McpError> {
        let result = profile::calculate_targets(&p.into()).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Diet Plans ---

    #[tool(description = "Generate a meal plan from the user's profile: targets split across breakfast, lunch, dinner and snack with food suggestions. Not saved until save_diet_plan is called.")]
    fn generate_diet_plan(&self, Parameters(p): Parameters<GenerateDietPlanParams>) -> Result<CallToolResult, McpError> {
        let result = plans::generate_diet_plan(&self.database, p.user_id, p.seed)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Save a diet plan with its targets, meals and foods")]
    fn save_diet_plan(&self, Parameters(p): Parameters<SaveDietPlanParams>) -> Result<CallToolResult, McpError> {
        let input = SavePlanInput {
            name: p.name,
            description: p.description,
            targets: MacroTargets {
                calories: p.targets.calories,
                protein_g: p.targets.protein_g,
                carbs_g: p.targets.carbs_g,
                fats_g: p.targets.fats_g,
            },
            meals: p
                .meals
                .into_iter()
                .map(|m| PlanMealInput {
                    meal_type: m.meal_type,
                    calories: m.calories,
                    protein_g: m.protein_g,
                    carbs_g: m.carbs_g,
                    fats_g: m.fats_g,
                    foods: m.foods,
                })
                .collect(),
        };
        let result = plans::save_diet_plan(&self.database, p.user_id, &input)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a saved diet plan with its meals and foods")]
    fn get_diet_plan(&self, Parameters(p): Parameters<DietPlanIdParams>) -> Result<CallToolResult, McpError> {
        let result = plans::get_diet_plan(&self.database, p.user_id, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(plan) => to_json(&plan),
            None => Ok(not_found("Diet plan", p.id)),
        }
    }

    #[tool(description = "List a user's saved diet plans, newest first")]
    fn list_diet_plans(&self, Parameters(p): Parameters<ListDietPlansParams>) -> Result<CallToolResult, McpError> {
        let result = plans::list_diet_plans(&self.database, p.user_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a saved diet plan with its meals and foods")]
    fn delete_diet_plan(&self, Parameters(p): Parameters<DietPlanIdParams>) -> Result<CallToolResult, McpError> {
        let result = plans::delete_diet_plan(&self.database, p.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(deleted) => to_json(&deleted),
            None => Ok(not_found("Diet plan", p.id)),
        }
    }

    // --- Meal Logs ---

    #[tool(description = "Log a food eaten by the user. Nutrient values are for the amount eaten. Date defaults to today.")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let input = LogMealInput {
            food_name: p.food_name,
            serving_size: p.serving_size,
            serving_unit: p.serving_unit,
            meal_type: p.meal_type,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fats: p.fats,
            log_date: p.log_date,
        };
        let result = meals::log_meal(&self.database, p.user_id, &input).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List a user's meal logs for a date with daily totals")]
    fn list_meal_logs(&self, Parameters(p): Parameters<ListMealLogsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meal_logs(&self.database, p.user_id, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a meal log")]
    fn delete_meal_log(&self, Parameters(p): Parameters<MealLogIdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal_log(&self.database, p.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(deleted) => to_json(&deleted),
            None => Ok(not_found("Meal log", p.id)),
        }
    }

    #[tool(description = "Daily calorie and macro totals for the 7 days ending at a date")]
    fn weekly_summary(&self, Parameters(p): Parameters<WeeklySummaryParams>) -> Result<CallToolResult, McpError> {
        let result = meals::weekly_summary(&self.database, p.user_id, p.end_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Dashboard: daily targets, today's totals and remaining amounts, recent meal logs and recent diet plans")]
    fn get_dashboard(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_dashboard(&self.database, p.user_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Food Search ---

    #[tool(description = "Look up nutrients for a natural-language food query using Nutritionix. Results can be passed to log_meal.")]
    async fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::search_foods(self.nutritionix.as_deref(), &p.query)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Suggest common and branded food names matching a partial query using Nutritionix")]
    async fn instant_search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::instant_search_foods(self.nutritionix.as_deref(), &p.query)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for DietPlanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "dietplan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Diet Planner".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Diet Planner - calorie targets, meal plans and meal logging. \
                 IMPORTANT: Call planner_instructions first. \
                 Accounts: register_user, verify_login (returns user_id). \
                 Profile: set_profile/get_profile, calculate_targets for ad-hoc values. \
                 Plans: generate_diet_plan, save_diet_plan, get/list/delete_diet_plan. \
                 Logs: log_meal, list_meal_logs, delete_meal_log, weekly_summary, get_dashboard. \
                 Food lookup: search_foods, instant_search_foods."
                    .into(),
            ),
        }
    }
}
