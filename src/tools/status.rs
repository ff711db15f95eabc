//! Diet Planner Status Tool
//!
//! Provides runtime status information about the service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage guide for AI assistants
pub const PLANNER_INSTRUCTIONS: &str = r#"
# Diet Planner Instructions

## Accounts
1. `register_user` with username (2-20 characters), email and password.
2. `verify_login` with email and password returns the `user_id` used by every other tool.

## Profile
`set_profile` stores age (18-100), gender (male/female), height in cm (100-250),
weight in kg (30-300), activity level and goal.

| Activity level | Multiplier |
|----------------|------------|
| sedentary | 1.2 |
| lightly_active | 1.375 |
| moderately_active | 1.55 |
| very_active | 1.725 |
| extra_active | 1.9 |

Goals: `weight_loss` (20% deficit), `maintenance`, `muscle_gain` (10% surplus).
`get_profile` returns BMR (Mifflin-St Jeor), TDEE and daily macro targets.
`calculate_targets` does the same for values that are not stored.

## Diet Plans
1. `generate_diet_plan` splits the targets across breakfast, lunch, dinner and snack
   with food suggestions. Pass `seed` to get the same suggestions again.
2. `save_diet_plan` stores a plan. Pass the targets and meals from the generated plan.
3. `list_diet_plans`, `get_diet_plan`, `delete_diet_plan` manage saved plans.

## Meal Logging
1. `search_foods` looks up nutrients for a natural-language query ("1 cup rice").
   `instant_search_foods` suggests food names while typing.
2. `log_meal` records a food with calories, protein, carbs and fats per the eaten amount.
   The date defaults to today (YYYY-MM-DD).
3. `list_meal_logs` shows a day's logs with totals. `weekly_summary` shows 7 days of totals.
4. `get_dashboard` shows targets, today's totals, recent logs and recent plans.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct PlannerStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,
    pub nutritionix_configured: bool,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, schema_version: Option<i32>, nutritionix_configured: bool) -> PlannerStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PlannerStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            nutritionix_configured,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/dietplan.db"));
        let status = tracker.get_status(None, false);
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert!(!status.nutritionix_configured);
    }
}
