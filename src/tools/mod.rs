//! Diet Planner Tools module
//!
//! MCP tool implementations for the Diet Planner.

pub mod dashboard;
pub mod foods;
pub mod meals;
pub mod plans;
pub mod profile;
pub mod status;
pub mod users;
