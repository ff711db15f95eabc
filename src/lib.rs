//! Diet Planner Library
//!
//! Calorie targets, meal plan generation and meal logging for diet tracking.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod nutritionix;
pub mod tools;
