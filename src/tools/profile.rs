//! Profile and Target MCP Tools
//!
//! Tools for storing a body profile and computing energy targets from it.

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbError};
use crate::models::{validate_profile, UserProfile};
use crate::nutrition::{MacroTargets, Profile};
use super::users::require_user;

/// Raw profile values as supplied by a client
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub age: u32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub goal: String,
}

impl ProfileInput {
    /// Parse labels strictly and check value ranges
    pub fn parse(&self) -> Result<Profile, String> {
        let profile = Profile {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age_years: self.age,
            gender: self.gender.parse().map_err(|e| format!("{}", e))?,
            activity_level: self.activity_level.parse().map_err(|e| format!("{}", e))?,
            goal: self.goal.parse().map_err(|e| format!("{}", e))?,
        };
        validate_profile(&profile).map_err(|e| e.to_string())?;
        Ok(profile)
    }
}

/// Computed energy needs for a profile
#[derive(Debug, Clone, Serialize)]
pub struct TargetsResponse {
    pub bmr: f64,
    pub tdee: f64,
    pub activity_multiplier: f64,
    pub targets: MacroTargets,
}

impl TargetsResponse {
    pub fn for_profile(profile: &Profile) -> Self {
        Self {
            bmr: profile.bmr(),
            tdee: profile.tdee(),
            activity_multiplier: profile.activity_level.multiplier(),
            targets: profile.targets(),
        }
    }
}

/// Stored profile with computed targets
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub profile: Profile,
    pub updated_at: String,
    #[serde(flatten)]
    pub calculations: TargetsResponse,
}

impl From<UserProfile> for ProfileResponse {
    fn from(stored: UserProfile) -> Self {
        Self {
            user_id: stored.user_id,
            calculations: TargetsResponse::for_profile(&stored.profile),
            profile: stored.profile,
            updated_at: stored.updated_at,
        }
    }
}

pub fn set_profile(db: &Database, user_id: i64, input: &ProfileInput) -> Result<ProfileResponse, String> {
    let profile = input.parse()?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    match UserProfile::upsert(&conn, user_id, &profile) {
        Ok(stored) => Ok(stored.into()),
        Err(DbError::Invalid(msg)) => Err(msg),
        Err(e) => Err(format!("Failed to save profile: {}", e)),
    }
}

pub fn get_profile(db: &Database, user_id: i64) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let stored = UserProfile::get_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;
    Ok(stored.map(ProfileResponse::from))
}

/// Targets for values that are not stored
pub fn calculate_targets(input: &ProfileInput) -> Result<TargetsResponse, String> {
    let profile = input.parse()?;
    Ok(TargetsResponse::for_profile(&profile))
}
