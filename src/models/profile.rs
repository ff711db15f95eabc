//! User profile model
//!
//! Stores the body profile that nutrition targets are computed from.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{DbError, DbResult};
use crate::nutrition::{ActivityLevel, Gender, Goal, Profile};

pub const AGE_RANGE: std::ops::RangeInclusive<u32> = 18..=100;
pub const HEIGHT_RANGE_CM: std::ops::RangeInclusive<f64> = 100.0..=250.0;
pub const WEIGHT_RANGE_KG: std::ops::RangeInclusive<f64> = 30.0..=300.0;

/// Out-of-range profile values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Age must be between 18 and 100 (got {0})")]
    Age(u32),

    #[error("Height must be between 100 and 250 cm (got {0})")]
    Height(f64),

    #[error("Weight must be between 30 and 300 kg (got {0})")]
    Weight(f64),
}

/// Reject profiles outside the supported ranges
pub fn validate_profile(profile: &Profile) -> Result<(), ProfileError> {
    if !AGE_RANGE.contains(&profile.age_years) {
        return Err(ProfileError::Age(profile.age_years));
    }
    // `contains` is false for NaN
    if !HEIGHT_RANGE_CM.contains(&profile.height_cm) {
        return Err(ProfileError::Height(profile.height_cm));
    }
    if !WEIGHT_RANGE_KG.contains(&profile.weight_kg) {
        return Err(ProfileError::Weight(profile.weight_kg));
    }
    Ok(())
}

/// A user's stored profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub profile: Profile,
    pub updated_at: String,
}

impl UserProfile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: String = row.get("gender")?;
        let activity_level: String = row.get("activity_level")?;
        let goal: String = row.get("goal")?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            profile: Profile {
                weight_kg: row.get("weight")?,
                height_cm: row.get("height")?,
                age_years: row.get("age")?,
                gender: Gender::from_str_lenient(&gender),
                activity_level: ActivityLevel::from_str_lenient(&activity_level),
                goal: Goal::from_str_lenient(&goal),
            },
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile for a user
    pub fn get_for_user(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create or replace a user's profile
    pub fn upsert(conn: &Connection, user_id: i64, profile: &Profile) -> DbResult<Self> {
        validate_profile(profile).map_err(|e| DbError::Invalid(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO user_profiles (user_id, age, gender, height, weight, activity_level, goal)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id) DO UPDATE SET
                age = excluded.age,
                gender = excluded.gender,
                height = excluded.height,
                weight = excluded.weight,
                activity_level = excluded.activity_level,
                goal = excluded.goal,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                profile.age_years,
                profile.gender.as_str(),
                profile.height_cm,
                profile.weight_kg,
                profile.activity_level.as_str(),
                profile.goal.as_str(),
            ],
        )?;

        tracing::info!(user_id, goal = profile.goal.as_str(), "Saved profile");
        Self::get_for_user(conn, user_id)?.ok_or(DbError::NotFound("Profile"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;
    use crate::models::{User, UserCreate};

    fn sample_profile() -> Profile {
        Profile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 25,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintenance,
        }
    }

    fn make_user(conn: &Connection) -> i64 {
        User::create(
            conn,
            &UserCreate {
                username: "ann".into(),
                email: "ann@example.com".into(),
                password: "pw".into(),
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_validate_profile_ranges() {
        assert_eq!(validate_profile(&sample_profile()), Ok(()));
        assert_eq!(
            validate_profile(&Profile { age_years: 17, ..sample_profile() }),
            Err(ProfileError::Age(17))
        );
        assert!(validate_profile(&Profile { height_cm: 99.9, ..sample_profile() }).is_err());
        assert!(validate_profile(&Profile { weight_kg: 301.0, ..sample_profile() }).is_err());
        assert!(validate_profile(&Profile { weight_kg: f64::NAN, ..sample_profile() }).is_err());
    }

    #[test]
    fn test_upsert_replaces_existing_profile() {
        let conn = test_conn();
        let user_id = make_user(&conn);
        assert!(UserProfile::get_for_user(&conn, user_id).unwrap().is_none());

        let first = UserProfile::upsert(&conn, user_id, &sample_profile()).unwrap();
        let updated = Profile { goal: Goal::WeightLoss, weight_kg: 68.5, ..sample_profile() };
        let second = UserProfile::upsert(&conn, user_id, &updated).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.profile, updated);
    }

    #[test]
    fn test_upsert_rejects_invalid_profile() {
        let conn = test_conn();
        let user_id = make_user(&conn);
        let result = UserProfile::upsert(&conn, user_id, &Profile { age_years: 5, ..sample_profile() });
        assert!(matches!(result, Err(DbError::Invalid(_))));
    }

    #[test]
    fn test_legacy_activity_level_reads_as_sedentary() {
        let conn = test_conn();
        let user_id = make_user(&conn);
        conn.execute(
            "INSERT INTO user_profiles (user_id, age, gender, height, weight, activity_level, goal)
             VALUES (?1, 30, 'Female', 165.0, 60.0, 'athlete', 'maintenance')",
            [user_id],
        )
        .unwrap();

        let stored = UserProfile::get_for_user(&conn, user_id).unwrap().unwrap();
        assert_eq!(stored.profile.activity_level, ActivityLevel::Sedentary);
        assert_eq!(stored.profile.gender, Gender::Female);
    }
}
