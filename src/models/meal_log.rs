//! Meal log model
//!
//! A single food eaten by a user on a given date.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::dates::format_date;
use crate::nutrition::{daily_totals, MealLogEntry, MealType};
use super::Nutrition;

/// Orders rows breakfast, lunch, dinner, snack
const MEAL_ORDER_SQL: &str = "CASE meal_type
    WHEN 'breakfast' THEN 0 WHEN 'lunch' THEN 1 WHEN 'dinner' THEN 2 ELSE 3 END";

/// A logged food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLog {
    pub id: i64,
    pub user_id: i64,
    pub food_name: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub meal_type: MealType,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub log_date: String,
    pub created_at: String,
}

/// Data for logging a food
#[derive(Debug, Clone)]
pub struct MealLogCreate {
    pub user_id: i64,
    pub food_name: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub meal_type: MealType,
    pub nutrition: Nutrition,
    pub log_date: NaiveDate,
}

impl MealLogCreate {
    fn validate(&self) -> DbResult<()> {
        if self.food_name.trim().is_empty() {
            return Err(DbError::Invalid("Food name must not be empty".to_string()));
        }
        if !(self.serving_size >= 0.1) {
            return Err(DbError::Invalid(format!(
                "Serving size must be at least 0.1 (got {})",
                self.serving_size
            )));
        }
        if self.serving_unit.trim().is_empty() {
            return Err(DbError::Invalid("Serving unit must not be empty".to_string()));
        }
        let n = &self.nutrition;
        for (field, value) in [
            ("calories", n.calories),
            ("protein", n.protein),
            ("carbs", n.carbs),
            ("fats", n.fats),
        ] {
            if !(value >= 0.0) {
                return Err(DbError::Invalid(format!("{field} must be non-negative (got {value})")));
            }
        }
        Ok(())
    }
}

impl MealLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type: String = row.get("meal_type")?;
        let meal_type = meal_type
            .parse::<MealType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_name: row.get("food_name")?,
            serving_size: row.get("serving_size")?,
            serving_unit: row.get("serving_unit")?,
            meal_type,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fats: row.get("fats")?,
            log_date: row.get("log_date")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Nutrient values for aggregation
    pub fn entry(&self) -> MealLogEntry {
        MealLogEntry {
            calories: self.calories,
            protein_g: self.protein,
            carbs_g: self.carbs,
            fats_g: self.fats,
        }
    }

    pub fn create(conn: &Connection, data: &MealLogCreate) -> DbResult<Self> {
        data.validate()?;

        conn.execute(
            r#"
            INSERT INTO meal_logs (
                user_id, food_name, serving_size, serving_unit, meal_type,
                calories, protein, carbs, fats, log_date
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.user_id,
                data.food_name.trim(),
                data.serving_size,
                data.serving_unit.trim(),
                data.meal_type.as_str(),
                data.nutrition.calories,
                data.nutrition.protein,
                data.nutrition.carbs,
                data.nutrition.fats,
                format_date(data.log_date),
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(log_id = id, user_id = data.user_id, food = %data.food_name, "Logged meal");
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound("Meal log"))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let log = conn
            .query_row("SELECT * FROM meal_logs WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(log)
    }

    /// All logs for a user on one date, in meal order
    pub fn list_for_date(conn: &Connection, user_id: i64, date: NaiveDate) -> DbResult<Vec<Self>> {
        let sql = format!(
            "SELECT * FROM meal_logs WHERE user_id = ?1 AND log_date = ?2 ORDER BY {MEAL_ORDER_SQL}, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(params![user_id, format_date(date)], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Most recently logged entries, newest first
    pub fn list_recent(conn: &Connection, user_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_logs WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let logs = stmt
            .query_map(params![user_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Delete a log. Returns false if it did not exist.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_logs WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

/// Sum of a user's logs on one date
pub fn totals_for_date(conn: &Connection, user_id: i64, date: NaiveDate) -> DbResult<Nutrition> {
    let entries: Vec<MealLogEntry> = MealLog::list_for_date(conn, user_id, date)?
        .iter()
        .map(MealLog::entry)
        .collect();
    Ok(daily_totals(&entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;
    use crate::models::{User, UserCreate};

    fn make_user(conn: &Connection, name: &str) -> i64 {
        User::create(
            conn,
            &UserCreate {
                username: name.into(),
                email: format!("{name}@example.com"),
                password: "pw".into(),
            },
        )
        .unwrap()
        .id
    }

    fn log(user_id: i64, food: &str, meal_type: MealType, calories: f64, date: NaiveDate) -> MealLogCreate {
        MealLogCreate {
            user_id,
            food_name: food.to_string(),
            serving_size: 1.0,
            serving_unit: "serving".to_string(),
            meal_type,
            nutrition: Nutrition { calories, protein: 10.0, carbs: 20.0, fats: 5.0 },
            log_date: date,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_list_for_date_orders_by_meal() {
        let conn = test_conn();
        let user = make_user(&conn, "ann");
        MealLog::create(&conn, &log(user, "Chips", MealType::Snack, 150.0, day(9))).unwrap();
        MealLog::create(&conn, &log(user, "Oats", MealType::Breakfast, 300.0, day(9))).unwrap();
        MealLog::create(&conn, &log(user, "Soup", MealType::Dinner, 400.0, day(9))).unwrap();
        MealLog::create(&conn, &log(user, "Wrap", MealType::Lunch, 500.0, day(10))).unwrap();

        let logs = MealLog::list_for_date(&conn, user, day(9)).unwrap();
        let foods: Vec<&str> = logs.iter().map(|l| l.food_name.as_str()).collect();
        assert_eq!(foods, vec!["Oats", "Soup", "Chips"]);
    }

    #[test]
    fn test_totals_for_date() {
        let conn = test_conn();
        let user = make_user(&conn, "ann");
        let other = make_user(&conn, "bob");
        MealLog::create(&conn, &log(user, "Oats", MealType::Breakfast, 300.0, day(9))).unwrap();
        MealLog::create(&conn, &log(user, "Soup", MealType::Dinner, 400.0, day(9))).unwrap();
        MealLog::create(&conn, &log(other, "Cake", MealType::Snack, 900.0, day(9))).unwrap();

        let totals = totals_for_date(&conn, user, day(9)).unwrap();
        assert_eq!(totals, Nutrition { calories: 700.0, protein: 20.0, carbs: 40.0, fats: 10.0 });
        assert_eq!(totals_for_date(&conn, user, day(8)).unwrap(), Nutrition::zero());
    }

    #[test]
    fn test_null_nutrients_count_as_zero() {
        let conn = test_conn();
        let user = make_user(&conn, "ann");
        conn.execute(
            "INSERT INTO meal_logs (user_id, food_name, serving_size, serving_unit, meal_type, calories, log_date)
             VALUES (?1, 'Water', 1, 'glass', 'lunch', NULL, '2025-01-09')",
            [user],
        )
        .unwrap();
        MealLog::create(&conn, &log(user, "Oats", MealType::Breakfast, 300.0, day(9))).unwrap();

        let totals = totals_for_date(&conn, user, day(9)).unwrap();
        assert_eq!(totals.calories, 300.0);
        assert_eq!(totals.protein, 10.0);
    }

    #[test]
    fn test_create_validates_input() {
        let conn = test_conn();
        let user = make_user(&conn, "ann");

        let mut bad = log(user, "Oats", MealType::Breakfast, -1.0, day(9));
        assert!(matches!(MealLog::create(&conn, &bad), Err(DbError::Invalid(_))));

        bad.nutrition.calories = 100.0;
        bad.serving_size = 0.0;
        assert!(MealLog::create(&conn, &bad).is_err());

        bad.serving_size = 1.0;
        bad.food_name = "  ".into();
        assert!(MealLog::create(&conn, &bad).is_err());
    }

    #[test]
    fn test_recent_and_delete() {
        let conn = test_conn();
        let user = make_user(&conn, "ann");
        let first = MealLog::create(&conn, &log(user, "Oats", MealType::Breakfast, 300.0, day(9))).unwrap();
        let second = MealLog::create(&conn, &log(user, "Soup", MealType::Dinner, 400.0, day(9))).unwrap();

        let recent = MealLog::list_recent(&conn, user, 5).unwrap();
        assert_eq!(recent.iter().map(|l| l.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        assert!(MealLog::delete(&conn, first.id).unwrap());
        assert!(!MealLog::delete(&conn, first.id).unwrap());
        assert_eq!(MealLog::list_recent(&conn, user, 1).unwrap().len(), 1);
    }
}
