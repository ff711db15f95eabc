//! Diet plan model
//!
//! A saved plan: daily targets, one row per meal slot, and the suggested
//! foods for each slot.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{MacroTargets, MealPlan, MealType};
use super::Nutrition;

/// Saved plan header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietPlan {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub total_calories: f64,
    pub protein_target: f64,
    pub carbs_target: f64,
    pub fats_target: f64,
    pub created_at: String,
}

/// One meal slot of a saved plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMeal {
    pub id: i64,
    pub diet_plan_id: i64,
    pub meal_type: MealType,
    pub name: String,
    pub nutrition: Nutrition,
    pub food_items: Vec<PlanFoodItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFoodItem {
    pub id: i64,
    pub plan_meal_id: i64,
    pub food_name: String,
    pub calories: f64,
}

/// Plan with its meals and foods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietPlanDetail {
    #[serde(flatten)]
    pub plan: DietPlan,
    pub meals: Vec<PlanMeal>,
}

/// Data for saving a plan
#[derive(Debug, Clone)]
pub struct DietPlanCreate {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub targets: MacroTargets,
    pub meal_plan: MealPlan,
}

fn parse_meal_type(idx: usize, s: String) -> rusqlite::Result<MealType> {
    s.parse::<MealType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl DietPlan {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            total_calories: row.get("total_calories")?,
            protein_target: row.get("protein_target")?,
            carbs_target: row.get("carbs_target")?,
            fats_target: row.get("fats_target")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Targets stored on the plan header
    pub fn targets(&self) -> MacroTargets {
        MacroTargets {
            calories: self.total_calories,
            protein_g: self.protein_target,
            carbs_g: self.carbs_target,
            fats_g: self.fats_target,
        }
    }

    /// Save a plan with all of its meals and foods in one transaction
    pub fn create(conn: &mut Connection, data: &DietPlanCreate) -> DbResult<DietPlanDetail> {
        if data.name.trim().is_empty() {
            return Err(DbError::Invalid("Plan name must not be empty".to_string()));
        }

        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO diet_plans (
                user_id, name, description, total_calories,
                protein_target, carbs_target, fats_target
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.user_id,
                data.name.trim(),
                data.description,
                data.targets.calories,
                data.targets.protein_g,
                data.targets.carbs_g,
                data.targets.fats_g,
            ],
        )?;
        let plan_id = tx.last_insert_rowid();

        for (meal_type, meal) in data.meal_plan.iter() {
            tx.execute(
                r#"
                INSERT INTO plan_meals (diet_plan_id, meal_type, name, calories, protein, carbs, fats)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    plan_id,
                    meal_type.as_str(),
                    meal_type.display_name(),
                    meal.calories,
                    meal.protein_g,
                    meal.carbs_g,
                    meal.fats_g,
                ],
            )?;
            let meal_id = tx.last_insert_rowid();

            for food in &meal.foods {
                tx.execute(
                    "INSERT INTO plan_food_items (plan_meal_id, food_name) VALUES (?1, ?2)",
                    params![meal_id, food],
                )?;
            }
        }

        tx.commit()?;
        tracing::info!(plan_id, user_id = data.user_id, "Saved diet plan");

        Self::get_detail(conn, plan_id)?.ok_or(DbError::NotFound("Diet plan"))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM diet_plans WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a plan with meals in slot order and foods in saved order
    pub fn get_detail(conn: &Connection, id: i64) -> DbResult<Option<DietPlanDetail>> {
        let plan = match Self::get_by_id(conn, id)? {
            Some(plan) => plan,
            None => return Ok(None),
        };

        let mut meal_stmt = conn.prepare(
            r#"
            SELECT id, diet_plan_id, meal_type, name, calories, protein, carbs, fats
            FROM plan_meals
            WHERE diet_plan_id = ?1
            ORDER BY CASE meal_type
                WHEN 'breakfast' THEN 0 WHEN 'lunch' THEN 1 WHEN 'dinner' THEN 2 ELSE 3 END
            "#,
        )?;
        let mut meals = meal_stmt
            .query_map([id], |row| {
                Ok(PlanMeal {
                    id: row.get(0)?,
                    diet_plan_id: row.get(1)?,
                    meal_type: parse_meal_type(2, row.get(2)?)?,
                    name: row.get(3)?,
                    nutrition: Nutrition {
                        calories: row.get(4)?,
                        protein: row.get(5)?,
                        carbs: row.get(6)?,
                        fats: row.get(7)?,
                    },
                    food_items: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut food_stmt = conn.prepare(
            "SELECT id, plan_meal_id, food_name, calories FROM plan_food_items WHERE plan_meal_id = ?1 ORDER BY id",
        )?;
        for meal in &mut meals {
            meal.food_items = food_stmt
                .query_map([meal.id], |row| {
                    Ok(PlanFoodItem {
                        id: row.get(0)?,
                        plan_meal_id: row.get(1)?,
                        food_name: row.get(2)?,
                        calories: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
        }

        Ok(Some(DietPlanDetail { plan, meals }))
    }

    /// A user's plans, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM diet_plans WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let plans = stmt
            .query_map(params![user_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(plans)
    }

    /// Delete a plan; meals and foods cascade
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM diet_plans WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;
    use crate::models::{User, UserCreate};
    use crate::nutrition::{calculate_macros, generate_meal_plan, FirstChoices, Goal};

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

    fn plan_data(user_id: i64) -> DietPlanCreate {
        let targets = calculate_macros(2200.0, Goal::WeightLoss);
        DietPlanCreate {
            user_id,
            name: "Cut".into(),
            description: Some("Spring cut".into()),
            targets,
            meal_plan: generate_meal_plan(&targets, Goal::WeightLoss, &mut FirstChoices),
        }
    }

    #[test]
    fn test_save_and_load_plan() {
        let mut conn = test_conn();
        let user_id = make_user(&conn);
        let data = plan_data(user_id);

        let saved = DietPlan::create(&mut conn, &data).unwrap();
        assert_eq!(saved.plan.name, "Cut");
        assert_eq!(saved.plan.targets(), data.targets);

        let types: Vec<MealType> = saved.meals.iter().map(|m| m.meal_type).collect();
        assert_eq!(types, MealType::ALL.to_vec());
        assert_eq!(saved.meals[0].name, "Breakfast");

        let snack = &saved.meals[3];
        let foods: Vec<&str> = snack.food_items.iter().map(|f| f.food_name.as_str()).collect();
        assert_eq!(foods, vec!["Apple with almond butter", "Protein bar"]);
        assert_eq!(snack.food_items[0].calories, 0.0);

        let planned = data.meal_plan.get(MealType::Lunch).unwrap();
        assert_eq!(saved.meals[1].nutrition.calories, planned.calories);
    }

    #[test]
    fn test_delete_cascades() {
        let mut conn = test_conn();
        let user_id = make_user(&conn);
        let saved = DietPlan::create(&mut conn, &plan_data(user_id)).unwrap();

        assert!(DietPlan::delete(&conn, saved.plan.id).unwrap());
        assert!(DietPlan::get_detail(&conn, saved.plan.id).unwrap().is_none());

        let meals: i64 = conn.query_row("SELECT COUNT(*) FROM plan_meals", [], |r| r.get(0)).unwrap();
        let foods: i64 = conn.query_row("SELECT COUNT(*) FROM plan_food_items", [], |r| r.get(0)).unwrap();
        assert_eq!((meals, foods), (0, 0));
    }

    #[test]
    fn test_list_newest_first() {
        let mut conn = test_conn();
        let user_id = make_user(&conn);
        let first = DietPlan::create(&mut conn, &plan_data(user_id)).unwrap();
        let second = DietPlan::create(&mut conn, &plan_data(user_id)).unwrap();

        let plans = DietPlan::list_for_user(&conn, user_id, 10).unwrap();
        assert_eq!(plans.iter().map(|p| p.id).collect::<Vec<_>>(), vec![second.plan.id, first.plan.id]);
        assert_eq!(DietPlan::list_for_user(&conn, user_id, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut conn = test_conn();
        let user_id = make_user(&conn);
        let data = DietPlanCreate { name: " ".into(), ..plan_data(user_id) };
        assert!(matches!(DietPlan::create(&mut conn, &data), Err(DbError::Invalid(_))));
    }
}
