//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        tracing::info!("Applying schema migration v1");
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,         -- Argon2id PHC string
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- USER PROFILES
        -- One body profile per user
        -- ============================================
        CREATE TABLE user_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL,
            height REAL NOT NULL,                -- cm
            weight REAL NOT NULL,                -- kg
            activity_level TEXT NOT NULL,
            goal TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- MEAL LOGS
        -- What was actually eaten
        -- ============================================
        CREATE TABLE meal_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            food_name TEXT NOT NULL,
            serving_size REAL NOT NULL,
            serving_unit TEXT NOT NULL,
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
            calories REAL,
            protein REAL,                        -- grams
            carbs REAL,                          -- grams
            fats REAL,                           -- grams
            log_date TEXT NOT NULL,              -- ISO date: "2025-01-09"
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_logs_user_date ON meal_logs(user_id, log_date);

        -- ============================================
        -- DIET PLANS
        -- Saved targets with per-meal breakdown
        -- ============================================
        CREATE TABLE diet_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT,
            total_calories REAL NOT NULL,
            protein_target REAL NOT NULL,
            carbs_target REAL NOT NULL,
            fats_target REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_diet_plans_user ON diet_plans(user_id);

        CREATE TABLE plan_meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            diet_plan_id INTEGER NOT NULL REFERENCES diet_plans(id) ON DELETE CASCADE,
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
            name TEXT NOT NULL,
            calories REAL NOT NULL,
            protein REAL NOT NULL,
            carbs REAL NOT NULL,
            fats REAL NOT NULL
        );

        CREATE INDEX idx_plan_meals_plan ON plan_meals(diet_plan_id);

        CREATE TABLE plan_food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            plan_meal_id INTEGER NOT NULL REFERENCES plan_meals(id) ON DELETE CASCADE,
            food_name TEXT NOT NULL,
            calories REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX idx_plan_food_items_meal ON plan_food_items(plan_meal_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_meal_type_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (username, email, password_hash) VALUES ('ann', 'ann@example.com', 'x')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO meal_logs (user_id, food_name, serving_size, serving_unit, meal_type, log_date)
             VALUES (1, 'Toast', 1, 'slice', 'brunch', '2025-01-01')",
            [],
        );
        assert!(result.is_err());
    }
}
