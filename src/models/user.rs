//! User model
//!
//! Registered accounts. Passwords are stored as Argon2id PHC strings.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

const SALT_BYTES: usize = 16;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

/// Data for registering a user
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserCreate {
    fn validate(&self) -> DbResult<()> {
        let len = self.username.trim().chars().count();
        if !(2..=20).contains(&len) {
            return Err(DbError::Invalid(
                "Username must be between 2 and 20 characters".to_string(),
            ));
        }
        if !is_plausible_email(&self.email) {
            return Err(DbError::Invalid(format!("Invalid email address '{}'", self.email)));
        }
        if self.password.is_empty() {
            return Err(DbError::Invalid("Password must not be empty".to_string()));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Register a new user, rejecting duplicate usernames and emails
    pub fn create(conn: &Connection, data: &UserCreate) -> DbResult<Self> {
        data.validate()?;
        let username = data.username.trim();
        let email = data.email.trim().to_lowercase();

        if Self::get_by_username(conn, username)?.is_some() {
            return Err(DbError::Invalid(
                "That username is taken. Please choose a different one.".to_string(),
            ));
        }
        if Self::get_by_email(conn, &email)?.is_some() {
            return Err(DbError::Invalid(
                "That email is taken. Please choose a different one.".to_string(),
            ));
        }

        let password_hash = hash_password(&data.password)?;
        conn.execute(
            "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
            params![username, email, password_hash],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(user_id = id, username, "Registered user");
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound("User"))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let user = conn
            .query_row("SELECT * FROM users WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(user)
    }

    pub fn get_by_username(conn: &Connection, username: &str) -> DbResult<Option<Self>> {
        let user = conn
            .query_row("SELECT * FROM users WHERE username = ?1", [username], Self::from_row)
            .optional()?;
        Ok(user)
    }

    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let user = conn
            .query_row(
                "SELECT * FROM users WHERE email = ?1",
                [email.trim().to_lowercase()],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Look up a user by email and check the password
    pub fn authenticate(conn: &Connection, email: &str, password: &str) -> DbResult<Option<Self>> {
        Ok(Self::get_by_email(conn, email)?.filter(|user| user.verify_password(password)))
    }

    /// Check a password against the stored hash. Unparseable hashes never match.
    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(user_id = self.id, error = %e, "Stored password hash is malformed");
                false
            }
        }
    }
}

/// Hash a password with Argon2id and a random salt, as a PHC string
pub fn hash_password(password: &str) -> DbResult<String> {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| DbError::Invalid(format!("Failed to hash password: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbError::Invalid(format!("Failed to hash password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;

    fn register(conn: &Connection, username: &str, email: &str) -> DbResult<User> {
        User::create(
            conn,
            &UserCreate {
                username: username.to_string(),
                email: email.to_string(),
                password: "hunter22".to_string(),
            },
        )
    }

    #[test]
    fn test_register_and_authenticate() {
        let conn = test_conn();
        let user = register(&conn, "ann", "Ann@Example.com").unwrap();
        assert_eq!(user.email, "ann@example.com");
        assert_ne!(user.password_hash, "hunter22");

        let found = User::authenticate(&conn, "ann@example.com", "hunter22").unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert!(User::authenticate(&conn, "ann@example.com", "wrong").unwrap().is_none());
        assert!(User::authenticate(&conn, "bob@example.com", "hunter22").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_and_email_rejected() {
        let conn = test_conn();
        register(&conn, "ann", "ann@example.com").unwrap();

        assert!(matches!(register(&conn, "ann", "other@example.com"), Err(DbError::Invalid(_))));
        assert!(matches!(register(&conn, "bob", "ANN@example.com"), Err(DbError::Invalid(_))));
    }

    #[test]
    fn test_registration_validation() {
        let conn = test_conn();
        assert!(register(&conn, "a", "a@example.com").is_err());
        assert!(register(&conn, "this_name_is_way_too_long", "b@example.com").is_err());
        assert!(register(&conn, "carol", "not-an-email").is_err());
        assert!(register(&conn, "dave", "dave@localhost").is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));

        let user = User {
            id: 1,
            username: "x".into(),
            email: "x@example.com".into(),
            password_hash: a,
            created_at: String::new(),
        };
        assert!(user.verify_password("secret"));
        assert!(!user.verify_password("Secret"));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            username: "x".into(),
            email: "x@example.com".into(),
            password_hash: hash_password("secret").unwrap(),
            created_at: String::new(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_malformed_or_legacy_hash_never_matches() {
        let legacy = User {
            id: 1,
            username: "x".into(),
            email: "x@example.com".into(),
            password_hash: "abcd$0123".into(),
            created_at: String::new(),
        };
        assert!(!legacy.verify_password("secret"));
        assert!(!legacy.verify_password(""));
    }
}
