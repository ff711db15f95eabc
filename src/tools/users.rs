//! Account MCP Tools

use serde::Serialize;

use crate::db::{Database, DbError};
use crate::models::{User, UserCreate};

/// Response for register_user and verify_login
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

pub fn register_user(db: &Database, data: &UserCreate) -> Result<UserResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    match User::create(&conn, data) {
        Ok(user) => Ok(user.into()),
        Err(DbError::Invalid(msg)) => Err(msg),
        Err(e) => Err(format!("Failed to register user: {}", e)),
    }
}

/// Check credentials. `None` means the email or password was wrong.
pub fn verify_login(db: &Database, email: &str, password: &str) -> Result<Option<UserResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::authenticate(&conn, email, password)
        .map_err(|e| format!("Failed to check login: {}", e))?;
    if user.is_none() {
        tracing::warn!(email_domain = email_domain(email), "Login failed");
    }
    Ok(user.map(UserResponse::from))
}

/// Domain part of an address, for logging without the mailbox
fn email_domain(email: &str) -> &str {
    email.trim().rsplit_once('@').map(|(_, domain)| domain).unwrap_or("")
}

/// Fail unless the user exists
pub(crate) fn require_user(conn: &rusqlite::Connection, user_id: i64) -> Result<User, String> {
    User::get_by_id(conn, user_id)
        .map_err(|e| format!("Failed to get user: {}", e))?
        .ok_or_else(|| format!("User {} not found", user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::temp_db;

    #[test]
    fn test_register_then_login() {
        let (_dir, db) = temp_db();
        let data = UserCreate {
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "pw123".into(),
        };

        let registered = register_user(&db, &data).unwrap();
        assert_eq!(registered.username, "ann");

        let login = verify_login(&db, "ann@example.com", "pw123").unwrap().unwrap();
        assert_eq!(login.user_id, registered.user_id);
        assert!(verify_login(&db, "ann@example.com", "nope").unwrap().is_none());

        let duplicate = register_user(&db, &data).unwrap_err();
        assert!(duplicate.contains("username is taken"));
    }

    #[test]
    fn test_email_domain_drops_mailbox() {
        assert_eq!(email_domain("ann@example.com"), "example.com");
        assert_eq!(email_domain(" a@b@mail.org "), "mail.org");
        assert_eq!(email_domain("no-at-sign"), "");
    }
}
