//! Runtime configuration
//!
//! Everything is read from environment variables.

use std::path::PathBuf;

pub const DATABASE_PATH_VAR: &str = "DIETPLAN_DATABASE_PATH";
pub const NUTRITIONIX_APP_ID_VAR: &str = "NUTRITIONIX_APP_ID";
pub const NUTRITIONIX_API_KEY_VAR: &str = "NUTRITIONIX_API_KEY";
pub const NUTRITIONIX_BASE_URL_VAR: &str = "NUTRITIONIX_BASE_URL";

pub const DEFAULT_NUTRITIONIX_BASE_URL: &str = "https://trackapi.nutritionix.com";

/// Get the database path from environment or use `<project>/data/dietplan.db`
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(root) = path.parent().and_then(|p| p.parent()) {
                    path = root.to_path_buf();
                }
            }

            path.push("data");
            path.push("dietplan.db");
            path
        })
}

/// Credentials for the Nutritionix API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionixConfig {
    pub app_id: String,
    pub api_key: String,
    pub base_url: String,
}

impl NutritionixConfig {
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_NUTRITIONIX_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// `None` unless both the app id and key are set and non-empty
    pub fn from_env() -> Option<Self> {
        let lookup = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let config = Self::new(lookup(NUTRITIONIX_APP_ID_VAR)?, lookup(NUTRITIONIX_API_KEY_VAR)?);
        Some(match lookup(NUTRITIONIX_BASE_URL_VAR) {
            Some(base_url) => config.with_base_url(base_url),
            None => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = NutritionixConfig::new("id", "key").with_base_url("http://localhost:8080/");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(NutritionixConfig::new("id", "key").base_url, DEFAULT_NUTRITIONIX_BASE_URL);
    }

    #[test]
    fn test_database_path_ends_with_file_name() {
        if std::env::var(DATABASE_PATH_VAR).is_err() {
            assert!(database_path().ends_with("data/dietplan.db"));
        }
    }
}
