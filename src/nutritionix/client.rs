//! Nutritionix HTTP client

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde_json::json;
use thiserror::Error;

use crate::config::NutritionixConfig;
use super::types::{ApiErrorBody, FoodNutrients, InstantSearchResults, NutrientsResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum NutritionixError {
    #[error("Nutritionix credentials are not configured (set NUTRITIONIX_APP_ID and NUTRITIONIX_API_KEY)")]
    MissingCredentials,

    #[error("Error connecting to nutrition API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error from Nutritionix API: {status}{}", detail_suffix(.message))]
    Api { status: u16, message: Option<String> },
}

fn detail_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(" - {m}"),
        None => String::new(),
    }
}

/// Async client for the Nutritionix v2 API
#[derive(Debug, Clone)]
pub struct NutritionixClient {
    http: reqwest::Client,
    config: NutritionixConfig,
}

impl NutritionixClient {
    pub fn new(config: NutritionixConfig) -> Result<Self, NutritionixError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    /// Build a client from environment credentials
    pub fn from_env() -> Result<Self, NutritionixError> {
        let config = NutritionixConfig::from_env().ok_or(NutritionixError::MissingCredentials)?;
        Self::new(config)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-app-id", &self.config.app_id)
            .header("x-app-key", &self.config.api_key)
            .header("x-remote-user-id", "0")
    }

    /// Natural-language nutrient lookup ("1 cup rice and 2 eggs")
    pub async fn natural_nutrients(&self, query: &str) -> Result<Vec<FoodNutrients>, NutritionixError> {
        let url = format!("{}/v2/natural/nutrients", self.config.base_url);
        tracing::debug!(query, "Nutritionix nutrients lookup");

        let request = self.authorize(self.http.post(&url)).json(&json!({ "query": query }));
        let response = check_status(request.send().await?).await?;
        let body: NutrientsResponse = response.json().await?;
        Ok(body.foods)
    }

    /// Instant search over common and branded food names
    pub async fn instant_search(&self, query: &str) -> Result<InstantSearchResults, NutritionixError> {
        let url = format!("{}/v2/search/instant", self.config.base_url);
        tracing::debug!(query, "Nutritionix instant search");

        let request = self
            .authorize(self.http.get(&url))
            .query(&[("query", query), ("detailed", "true")]);
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, NutritionixError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    tracing::warn!(status = status.as_u16(), message = ?message, "Nutritionix request failed");

    Err(NutritionixError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_formatting() {
        let with_message = NutritionixError::Api { status: 401, message: Some("unauthorized".into()) };
        assert_eq!(with_message.to_string(), "Error from Nutritionix API: 401 - unauthorized");

        let bare = NutritionixError::Api { status: 500, message: None };
        assert_eq!(bare.to_string(), "Error from Nutritionix API: 500");
    }
}
