use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{ApiError, CastVoteRequest, DateKey, ErrorResponse, MonthLabel, TokenResponse, VoteApi, VoteRecord};
use tracing::error;
use crate::config::CONFIG;

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn check_status(response: &Response) -> Result<(), ApiError> {
    if response.ok() {
        Ok(())
    } else {
        Err(ApiError::from_status(response.status()))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    check_status(&response)?;
    response.json::<T>().await.map_err(|e| {
        error!("Failed to parse response from {}: {}", response.url(), e);
        ApiError::Malformed(e.to_string())
    })
}

/// Vote endpoints over `fetch`.
#[derive(Clone)]
pub struct HttpVoteApi {
    base_url: String,
}

impl HttpVoteApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    async fn get<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T, ApiError> {
        let response = Request::get(&format!("{}{}", self.base_url, path))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(response).await
    }
}

impl Default for HttpVoteApi {
    fn default() -> Self {
        Self::new(CONFIG.api_base_url)
    }
}

#[async_trait(?Send)]
impl VoteApi for HttpVoteApi {
    async fn fetch_month(&self, token: &str, month: MonthLabel) -> Result<Vec<VoteRecord>, ApiError> {
        self.get(token, &format!("/votes/{}", month)).await
    }

    async fn fetch_my_votes(&self, token: &str) -> Result<Vec<VoteRecord>, ApiError> {
        self.get(token, "/votes/my-votes").await
    }

    async fn toggle_vote(&self, token: &str, event_date: &DateKey, month: MonthLabel) -> Result<(), ApiError> {
        let body = CastVoteRequest { event_date: event_date.clone(), month };
        let response = Request::post(&format!("{}/votes", self.base_url))
            .header("Authorization", &bearer(token))
            .json(&body)
            .map_err(|e| ApiError::Malformed(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(&response)
    }
}

/// `POST /token` with the OAuth2 password form. Returns the server's error
/// detail on rejection.
pub async fn login(username: &str, password: &str) -> Result<String, String> {
    let form = format!(
        "username={}&password={}",
        String::from(js_sys::encode_uri_component(username)),
        String::from(js_sys::encode_uri_component(password)),
    );
    let response = Request::post(&format!("{}/token", CONFIG.api_base_url))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.ok() {
        let status = response.status();
        return Err(match response.json::<ErrorResponse>().await {
            Ok(body) => body.detail,
            Err(_) => format!("Login failed ({})", status),
        });
    }

    response.json::<TokenResponse>().await
        .map(|t| t.access_token)
        .map_err(|_| "Failed to parse login response".to_string())
}
