//! Shared HTTP plumbing
//!
//! One explicitly-passed client per resolver; helpers classify responses
//! into the fetch error taxonomy.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config;
use crate::error::FetchError;

/// Build the HTTP client every component borrows.
pub fn client() -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(config::app::USER_AGENT)
        .timeout(Duration::from_secs(config::net::TIMEOUT_SECS))
        .build()
        .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {}", e)))
}

/// GET with status classification: 404 is `NotFound`, any other
/// non-success status is `Transport`.
pub async fn get(client: &Client, url: &str) -> Result<Response, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound);
    }
    if !response.status().is_success() {
        return Err(FetchError::Transport(format!(
            "status {}",
            response.status()
        )));
    }
    Ok(response)
}

/// GET a JSON document into a typed model.
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
    get(client, url)
        .await?
        .json::<T>()
        .await
        .map_err(|e| FetchError::Malformed(e.to_string()))
}

/// GET a plain-text document.
pub async fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    get(client, url)
        .await?
        .text()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))
}
