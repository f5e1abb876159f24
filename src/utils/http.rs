// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::FeedsConfig;

/// Create a configured asynchronous HTTP client.
///
/// The request timeout is a backstop; cycles also bound each fetch.
pub fn create_async_client(config: &FeedsConfig, timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
