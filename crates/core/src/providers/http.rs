use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::{redact_query, CoreError};

/// Shared client construction: every provider gets the same timeout.
pub fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET `url`, reject non-2xx responses, decode the JSON body.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: &str,
    url: &str,
    what: &str,
) -> Result<T, CoreError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CoreError::Api {
            provider: provider.to_string(),
            message: format!("Failed to fetch {what}: HTTP {status}"),
        });
    }

    response.json::<T>().await.map_err(|e| CoreError::Api {
        provider: provider.to_string(),
        message: format!("Failed to parse {what}: {}", redact_query(&e.to_string())),
    })
}
