use std::error::Error as _;
use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{JuError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// One client per process; every adapter shares its connection pool.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("Ju/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| JuError::Configuration(format!("Failed to create HTTP client: {e}")))
}

/// Parses a configured base URL, reporting a bad one as a connection failure
/// of the adapter named by `prefix`.
pub fn parse_base_url(base_url: &str, prefix: &str) -> Result<Url> {
    Url::parse(base_url.trim_end_matches('/')).map_err(|e| JuError::remote(prefix, e))
}

/// Sends `request` and decodes its JSON body.
///
/// Transport failures, timeouts and non-2xx statuses become
/// `RemoteConnection` errors carrying `prefix`. A body that is not the
/// expected JSON is a `Transform` error.
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder, prefix: &str) -> Result<T> {
    let body = send(request).await.map_err(|e| {
        let detail = describe(e);
        warn!("{prefix} {detail}");
        JuError::remote(prefix, detail)
    })?;

    serde_json::from_str(&body).map_err(|e| JuError::Transform(format!("{prefix} {e}")))
}

/// The error and every cause under it, without the request URL: the cause
/// (refused, DNS, TLS) is what tells one outage from another.
fn describe(error: reqwest::Error) -> String {
    let error = error.without_url();
    let mut detail = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };

    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !detail.contains(&cause_text) {
            detail.push_str(": ");
            detail.push_str(&cause_text);
        }
        source = cause.source();
    }
    detail
}

async fn send(request: RequestBuilder) -> reqwest::Result<String> {
    let response = request.send().await?.error_for_status()?;
    debug!("{} answered {}", response.url(), response.status());
    response.text().await
}
