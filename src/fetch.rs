use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::{StatusCode, Url};
use tracing::{info, warn};

use crate::config::{Endpoint, FetchSettings};
use crate::error::ExtractError;
use crate::parser::markup::looks_like_post_page;

/// Fetches article pages through an ordered list of endpoints.
pub struct Fetcher {
    client: reqwest::Client,
    endpoints: Vec<Endpoint>,
    max_retries: u32,
    backoff: Duration,
}

impl Fetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoints: settings.endpoints.clone(),
            max_retries: settings.max_retries,
            backoff: Duration::from_millis(settings.backoff_ms),
        })
    }

    /// First plausible page for `url`, or `FetchUnavailable` naming every endpoint tried.
    pub async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        let mut attempts = Vec::with_capacity(self.endpoints.len());

        for endpoint in &self.endpoints {
            match self.fetch_with_retry(endpoint, url).await {
                Ok(page) if looks_like_post_page(&page) => {
                    info!("Fetched {} via {}", url, endpoint.name);
                    return Ok(page);
                }
                Ok(_) => {
                    warn!("Endpoint {} returned no article markup for {}", endpoint.name, url);
                    attempts.push(format!("{}: no article markup", endpoint.name));
                }
                Err(e) => {
                    warn!("Endpoint {} failed for {}: {:#}", endpoint.name, url, e);
                    attempts.push(format!("{}: {}", endpoint.name, e));
                }
            }
        }

        Err(ExtractError::FetchUnavailable { attempts })
    }

    async fn fetch_with_retry(&self, endpoint: &Endpoint, url: &str) -> Result<String> {
        let request_url = request_url(endpoint, url)?;

        for attempt in 0..self.max_retries {
            let status = match self.fetch_once(endpoint, &request_url).await? {
                Ok(page) => return Ok(page),
                Err(status) if should_retry(status) => status,
                Err(status) => bail!("Status: {}", status),
            };

            let backoff = backoff_delay(self.backoff, attempt);
            warn!(
                "{} answered {} (attempt {}/{}), backing off {:.1}s",
                endpoint.name,
                status,
                attempt + 1,
                self.max_retries,
                backoff.as_secs_f64()
            );
            tokio::time::sleep(backoff).await;
        }

        match self.fetch_once(endpoint, &request_url).await? {
            Ok(page) => Ok(page),
            Err(status) => bail!("Status: {}", status),
        }
    }

    /// One request. A non-success status comes back as `Err(status)` so the caller can decide to retry.
    async fn fetch_once(&self, endpoint: &Endpoint, request_url: &Url) -> Result<Result<String, StatusCode>> {
        let response = self.client.get(request_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Err(status));
        }
        let body = response.text().await?;
        unwrap_payload(endpoint, body).map(Ok)
    }
}

const MAX_BACKOFF: Duration = Duration::from_secs(60);

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(MAX_BACKOFF)
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// The URL actually requested for `endpoint`.
pub fn request_url(endpoint: &Endpoint, url: &str) -> Result<Url> {
    let Some(base) = &endpoint.base else {
        return Url::parse(url).with_context(|| format!("Invalid article URL {}", url));
    };

    let mut request = Url::parse(base).with_context(|| format!("Invalid endpoint base {}", base))?;
    match &endpoint.param {
        Some(param) => {
            request.query_pairs_mut().append_pair(param, url);
        }
        None => {
            request.query_pairs_mut().append_key_only(url);
        }
    }
    Ok(request)
}

fn unwrap_payload(endpoint: &Endpoint, body: String) -> Result<String> {
    let Some(field) = &endpoint.json_field else {
        return Ok(body);
    };
    let value: serde_json::Value =
        serde_json::from_str(&body).with_context(|| format!("{} did not return JSON", endpoint.name))?;
    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{} response has no string field {:?}", endpoint.name, field))
}
