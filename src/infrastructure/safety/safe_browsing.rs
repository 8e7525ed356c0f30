//! Google Safe Browsing v4 lookup adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::safety::UrlSafetyChecker;
use crate::error::AppError;

const THREAT_TYPES: &[&str] = &[
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    client: ClientInfo<'a>,
    threat_info: ThreatInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    client_id: &'a str,
    client_version: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'a [&'a str],
    platform_types: &'a [&'a str],
    threat_entry_types: &'a [&'a str],
    threat_entries: Vec<ThreatEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<serde_json::Value>,
}

/// Checks URLs against the Safe Browsing `threatMatches:find` endpoint.
///
/// Any transport, status or decoding failure is reported as
/// [`AppError::UrlSafetyCheckFailed`]: a URL that cannot be vouched for is
/// not shortened.
pub struct SafeBrowsingChecker {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl SafeBrowsingChecker {
    /// Builds a checker with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is not a valid URL or the reqwest
    /// client cannot be constructed.
    pub fn new(endpoint: &str, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

fn build_request(url: &str) -> FindRequest<'_> {
    FindRequest {
        client: ClientInfo {
            client_id: env!("CARGO_PKG_NAME"),
            client_version: env!("CARGO_PKG_VERSION"),
        },
        threat_info: ThreatInfo {
            threat_types: THREAT_TYPES,
            platform_types: &["ANY_PLATFORM"],
            threat_entry_types: &["URL"],
            threat_entries: vec![ThreatEntry { url }],
        },
    }
}

#[async_trait]
impl UrlSafetyChecker for SafeBrowsingChecker {
    async fn is_unsafe(&self, url: &str) -> Result<bool, AppError> {
        let failed = || AppError::UrlSafetyCheckFailed {
            url: url.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&build_request(url))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Safe Browsing request failed");
                failed()
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Safe Browsing returned an error status");
            return Err(failed());
        }

        let body: FindResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Safe Browsing response could not be decoded");
            failed()
        })?;

        if !body.matches.is_empty() {
            warn!(url, matches = body.matches.len(), "URL matched Safe Browsing threat lists");
            return Ok(true);
        }

        Ok(false)
    }
}
