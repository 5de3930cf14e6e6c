//! Client IP lookup for login session records.
//!
//! Lookup is best-effort: any failure yields [`UNKNOWN_IP`] and never
//! blocks a login.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Placeholder recorded when the address cannot be determined.
pub const UNKNOWN_IP: &str = "Unknown";

/// Source of the client's public IP address.
#[async_trait]
pub trait IpLookup: Send + Sync {
    /// The address, or [`UNKNOWN_IP`].
    async fn client_ip(&self) -> String;
}

/// Looks the address up from a JSON endpoint answering `{"ip": "..."}`.
pub struct HttpIpLookup {
    http: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct IpResponse {
    ip: String,
}

impl HttpIpLookup {
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap_or_default();
        Self {
            http,
            url: url.into(),
        }
    }

    async fn fetch(&self) -> Result<String, reqwest::Error> {
        let response: IpResponse = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.ip)
    }
}

#[async_trait]
impl IpLookup for HttpIpLookup {
    async fn client_ip(&self) -> String {
        match self.fetch().await {
            Ok(ip) if !ip.trim().is_empty() => ip,
            Ok(_) => UNKNOWN_IP.to_string(),
            Err(e) => {
                debug!(url = %self.url, error = %e, "IP lookup failed");
                UNKNOWN_IP.to_string()
            }
        }
    }
}

/// Fixed address, used when lookup is disabled and in tests.
#[derive(Debug, Clone)]
pub struct StaticIp(String);

impl StaticIp {
    pub fn new(ip: impl Into<String>) -> Self {
        Self(ip.into())
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_IP.to_string())
    }
}

#[async_trait]
impl IpLookup for StaticIp {
    async fn client_ip(&self) -> String {
        self.0.clone()
    }
}
