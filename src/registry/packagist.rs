//! Private Packagist API client.
//!
//! Requests are signed with the `PACKAGIST-HMAC-SHA256` scheme: the method,
//! host, path and sorted auth parameters are HMAC'd with the API secret and
//! sent in the `Authorization` header.

use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{CompatError, Result};

use super::{Package, PackageDetail, PackageRegistry};

/// Production API root.
pub const DEFAULT_API_URL: &str = "https://packagist.com/api";

type HmacSha256 = Hmac<Sha256>;

static NONCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// API key pair.
#[derive(Clone)]
pub struct ApiCredentials {
    /// Public API token.
    pub key: String,
    /// API secret used to sign requests.
    pub secret: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

/// Blocking client for the subrepository package endpoints.
pub struct PackagistClient {
    client: Client,
    base_url: String,
    credentials: ApiCredentials,
}

impl PackagistClient {
    /// Create a client for `base_url` (normally [`DEFAULT_API_URL`]).
    pub fn new(
        base_url: impl Into<String>,
        credentials: ApiCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("compat-check/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CompatError::Registry {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let parsed = reqwest::Url::parse(&url).map_err(|e| CompatError::Registry {
            message: format!("invalid URL {}: {}", url, e),
        })?;

        let timestamp = chrono::Utc::now().timestamp();
        let cnonce = cnonce(timestamp);
        let authorization = self.authorization("GET", &parsed, timestamp, &cnonce)?;

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(parsed)
            .header("Authorization", authorization)
            .send()
            .map_err(|e| CompatError::Registry {
                message: format!("failed to fetch {}: {}", url, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompatError::Registry {
                message: format!("HTTP {} fetching {}", status, url),
            });
        }

        response.json::<T>().map_err(|e| CompatError::Registry {
            message: format!("invalid response from {}: {}", url, e),
        })
    }

    /// Build the `Authorization` header value for a request.
    fn authorization(
        &self,
        method: &str,
        url: &reqwest::Url,
        timestamp: i64,
        cnonce: &str,
    ) -> Result<String> {
        let host = url.host_str().unwrap_or_default().to_lowercase();
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        };

        // Parameters in lexical key order: cnonce, key, timestamp.
        let params = format!(
            "cnonce={}&key={}&timestamp={}",
            cnonce, self.credentials.key, timestamp
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            method.to_uppercase(),
            host,
            url.path(),
            params
        );

        let mut mac = HmacSha256::new_from_slice(self.credentials.secret.as_bytes()).map_err(
            |e| CompatError::Registry {
                message: format!("invalid API secret: {}", e),
            },
        )?;
        mac.update(string_to_sign.as_bytes());
        let signature =
            base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        Ok(format!(
            "PACKAGIST-HMAC-SHA256 Key={}, Timestamp={}, Cnonce={}, Signature={}",
            self.credentials.key, timestamp, cnonce, signature
        ))
    }
}

impl PackageRegistry for PackagistClient {
    fn list_packages(&self, subrepo: &str) -> Result<Vec<Package>> {
        self.get_json(&format!("/subrepositories/{}/packages/", subrepo))
    }

    fn package_detail(&self, subrepo: &str, name: &str) -> Result<PackageDetail> {
        self.get_json(&format!("/subrepositories/{}/packages/{}/", subrepo, name))
    }
}

/// Unique-per-request nonce.
fn cnonce(timestamp: i64) -> String {
    let counter = NONCE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let seed = format!("{}:{}:{}:{}", timestamp, nanos, std::process::id(), counter);
    hex::encode(&Sha256::digest(seed.as_bytes())[..16])
}
