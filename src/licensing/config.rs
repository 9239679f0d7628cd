use crate::licensing::error::{LicensingError, LicensingResult};
use reqwest::Url;
use std::time::Duration;

/// Trial subscription configuration
pub const TRIAL_PRODUCT_ID: &str = "docker-ee-trial";
pub const TRIAL_RATE_PLAN_ID: &str = "free-trial";
pub const TRIAL_SUBSCRIPTION_NAME: &str = "Docker Enterprise Free Trial";

/// Only subscriptions whose product id starts with this are reported
pub const PRODUCT_FAMILY_PREFIX: &str = "docker-ee";

/// Timeout of the HTTP client built when the caller does not supply one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Licensing client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Scheme, host and path prefix of the licensing API
    pub base_uri: Url,
    /// Transport used for every request; a default client is built when unset
    pub http_client: Option<reqwest::Client>,
    /// Base64 encoded PEM public key used to validate issued licenses
    pub public_key: String,
}

impl Config {
    pub fn new(base_uri: &str, public_key: impl Into<String>) -> LicensingResult<Self> {
        let base_uri = Url::parse(base_uri).map_err(|e| LicensingError::InvalidBaseUri {
            uri: base_uri.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_uri,
            http_client: None,
            public_key: public_key.into(),
        })
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

/// Build the HTTP client used when the configuration does not carry one
pub fn default_http_client() -> LicensingResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(LicensingError::HttpClient)
}

/// API endpoints, relative to the configured base URI
pub mod endpoints {
    pub const LOGIN: &str = "/v2/users/login/";
    pub const USER_ORGS: &str = "/v2/user/orgs/";
    pub const LICENSE_CHECK: &str = "/api/licensing/v1/licenses/check";
    pub const SUBSCRIPTIONS: &str = "/api/billing/v4/subscriptions";

    pub fn user(username: &str) -> String {
        format!("/v2/users/{}/", urlencoding::encode(username))
    }

    pub fn account(docker_id: &str) -> String {
        format!("/api/billing/v4/accounts/{}", urlencoding::encode(docker_id))
    }

    pub fn license_file(subscription_id: &str) -> String {
        format!(
            "{}/{}/license-file",
            SUBSCRIPTIONS,
            urlencoding::encode(subscription_id)
        )
    }
}
