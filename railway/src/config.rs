use crate::provider::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://backboard.railway.app/graphql/v2";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Prefix shared by every environment variable `RailwayConfig::from_env` reads.
pub const ENV_PREFIX: &str = "RAILWAY_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RailwayConfig {
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub timeout: Option<Duration>,
    pub page_size: u32,
    pub service_template: Option<String>,
}

impl Default for RailwayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
            timeout: None,
            page_size: DEFAULT_PAGE_SIZE,
            service_template: None,
        }
    }
}

/// Raw `RAILWAY_*` variables as envy sees them.
#[derive(Debug, Default, Deserialize)]
struct EnvSettings {
    api_token: Option<String>,
    api_url: Option<String>,
    service_template: Option<String>,
    page_size: Option<u32>,
    timeout_secs: Option<u64>,
}

impl RailwayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from `RAILWAY_API_TOKEN`, `RAILWAY_API_URL`,
    /// `RAILWAY_SERVICE_TEMPLATE`, `RAILWAY_PAGE_SIZE` and `RAILWAY_TIMEOUT_SECS`.
    ///
    /// A missing token is not an error here; every gateway operation reports it
    /// instead, so a dashboard can still start without credentials.
    pub fn from_env() -> GatewayResult<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> GatewayResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let settings: EnvSettings = envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|e| GatewayError::InvalidConfig {
                message: format!("Failed to read {}* variables: {}", ENV_PREFIX, e),
            })?;

        let mut config = Self::default();
        if let Some(url) = settings.api_url {
            config.endpoint = url;
        }
        config.token = settings.api_token;
        config.service_template = settings.service_template;
        if let Some(page_size) = settings.page_size {
            config.page_size = page_size;
        }
        config.timeout = settings.timeout_secs.map(Duration::from_secs);

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_service_template(mut self, code: impl Into<String>) -> Self {
        self.service_template = Some(code.into());
        self
    }

    /// The bearer token, treating an empty string the same as an unset variable.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn service_template(&self) -> Option<&str> {
        self.service_template
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("Endpoint cannot be empty".to_string());
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err("Endpoint must start with http:// or https://".to_string());
        }

        if self.page_size == 0 {
            return Err("Page size must be greater than 0".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err("Timeout must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}
