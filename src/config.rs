use crate::error::{GoveeApiError, Result};
use crate::platform_api::GoveeApiClient;
use std::time::Duration;

/// Base URL of the Govee Platform API V1.
pub const DEFAULT_BASE_URL: &str = "https://openapi.api.govee.com/router/api/v1";
pub const API_KEY_ENV_VAR: &str = "GOVEE_API_KEY";

/// Returns the value of the named environment variable, or `None`
/// if it is not set. A value that is not valid unicode is an error.
pub fn opt_env_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(v) => Ok(Some(v)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(GoveeApiError::Configuration(format!("${name}: {err}"))),
    }
}

/// Tuning for the default reqwest transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Deadline for a whole request, connect through body
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// How long an idle pooled connection is kept around
    pub pool_idle_timeout: Option<Duration>,
    pub pool_max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: usize::MAX,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url<U: Into<String>>(mut self, base_url: U) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(clap::Parser, Debug, Default)]
pub struct GoveeApiArguments {
    /// The Govee API Key. If not passed here, it will be read from
    /// the GOVEE_API_KEY environment variable.
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

impl GoveeApiArguments {
    pub fn opt_api_key(&self) -> Result<Option<String>> {
        match &self.api_key {
            Some(key) => Ok(Some(key.to_string())),
            None => opt_env_var(API_KEY_ENV_VAR),
        }
    }

    pub fn api_key(&self) -> Result<String> {
        self.opt_api_key()?.ok_or_else(|| {
            GoveeApiError::Configuration(
                "Please specify the api key either via the \
                --api-key parameter or by setting $GOVEE_API_KEY"
                    .to_string(),
            )
        })
    }

    pub fn api_client(&self) -> Result<GoveeApiClient> {
        let key = self.api_key()?;
        GoveeApiClient::new(key)
    }
}
