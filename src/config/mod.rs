//! Client configuration module
use crate::errors::{ApiError, ApiResult};
use reqwest::Url;
use retry_policies::policies::ExponentialBackoff;
use retry_policies::Jitter;
use std::env;
use std::time::Duration;

pub const BASE_V1_API_URL: &str = "https://api.data.gov.sg/v1";
pub const BASE_V2_API_URL: &str = "https://api-open.data.gov.sg/v2/real-time/api";
pub const BASE_CKAN_DOMAIN: &str = "https://data.gov.sg";
pub const BASE_CKAN_API_URL: &str = "https://data.gov.sg/api/action";
pub const USER_AGENT: &str = concat!("datagovsg-rs/", env!("CARGO_PKG_VERSION"));

// Cache durations, in seconds
pub const CACHE_THIRTY_SECONDS: u64 = 30;
pub const CACHE_ONE_MINUTE: u64 = 60;
pub const CACHE_FIVE_MINUTES: u64 = CACHE_ONE_MINUTE * 5;
pub const CACHE_THIRTY_MINUTES: u64 = CACHE_ONE_MINUTE * 30;
pub const CACHE_ONE_HOUR: u64 = CACHE_ONE_MINUTE * 60;
pub const CACHE_TWELVE_HOURS: u64 = CACHE_ONE_HOUR * 12;
pub const CACHE_ONE_DAY: u64 = CACHE_ONE_HOUR * 24;
pub const CACHE_MAXSIZE: usize = 1024;

/// Statuses worth another attempt
pub const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

const MAX_BACKOFF: Duration = Duration::from_secs(120);

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub v1_api_url: String,
    pub v2_api_url: String,
    pub ckan_api_url: String,
    pub ckan_domain: String,
    pub user_agent: String,
    pub timeouts: Timeouts,
    pub retry: RetryPolicy,
    pub cache_capacity: usize,
}

#[derive(Clone, Debug)]
pub struct Timeouts {
    pub connect_seconds: u64,
    pub read_seconds: u64,
}

/// Exponential backoff applied to transient server errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: Duration,
}

impl RetryPolicy {
    /// Unjittered backoff doubling from `backoff_factor`, capped at two minutes
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .retry_bounds(self.backoff_factor.min(MAX_BACKOFF), MAX_BACKOFF)
            .jitter(Jitter::None)
            .build_with_max_retries(self.max_retries)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: Duration::from_millis(100),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            v1_api_url: BASE_V1_API_URL.to_string(),
            v2_api_url: BASE_V2_API_URL.to_string(),
            ckan_api_url: BASE_CKAN_API_URL.to_string(),
            ckan_domain: BASE_CKAN_DOMAIN.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeouts: Timeouts {
                connect_seconds: 10,
                read_seconds: 30,
            },
            retry: RetryPolicy::default(),
            cache_capacity: CACHE_MAXSIZE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> ApiResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let url = |key: &str, default: String| -> ApiResult<String> {
            match lookup(key) {
                Some(value) => {
                    let trimmed = value.trim().trim_end_matches('/');
                    Url::parse(trimmed).map_err(|e| {
                        ApiError::validation(format!("{key} is not an absolute URL: {e}"))
                    })?;
                    Ok(trimmed.to_string())
                }
                None => Ok(default),
            }
        };
        let number = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        Ok(Self {
            v1_api_url: url("DATAGOVSG_V1_API_URL", defaults.v1_api_url)?,
            v2_api_url: url("DATAGOVSG_V2_API_URL", defaults.v2_api_url)?,
            ckan_api_url: url("DATAGOVSG_CKAN_API_URL", defaults.ckan_api_url)?,
            ckan_domain: url("DATAGOVSG_CKAN_DOMAIN", defaults.ckan_domain)?,
            user_agent: lookup("DATAGOVSG_USER_AGENT")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            timeouts: Timeouts {
                connect_seconds: number(
                    "DATAGOVSG_CONNECT_TIMEOUT_SECONDS",
                    defaults.timeouts.connect_seconds,
                ),
                read_seconds: number("DATAGOVSG_TIMEOUT_SECONDS", defaults.timeouts.read_seconds),
            },
            retry: RetryPolicy {
                max_retries: number(
                    "DATAGOVSG_MAX_RETRIES",
                    u64::from(defaults.retry.max_retries),
                )
                .try_into()
                .unwrap_or(defaults.retry.max_retries),
                backoff_factor: Duration::from_millis(number(
                    "DATAGOVSG_BACKOFF_MILLIS",
                    defaults.retry.backoff_factor.as_millis() as u64,
                )),
            },
            cache_capacity: number("DATAGOVSG_CACHE_CAPACITY", defaults.cache_capacity as u64)
                as usize,
        })
    }

    /// Build a v1 endpoint URL, e.g. `transport/taxi-availability`
    pub fn v1_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.v1_api_url.trim_end_matches('/'), path)
    }

    /// Build a v2 real-time endpoint URL, e.g. `psi`
    pub fn v2_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.v2_api_url.trim_end_matches('/'), path)
    }

    /// Build a CKAN action endpoint URL, e.g. `package_show`
    pub fn ckan_endpoint(&self, action: &str) -> String {
        format!("{}/{}", self.ckan_api_url.trim_end_matches('/'), action)
    }
}
