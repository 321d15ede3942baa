use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the study API lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    timeout: Duration,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if `base_url` does not parse or cannot
    /// carry path segments.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url.trim()).map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { base_url, timeout })
    }

    /// Reads `STUDY_API_BASE_URL` and `STUDY_API_TIMEOUT_SECS`, falling back to
    /// the local development server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if either variable is set to something unusable.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url =
            env::var("STUDY_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let timeout = match env::var("STUDY_API_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        Self::new(&base_url, timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ApiError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ApiError::InvalidTimeout(raw.to_string())),
    }
}
