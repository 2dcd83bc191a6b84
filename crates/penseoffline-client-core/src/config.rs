use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_BACKEND_PORT: u16 = 8000;
pub const ENV_API_BASE_URL: &str = "PENSEOFFLINE_API_URL";

pub const API_BASE_SOURCE_OVERRIDE: &str = "override";
pub const API_BASE_SOURCE_LOOPBACK: &str = "loopback";
pub const API_BASE_SOURCE_SAME_ORIGIN: &str = "same_origin";
pub const API_BASE_SOURCE_BACKEND_PORT: &str = "backend_port";
pub const API_BASE_SOURCE_DEFAULT_LOCAL: &str = "default_local";

const LOOPBACK_HOSTS: [&str; 4] = ["localhost", "127.0.0.1", "::1", "[::1]"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("PenseOffline API base URL is blank")]
    BlankBaseUrl,
    #[error("PenseOffline API base URL `{0}` is relative but no page location is known")]
    RelativeWithoutPage(String),
    #[error("PenseOffline API base URL `{0}` is not an http(s) origin")]
    UnsupportedBaseUrl(String),
}

/// The resolved API origin for one page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiBase {
    pub base_url: String,
    pub source: String,
}

impl ApiBase {
    pub fn new(base_url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn default_local() -> Self {
        Self::new(DEFAULT_API_BASE_URL, API_BASE_SOURCE_DEFAULT_LOCAL)
    }
}

/// The parts of `window.location` the resolver looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Includes the trailing colon, e.g. `https:`.
    pub protocol: String,
    pub hostname: String,
    pub origin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStrategy {
    /// Frontend and API are served from the same origin.
    #[default]
    SameOrigin,
    /// API listens on a fixed port of the page's host.
    BackendPort(u16),
}

#[must_use]
pub fn resolve_api_base(
    override_url: Option<&str>,
    location: Option<&PageLocation>,
    strategy: ResolutionStrategy,
) -> ApiBase {
    if let Some(base_url) = override_url.filter(|value| !value.trim().is_empty()) {
        return ApiBase::new(base_url, API_BASE_SOURCE_OVERRIDE);
    }

    let Some(location) = location else {
        return ApiBase::default_local();
    };

    if is_loopback_host(&location.hostname) {
        return ApiBase::new(DEFAULT_API_BASE_URL, API_BASE_SOURCE_LOOPBACK);
    }

    match strategy {
        ResolutionStrategy::SameOrigin => {
            ApiBase::new(location.origin.clone(), API_BASE_SOURCE_SAME_ORIGIN)
        }
        ResolutionStrategy::BackendPort(port) => ApiBase::new(
            format!("{}//{}:{port}", location.protocol, location.hostname),
            API_BASE_SOURCE_BACKEND_PORT,
        ),
    }
}

/// Native counterpart of the browser override: reads `PENSEOFFLINE_API_URL`.
#[must_use]
pub fn resolve_api_base_from_env() -> ApiBase {
    let override_url = std::env::var(ENV_API_BASE_URL).ok();
    resolve_api_base(override_url.as_deref(), None, ResolutionStrategy::default())
}

#[must_use]
pub fn is_loopback_host(hostname: &str) -> bool {
    let hostname = hostname.trim().to_ascii_lowercase();
    LOOPBACK_HOSTS.contains(&hostname.as_str())
}

/// Turns a resolved base into the absolute URL requests are sent to.
/// Page-relative (`/api`) and scheme-relative (`//api.host`) bases are
/// anchored to the page they were resolved on.
pub fn absolute_base_url(raw: &str, page: Option<&PageLocation>) -> Result<String, ConfigError> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return Err(ConfigError::BlankBaseUrl);
    }

    let anchored = if candidate.starts_with('/') {
        let Some(page) = page else {
            return Err(ConfigError::RelativeWithoutPage(candidate.to_string()));
        };
        match candidate.strip_prefix("//") {
            Some(authority) => format!("{}//{authority}", page.protocol),
            None => format!("{}{candidate}", page.origin.trim_end_matches('/')),
        }
    } else {
        candidate.to_string()
    };

    normalize_base_url(&anchored)
}

/// Accepts only absolute `http(s)://host...` URLs; trailing slashes are dropped.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let candidate = raw.trim().trim_end_matches('/');
    if candidate.is_empty() {
        return Err(ConfigError::BlankBaseUrl);
    }

    let authority = candidate
        .strip_prefix("https://")
        .or_else(|| candidate.strip_prefix("http://"));
    match authority {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => Ok(candidate.to_string()),
        _ => Err(ConfigError::UnsupportedBaseUrl(candidate.to_string())),
    }
}
