use crate::{ApiError, ApiResult};
use std::time::Duration;

const DEFAULT_SERVER: &str = "https://data.nba.net";
const DEFAULT_BOOTSTRAP_PATH: &str = "/15m/prod/v1/today.json";
/// The origin negotiates odd content for unknown agents, so every request
/// presents itself as a desktop browser.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:45.0) Gecko/20100101 Firefox/45.0";

/// Connection settings for the stats engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Origin host every endpoint path is relative to.
    pub server: String,
    /// Path of the daily bootstrap document listing the endpoint templates.
    pub bootstrap_path: String,
    pub user_agent: String,
    /// `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.into(),
            bootstrap_path: DEFAULT_BOOTSTRAP_PATH.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout: None,
        }
    }
}

impl ApiConfig {
    /// Defaults, overridden by:
    /// - `NBASTATS_SERVER`
    /// - `NBASTATS_BOOTSTRAP_PATH`
    /// - `NBASTATS_USER_AGENT`
    /// - `NBASTATS_TIMEOUT_SECS`
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(server) = var("NBASTATS_SERVER") {
            config.server = server.trim_end_matches('/').to_owned();
        }
        if let Some(path) = var("NBASTATS_BOOTSTRAP_PATH") {
            config.bootstrap_path = path;
        }
        if let Some(agent) = var("NBASTATS_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(secs) = var("NBASTATS_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                ApiError::InvalidParameter(format!("NBASTATS_TIMEOUT_SECS is not a number: {secs:?}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Join an endpoint path onto the configured origin.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.server)
        } else {
            format!("{}/{path}", self.server)
        }
    }

    pub fn bootstrap_url(&self) -> String {
        self.url(&self.bootstrap_path)
    }
}
