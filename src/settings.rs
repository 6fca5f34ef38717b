const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    /// `EnvFilter` directives, e.g. `info` or `nba_api=debug`.
    pub log_filter: Option<String>,
}

impl AppSettings {
    /// `NBASTATS_LOG` wins over `RUST_LOG`; neither set means warnings only.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_filter = ["NBASTATS_LOG", "RUST_LOG"]
            .into_iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.trim().is_empty());
        Self { log_filter }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
