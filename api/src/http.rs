//! Conditional-GET JSON client with an in-memory HTTP cache.
//!
//! Each URL keeps its last body together with the validators the origin sent
//! (`ETag`, `Last-Modified`) and the freshness window from `Cache-Control`.
//! Callers get the body back with a `from_cache` flag: `true` means the bytes
//! are exactly what was seen before, so anything derived from them is still
//! valid.

use crate::{ApiConfig, ApiError, ApiResult, TransportError};
use log::{debug, info};
use reqwest::header::{
    CACHE_CONTROL, ETAG, HeaderMap, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
    USER_AGENT,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// A response body and whether it was already known.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub url: String,
    pub body: Arc<[u8]>,
    pub from_cache: bool,
}

impl Fetched {
    /// Decode the body into one of the wire schemas.
    pub fn decode<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::malformed(self.url.as_str(), e.to_string()))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: Arc<[u8]>,
    etag: Option<HeaderValue>,
    last_modified: Option<HeaderValue>,
    fresh_until: Option<Instant>,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.fresh_until.is_some_and(|deadline| now < deadline)
    }

    fn refresh_validators(&mut self, headers: &HeaderMap) {
        if let Some(etag) = headers.get(ETAG) {
            self.etag = Some(etag.clone());
        }
        if let Some(last_modified) = headers.get(LAST_MODIFIED) {
            self.last_modified = Some(last_modified.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CachePolicy {
    no_store: bool,
    no_cache: bool,
    max_age: Option<Duration>,
}

impl CachePolicy {
    fn from_headers(headers: &HeaderMap) -> Self {
        let mut policy = Self::default();
        for value in headers.get_all(CACHE_CONTROL) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for directive in value.split(',') {
                let directive = directive.trim().to_ascii_lowercase();
                if directive == "no-store" {
                    policy.no_store = true;
                } else if directive == "no-cache" {
                    policy.no_cache = true;
                } else if let Some(secs) = directive.strip_prefix("max-age=") {
                    policy.max_age = secs.trim_matches('"').parse().ok().map(Duration::from_secs);
                }
            }
        }
        policy
    }

    fn fresh_until(&self, now: Instant) -> Option<Instant> {
        if self.no_cache {
            return None;
        }
        self.max_age.map(|age| now + age)
    }
}

#[derive(Debug, Clone)]
pub struct HttpCache {
    client: Client,
    user_agent: String,
    timeout: Option<Duration>,
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl HttpCache {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.as_str())
                .build()
                .unwrap_or_default(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            entries: Arc::default(),
        }
    }

    /// GET and decode in one step, discarding the freshness flag.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        self.get(url).await?.decode()
    }

    /// GET `url`, revalidating any stored copy. Never retries.
    pub async fn get(&self, url: &str) -> ApiResult<Fetched> {
        let cached = self.lookup(url);

        if let Some(entry) = &cached
            && entry.is_fresh(Instant::now())
        {
            debug!("serving fresh cached copy of {url}");
            return Ok(Fetched { url: url.to_owned(), body: entry.body.clone(), from_cache: true });
        }

        let mut request = self.client.get(url).header(USER_AGENT, self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(entry) = &cached {
            if let Some(etag) = &entry.etag {
                request = request.header(IF_NONE_MATCH, etag.clone());
            }
            if let Some(last_modified) = &entry.last_modified {
                request = request.header(IF_MODIFIED_SINCE, last_modified.clone());
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(e, url))?;
        let status = response.status();
        let policy = CachePolicy::from_headers(response.headers());

        if status == StatusCode::NOT_MODIFIED {
            let Some(mut entry) = cached else {
                return Err(ApiError::malformed(url, "304 Not Modified without a cached copy"));
            };
            debug!("revalidated {url}");
            entry.refresh_validators(response.headers());
            entry.fresh_until = policy.fresh_until(Instant::now());
            let body = entry.body.clone();
            self.store(url, entry);
            return Ok(Fetched { url: url.to_owned(), body, from_cache: true });
        }

        if !status.is_success() {
            return Err(ApiError::transport(TransportError::Status(status), url));
        }

        let headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(e, url))?;
        let body: Arc<[u8]> = Arc::from(&bytes[..]);

        let from_cache = cached.as_ref().is_some_and(|entry| *entry.body == *body);
        if from_cache {
            debug!("origin re-sent an identical body for {url}");
        } else {
            info!("origin fetch {url} ({status})");
        }

        if policy.no_store {
            self.remove(url);
        } else {
            let mut entry = CacheEntry {
                body: body.clone(),
                etag: None,
                last_modified: None,
                fresh_until: policy.fresh_until(Instant::now()),
            };
            entry.refresh_validators(&headers);
            self.store(url, entry);
        }

        Ok(Fetched { url: url.to_owned(), body, from_cache })
    }

    /// Forget every stored response.
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn lookup(&self, url: &str) -> Option<CacheEntry> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).get(url).cloned()
    }

    fn store(&self, url: &str, entry: CacheEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_owned(), entry);
    }

    fn remove(&self, url: &str) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).remove(url);
    }
}
