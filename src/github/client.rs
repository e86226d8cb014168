// GitHub API HTTP client.
// Adds auth and API headers to every request, tracks rate limits, caches response bodies.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use reqwest::{
    Client, ClientBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::error::{AppError, Result};

use super::types::RateLimit;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Whether a request may be answered from the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    Use,
    /// Skip the lookup but still store the fresh response.
    Refresh,
}

/// GitHub API client with optional authentication, rate limit tracking and a shared cache.
///
/// Cloning is cheap; clones share the connection pool, cache and rate limit.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    authenticated: bool,
    cache: Arc<Mutex<ResponseCache<String>>>,
    rate_limit: Arc<Mutex<RateLimit>>,
}

impl GitHubClient {
    /// Create a new client. An empty token is treated as no token.
    pub fn new(
        token: Option<&str>,
        base_url: &str,
        cache: ResponseCache<String>,
    ) -> Result<Self> {
        Self::with_builder(Client::builder(), token, base_url, cache)
    }

    /// Like `new`, starting from a caller-configured `reqwest` builder.
    pub(crate) fn with_builder(
        builder: ClientBuilder,
        token: Option<&str>,
        base_url: &str,
        cache: ResponseCache<String>,
    ) -> Result<Self> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let headers = default_headers(token)?;

        let client = builder
            .default_headers(headers)
            .build()
            .map_err(AppError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authenticated: token.is_some(),
            cache: Arc::new(Mutex::new(cache)),
            rate_limit: Arc::new(Mutex::new(RateLimit::default())),
        })
    }

    /// Whether requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the most recent rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        lock(&self.rate_limit).clone()
    }

    /// Number of responses currently cached.
    pub fn cached_responses(&self) -> usize {
        lock(&self.cache).len()
    }

    /// Capacity and default TTL of the response cache; `None` means unbounded.
    pub fn cache_limits(&self) -> (Option<usize>, Option<Duration>) {
        let cache = lock(&self.cache);
        (cache.capacity(), cache.default_ttl())
    }

    /// Make a GET request and deserialize the JSON body.
    pub async fn get_json<T, P>(&self, endpoint: &str, params: &P, policy: CachePolicy) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let request = self
            .client
            .get(&url)
            .query(params)
            .build()
            .map_err(AppError::Api)?;
        let key = request.url().to_string();

        if policy == CachePolicy::Use {
            let cached = lock(&self.cache).get(&key);
            if let Some(body) = cached {
                debug!(url = %key, "cache hit");
                return Ok(serde_json::from_str(&body)?);
            }
        }

        debug!(url = %key, "cache miss, requesting");
        let response = self.client.execute(request).await.map_err(AppError::Api)?;
        self.update_rate_limit(&response);
        let response = self.check_response(response).await?;

        let body = response.text().await?;
        let value = serde_json::from_str(&body)?;
        lock(&self.cache).set(key, body, None);
        Ok(value)
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let mut rate_limit = lock(&self.rate_limit);
        apply_rate_limit_headers(response.headers(), &mut rate_limit);
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Only this response's headers decide whether the limit is exhausted.
        let mut rate_limit = RateLimit::default();
        apply_rate_limit_headers(response.headers(), &mut rate_limit);

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let error = status_error(status, &rate_limit, &url, body);
        warn!(%status, %url, "GitHub request failed");
        Err(error)
    }
}

fn default_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    if let Some(token) = token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AppError::Other(e.to_string()))?,
        );
    }
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static(GITHUB_API_VERSION),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static("octolook"));

    Ok(headers)
}

/// Read `x-ratelimit-*` headers into `rate_limit`, leaving absent fields untouched.
pub(crate) fn apply_rate_limit_headers(headers: &HeaderMap, rate_limit: &mut RateLimit) {
    let parse = |name: &str| -> Option<u64> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    };

    if let Some(limit) = parse("x-ratelimit-limit") {
        rate_limit.limit = limit;
    }
    if let Some(remaining) = parse("x-ratelimit-remaining") {
        rate_limit.remaining = remaining;
    }
    if let Some(reset) = parse("x-ratelimit-reset") {
        rate_limit.reset = reset;
    }
}

/// Map a non-success status to an error.
pub(crate) fn status_error(
    status: StatusCode,
    rate_limit: &RateLimit,
    url: &str,
    body: String,
) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized,
        StatusCode::NOT_FOUND => AppError::NotFound(url.to_string()),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
            if rate_limit.limit > 0 && rate_limit.remaining == 0 =>
        {
            let reset_at = chrono::DateTime::from_timestamp(rate_limit.reset as i64, 0)
                .map(|dt| dt.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            AppError::RateLimited { reset_at }
        }
        StatusCode::FORBIDDEN => AppError::Forbidden(body),
        status => AppError::Http {
            status: status.as_u16(),
            body,
        },
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves plain data behind, still usable.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
