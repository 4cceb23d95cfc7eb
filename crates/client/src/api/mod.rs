//! HTTP client with cache-backed reads.
//!
//! One [`ApiClient`] serves the whole app. It is cheap to clone (the inner
//! state sits behind an `Arc`) and resolves session state from the shared
//! [`LayeredStore`] on every request: the couple code scopes the request via
//! the `X-Couple-Code` header, and the bearer token from the last login is
//! attached when present.
//!
//! # Caching and offline behavior
//!
//! The body of every successful GET is written to the preference store under
//! `cache_<path?query>` before deserialization. When a later GET of the same
//! endpoint fails at the network layer (unreachable backend or timed-out
//! request), the cached body is served instead and the result is marked
//! [`Source::Cache`]. Errors the backend itself produced (4xx/5xx) are never
//! masked by cache; writes are never cached and never replayed.
//!
//! # Retries
//!
//! Reads retry transient failures (offline, timeout, 5xx) a bounded number
//! of times with jittered exponential backoff before the cache fallback
//! kicks in. Writes get exactly one attempt.

mod account;
mod activities;
mod badges;
mod blog;
mod calendar;
mod challenges;
mod couple;
mod goals;
mod library;
mod photos;

pub use couple::CoupleLink;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use tandem_core::CoupleCode;

use crate::config::ClientConfig;
use crate::store::{LayeredStore, StoreError, keys};

/// Header carrying the couple code on scoped requests.
pub const COUPLE_CODE_HEADER: &str = "X-Couple-Code";

/// Errors from backend interactions.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No couple code is set. Scoped calls refuse to touch the network.
    #[error("not paired: generate or join a couple code first")]
    NotPaired,
    /// No connection could be established.
    #[error("backend unreachable: {0}")]
    Offline(#[source] reqwest::Error),
    /// The request went out but the deadline passed.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Human-readable message, from the body's `detail` field when present.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("could not parse response: {0}")]
    Parse(#[from] serde_json::Error),
    /// The endpoint path did not resolve against the base URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    /// The preference store failed while resolving session state.
    #[error("preference store failed: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// True when the backend could not be reached at all, which is when a
    /// cached payload may stand in for the response.
    #[must_use]
    pub const fn is_network_unavailable(&self) -> bool {
        matches!(self, Self::Offline(_) | Self::Timeout(_))
    }

    /// True when an immediate retry has a chance of succeeding.
    const fn is_transient(&self) -> bool {
        match self {
            Self::Offline(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Where a successful read's payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Fresh from the backend.
    Live,
    /// Served from the local cache after a network failure.
    Cache,
}

/// A successfully fetched value plus its provenance, so callers can surface
/// staleness ("showing saved data") instead of an error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Fetched<T> {
    pub(crate) const fn live(value: T) -> Self {
        Self {
            value,
            source: Source::Live,
        }
    }

    pub(crate) const fn cached(value: T) -> Self {
        Self {
            value,
            source: Source::Cache,
        }
    }

    /// True when the payload came from the local cache.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        matches!(self.source, Source::Cache)
    }

    /// The payload, discarding provenance.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Backend client shared across the app.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    store: LayeredStore,
    token_override: Option<SecretString>,
    request_timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from `config`, persisting session and cache state in
    /// `store`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying HTTP client could not
    /// be constructed.
    pub fn new(config: &ClientConfig, store: LayeredStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                store,
                token_override: config.token.clone(),
                request_timeout: config.request_timeout,
                max_retries: config.max_retries,
                retry_backoff: config.retry_backoff,
            }),
        })
    }

    /// The store this client persists session and cache state in.
    #[must_use]
    pub fn store(&self) -> &LayeredStore {
        &self.inner.store
    }

    // ------------------------------------------------------------------
    // Request assembly
    // ------------------------------------------------------------------

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// The couple code every scoped request is stamped with.
    async fn stored_code(&self) -> Result<CoupleCode, ApiError> {
        let raw = self
            .inner
            .store
            .read(keys::COUPLE_CODE)
            .await?
            .ok_or(ApiError::NotPaired)?;
        CoupleCode::parse(&raw).map_err(|_| ApiError::NotPaired)
    }

    async fn bearer_token(&self) -> Result<Option<String>, ApiError> {
        if let Some(token) = self.inner.store.read(keys::TOKEN).await? {
            return Ok(Some(token));
        }
        Ok(self
            .inner
            .token_override
            .as_ref()
            .map(|token| token.expose_secret().to_owned()))
    }

    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(match self.bearer_token().await? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// A request scoped to the active couple. Fails with `NotPaired` before
    /// any network traffic when no code is set.
    async fn scoped(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let code = self.stored_code().await?;
        let builder = self
            .inner
            .http
            .request(method, self.endpoint(path)?)
            .header(COUPLE_CODE_HEADER, code.as_str());
        self.authorized(builder).await
    }

    /// A request that carries credentials when available but no couple scope.
    async fn unscoped(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.inner.http.request(method, self.endpoint(path)?);
        self.authorized(builder).await
    }

    fn finalize(&self, builder: RequestBuilder) -> Result<reqwest::Request, ApiError> {
        builder
            .build()
            .map_err(|e| classify(e, self.inner.request_timeout))
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Execute one request, mapping transport failures and non-success
    /// statuses into [`ApiError`]. Returns the raw body on success.
    async fn dispatch(&self, request: reqwest::Request) -> Result<String, ApiError> {
        let response = self
            .inner
            .http
            .execute(request)
            .await
            .map_err(|e| classify(e, self.inner.request_timeout))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify(e, self.inner.request_timeout))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                message: error_detail(&body),
            })
        }
    }

    /// Dispatch with the read retry policy: up to `max_retries` extra
    /// attempts on transient failures, then one final attempt whose error
    /// surfaces.
    async fn dispatch_with_retry(&self, request: reqwest::Request) -> Result<String, ApiError> {
        for attempt in 0..self.inner.max_retries {
            // Cloning fails only for streaming bodies, which never take
            // this path.
            let Some(this_attempt) = request.try_clone() else {
                break;
            };
            match self.dispatch(this_attempt).await {
                Err(error) if error.is_transient() => {
                    let delay = self.retry_delay(attempt);
                    debug!(attempt, ?delay, %error, "retrying read after transient failure");
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
        }
        self.dispatch(request).await
    }

    /// Exponential backoff with jitter: attempt `n` sleeps between half and
    /// all of `base * 2^n`.
    fn retry_delay(&self, attempt: u32) -> Duration {
        let ceiling = self
            .inner
            .retry_backoff
            .saturating_mul(2_u32.saturating_pow(attempt));
        ceiling.mul_f64(0.5 + rand::random::<f64>() * 0.5)
    }

    // ------------------------------------------------------------------
    // Verb helpers used by the resource modules
    // ------------------------------------------------------------------

    /// GET with the cache fallback, scoped to the active couple.
    pub(crate) async fn get_scoped<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Fetched<T>, ApiError> {
        let builder = self.scoped(Method::GET, path).await?;
        self.fetch_cached(builder).await
    }

    /// GET with a query string and the cache fallback, scoped to the active
    /// couple. The rendered query becomes part of the cache key.
    pub(crate) async fn get_scoped_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Fetched<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.scoped(Method::GET, path).await?.query(query);
        self.fetch_cached(builder).await
    }

    /// GET with the cache fallback but no couple scope.
    pub(crate) async fn get_unscoped<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Fetched<T>, ApiError> {
        let builder = self.unscoped(Method::GET, path).await?;
        self.fetch_cached(builder).await
    }

    async fn fetch_cached<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Fetched<T>, ApiError> {
        let request = self.finalize(builder)?;
        let cache_key = keys::cache(&cache_suffix(request.url()));

        match self.dispatch_with_retry(request).await {
            Ok(body) => {
                if let Err(error) = self.inner.store.write(&cache_key, &body).await {
                    warn!(key = %cache_key, %error, "failed to cache response body");
                }
                Ok(Fetched::live(serde_json::from_str(&body)?))
            }
            Err(error) if error.is_network_unavailable() => {
                match self.inner.store.read(&cache_key).await {
                    Ok(Some(body)) => {
                        debug!(key = %cache_key, %error, "serving cached body after network failure");
                        match serde_json::from_str(&body) {
                            Ok(value) => Ok(Fetched::cached(value)),
                            Err(parse_error) => {
                                warn!(
                                    key = %cache_key,
                                    %parse_error,
                                    "cached body is unusable; surfacing the network failure"
                                );
                                Err(error)
                            }
                        }
                    }
                    Ok(None) => Err(error),
                    Err(store_error) => {
                        warn!(key = %cache_key, %store_error, "cache lookup failed");
                        Err(error)
                    }
                }
            }
            Err(error) => Err(error),
        }
    }

    /// POST a JSON body, scoped. One attempt, no cache.
    pub(crate) async fn post_scoped<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.scoped(Method::POST, path).await?.json(body);
        self.send_parsed(builder).await
    }

    /// POST with an empty body, scoped. One attempt, no cache.
    pub(crate) async fn post_scoped_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let builder = self.scoped(Method::POST, path).await?;
        self.send_parsed(builder).await
    }

    /// PATCH a JSON body, scoped. One attempt, no cache.
    pub(crate) async fn patch_scoped<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.scoped(Method::PATCH, path).await?.json(body);
        self.send_parsed(builder).await
    }

    /// PUT a JSON body, scoped. One attempt, no cache.
    pub(crate) async fn put_scoped<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.scoped(Method::PUT, path).await?.json(body);
        self.send_parsed(builder).await
    }

    /// DELETE, scoped. The response body is discarded.
    pub(crate) async fn delete_scoped(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.scoped(Method::DELETE, path).await?;
        let request = self.finalize(builder)?;
        self.dispatch(request).await?;
        Ok(())
    }

    /// POST a JSON body without couple scope. Used by account endpoints
    /// that exist before pairing.
    pub(crate) async fn post_unscoped<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.unscoped(Method::POST, path).await?.json(body);
        self.send_parsed(builder).await
    }

    /// PUT a JSON body without couple scope.
    pub(crate) async fn put_unscoped<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.unscoped(Method::PUT, path).await?.json(body);
        self.send_parsed(builder).await
    }

    /// Finalize, dispatch once, and deserialize the body.
    pub(crate) async fn send_parsed<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = self.finalize(builder)?;
        let body = self.dispatch(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Map a reqwest error onto the offline/timeout/transport split.
fn classify(error: reqwest::Error, timeout: Duration) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(timeout)
    } else if error.is_connect() {
        ApiError::Offline(error)
    } else {
        ApiError::Transport(error)
    }
}

/// Cache key suffix for a request URL: the path plus any query, so the same
/// endpoint with different filters caches separately.
fn cache_suffix(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    }
}

/// Pull the human-readable message out of an error body.
///
/// The backend wraps errors as `{"detail": ...}`; anything else is used
/// verbatim, truncated so a stray HTML error page cannot flood a log line.
fn error_detail(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct Detail {
        detail: serde_json::Value,
    }

    if let Ok(Detail { detail }) = serde_json::from_str::<Detail>(body) {
        return match detail {
            serde_json::Value::String(message) => message,
            // Validation failures arrive as structured arrays.
            other => other.to_string(),
        };
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail provided".to_owned()
    } else {
        trimmed.chars().take(200).collect()
    }
}
