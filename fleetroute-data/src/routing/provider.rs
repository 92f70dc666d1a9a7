//! HTTP-based `DistanceProvider` using GraphHopper's Routing API.
//!
//! This module provides [`HttpDistanceProvider`], an implementation of the
//! [`DistanceProvider`] trait that asks a GraphHopper instance for the driving
//! distance between two points.
//!
//! # Architecture
//!
//! The [`DistanceProvider`] trait is synchronous so the matrix builder can fan
//! requests out over plain worker threads. This provider bridges the async
//! HTTP calls to the sync interface by blocking on a Tokio runtime internally.
//! The runtime is multi-threaded, so several builder workers may block on it at
//! the same time.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use fleetroute_core::{DistanceProvider, Location};
//! use fleetroute_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
//!
//! let config = HttpDistanceProviderConfig::new("http://localhost:8989")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_profile("truck");
//! let provider = HttpDistanceProvider::with_config(config)?;
//!
//! let depot = Location::new(0, 36.7682, 10.2753);
//! let customer = Location::new(1, 36.8196, 10.3035);
//! let meters = provider.distance(&depot, &customer)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::future::Future;
use std::time::Duration;

use fleetroute_core::{DistanceProvider, Location, ProviderError};
use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::graphhopper::RouteResponse;

/// Error type for [`HttpDistanceProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default GraphHopper endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8989";

/// Default user agent for GraphHopper requests.
pub const DEFAULT_USER_AGENT: &str = "fleetroute/0.1";

/// Default GraphHopper vehicle profile.
pub const DEFAULT_PROFILE: &str = "car";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Worker threads in the provider's own runtime.
const RUNTIME_WORKER_THREADS: usize = 2;

/// Configuration for [`HttpDistanceProvider`].
#[derive(Debug, Clone)]
pub struct HttpDistanceProviderConfig {
    /// Base URL for the GraphHopper service (e.g., `"http://localhost:8989"`).
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// GraphHopper vehicle profile.
    pub profile: String,
    /// API key appended as the `key` query parameter, for hosted GraphHopper.
    pub api_key: Option<String>,
}

impl Default for HttpDistanceProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            api_key: None,
        }
    }
}

impl HttpDistanceProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the vehicle profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// HTTP-based distance provider using the GraphHopper `/route` endpoint.
///
/// Each [`distance`](DistanceProvider::distance) call issues one request with
/// point calculation disabled and reads the first path's length, truncated
/// to whole metres. Failures are reported as [`ProviderError`]; substituting
/// an estimate is left to the caller.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored multi-threaded runtime. When called from within an existing
/// multi-threaded Tokio runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// When called from within a `current_thread` Tokio runtime, the provider
/// falls back to its own internal runtime. This avoids the panic that
/// `block_in_place` would cause, but may deadlock if the caller's runtime is
/// driving IO that this request depends on.
pub struct HttpDistanceProvider {
    client: Client,
    config: HttpDistanceProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpDistanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDistanceProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpDistanceProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for the GraphHopper service (e.g., `"http://localhost:8989"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpDistanceProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpDistanceProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(RUNTIME_WORKER_THREADS)
            .thread_name("fleetroute-http")
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpDistanceProviderConfig {
        &self.config
    }

    /// Build the `/route` URL for a pair of locations.
    ///
    /// Points are `lat,lon`. Distance requests disable point calculation;
    /// polyline requests ask for encoded points instead. The API key is not
    /// part of the returned URL so it never reaches error messages or logs.
    fn route_url(
        &self,
        from: &Location,
        to: &Location,
        encoded_points: bool,
    ) -> Result<Url, ProviderError> {
        let endpoint = format!("{}/route", self.config.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&endpoint).map_err(|err| ProviderError::InvalidRequest {
            message: format!("invalid GraphHopper URL {endpoint}: {err}"),
        })?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("point", &format_point(from))
                .append_pair("point", &format_point(to))
                .append_pair("profile", &self.config.profile);
            if encoded_points {
                query.append_pair("points_encoded", "true");
            } else {
                query.append_pair("calc_points", "false");
            }
        }
        Ok(url)
    }

    /// Fetch and decode a route response asynchronously.
    async fn fetch_route(&self, url: Url) -> Result<RouteResponse, ProviderError> {
        let url_text = url.to_string();
        let mut request = self.client.get(url);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?;

        decode_body(&url_text, status, &body)
    }

    /// Convert a reqwest error to a `ProviderError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        ProviderError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Run `future` to completion on a suitable runtime.
    fn block_on<F: Future>(&self, future: F) -> F::Output {
        // block_in_place requires a multi-threaded runtime; for current_thread
        // runtimes we fall back to our own stored runtime.
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl DistanceProvider for HttpDistanceProvider {
    /// Driving distance in whole metres between `from` and `to`.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`); see the type-level docs.
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        let url = self.route_url(from, to, false)?;
        let response = self.block_on(self.fetch_route(url))?;
        let meters = convert_distance(&response)?;
        debug!("GraphHopper distance {} -> {}: {meters} m", from.id, to.id);
        Ok(meters)
    }

    /// Encoded polyline of the best path between `from` and `to`.
    fn route_polyline(&self, from: &Location, to: &Location) -> Result<String, ProviderError> {
        let url = self.route_url(from, to, true)?;
        let response = self.block_on(self.fetch_route(url))?;
        convert_polyline(&response)
    }
}

/// GraphHopper `point` parameter value.
fn format_point(location: &Location) -> String {
    format!("{},{}", location.latitude, location.longitude)
}

/// Decode a response body, mapping non-success statuses to
/// [`ProviderError::Http`] with the service's message when it sent one.
fn decode_body(url: &str, status: StatusCode, body: &str) -> Result<RouteResponse, ProviderError> {
    let parsed = serde_json::from_str::<RouteResponse>(body);
    if status.is_success() {
        return parsed.map_err(|err| ProviderError::Parse {
            message: err.to_string(),
        });
    }
    let message = parsed
        .ok()
        .and_then(|response| response.message)
        .unwrap_or_else(|| status.to_string());
    Err(ProviderError::Http {
        url: url.to_owned(),
        status: status.as_u16(),
        message,
    })
}

/// Length of the best path in whole metres.
fn convert_distance(response: &RouteResponse) -> Result<u64, ProviderError> {
    let path = response
        .best_path()
        .ok_or_else(|| ProviderError::NoRoute {
            message: response.failure_message(),
        })?;
    whole_meters(path.distance)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is finite and non-negative; fractional metres are dropped"
)]
fn whole_meters(distance: f64) -> Result<u64, ProviderError> {
    if distance.is_finite() && distance >= 0.0 {
        Ok(distance.trunc() as u64)
    } else {
        Err(ProviderError::InvalidDistance {
            message: format!("path distance {distance}"),
        })
    }
}

/// Encoded points of the best path.
fn convert_polyline(response: &RouteResponse) -> Result<String, ProviderError> {
    let path = response
        .best_path()
        .ok_or_else(|| ProviderError::NoRoute {
            message: response.failure_message(),
        })?;
    path.points.clone().ok_or_else(|| ProviderError::Parse {
        message: "GraphHopper path carries no encoded points".to_owned(),
    })
}
