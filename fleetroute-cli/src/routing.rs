//! Routing-provider options shared by every command that reaches GraphHopper.

use std::time::Duration;

use fleetroute_core::{DistanceProvider, MatrixBuilderConfig};
use fleetroute_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};

use crate::{ARG_MAX_CONCURRENT_REQUESTS, ARG_REQUEST_TIMEOUT_SECS, CliError};

/// Routing options as merged from every configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RoutingOverrides {
    pub(crate) graphhopper_url: Option<String>,
    pub(crate) max_concurrent_requests: Option<usize>,
    pub(crate) request_timeout_secs: Option<u64>,
}

/// Resolved routing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoutingSettings {
    /// GraphHopper base URL.
    pub(crate) graphhopper_url: String,
    /// Upper bound on concurrent distance lookups per matrix build.
    pub(crate) max_concurrent_requests: usize,
    /// Timeout for a single routing request.
    pub(crate) request_timeout: Duration,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        let provider = HttpDistanceProviderConfig::default();
        Self {
            graphhopper_url: provider.base_url,
            max_concurrent_requests: MatrixBuilderConfig::default().max_concurrent_requests(),
            request_timeout: provider.timeout,
        }
    }
}

impl TryFrom<RoutingOverrides> for RoutingSettings {
    type Error = CliError;

    fn try_from(overrides: RoutingOverrides) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let max_concurrent_requests = positive(
            overrides.max_concurrent_requests,
            ARG_MAX_CONCURRENT_REQUESTS,
        )?
        .unwrap_or(defaults.max_concurrent_requests);
        let request_timeout = positive(overrides.request_timeout_secs, ARG_REQUEST_TIMEOUT_SECS)?
            .map_or(defaults.request_timeout, Duration::from_secs);

        Ok(Self {
            graphhopper_url: overrides
                .graphhopper_url
                .unwrap_or(defaults.graphhopper_url),
            max_concurrent_requests,
            request_timeout,
        })
    }
}

impl RoutingSettings {
    /// Matrix builder configuration honouring the concurrency bound.
    pub(crate) const fn matrix_config(&self) -> MatrixBuilderConfig {
        MatrixBuilderConfig::new(self.max_concurrent_requests)
    }
}

/// Reject an explicit zero for options that must be at least 1.
pub(crate) fn positive<T>(value: Option<T>, field: &'static str) -> Result<Option<T>, CliError>
where
    T: Default + PartialEq,
{
    match value {
        Some(inner) if inner == T::default() => Err(CliError::ZeroOption { field }),
        other => Ok(other),
    }
}

/// Construct the GraphHopper provider described by `settings`.
pub(crate) fn http_provider(settings: &RoutingSettings) -> Result<HttpDistanceProvider, CliError> {
    let config = HttpDistanceProviderConfig::new(settings.graphhopper_url.clone())
        .with_timeout(settings.request_timeout);
    HttpDistanceProvider::with_config(config).map_err(|source| CliError::BuildDistanceProvider {
        base_url: settings.graphhopper_url.clone(),
        source,
    })
}

/// Builds the distance provider for the `matrix` and `polyline` commands.
pub(crate) trait ProviderBuilder {
    fn build(&self, settings: &RoutingSettings) -> Result<Box<dyn DistanceProvider>, CliError>;
}

/// Provider backed by a GraphHopper server.
pub(crate) struct HttpProviderBuilder;

impl ProviderBuilder for HttpProviderBuilder {
    fn build(&self, settings: &RoutingSettings) -> Result<Box<dyn DistanceProvider>, CliError> {
        Ok(Box::new(http_provider(settings)?))
    }
}
