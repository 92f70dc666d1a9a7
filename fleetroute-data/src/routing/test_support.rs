//! Test utilities for routing providers.
//!
//! This module provides [`StubDistanceProvider`], a deterministic test double
//! for [`DistanceProvider`] that returns pre-configured responses without
//! making actual HTTP requests.

use fleetroute_core::{DistanceProvider, Location, ProviderError};

/// Stub `DistanceProvider` for testing.
///
/// This provider returns pre-configured responses, allowing tests to verify
/// behaviour without requiring a running GraphHopper service.
///
/// # Example
///
/// ```
/// use fleetroute_core::{DistanceProvider, Location};
/// use fleetroute_data::routing::test_support::StubDistanceProvider;
///
/// let provider = StubDistanceProvider::with_distance(1_500);
/// let a = Location::new(1, 0.0, 0.0);
/// let b = Location::new(2, 1.0, 1.0);
///
/// assert_eq!(provider.distance(&a, &b), Ok(1_500));
/// assert_eq!(provider.distance(&a, &a), Ok(0));
/// ```
#[derive(Debug, Clone)]
pub struct StubDistanceProvider {
    response: StubResponse,
    polyline: Option<String>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Distance(u64),
    Error(ProviderError),
}

impl StubDistanceProvider {
    /// Create a provider that returns `meters` for every distinct pair.
    ///
    /// Requests between a location and itself answer zero.
    #[must_use]
    pub const fn with_distance(meters: u64) -> Self {
        Self {
            response: StubResponse::Distance(meters),
            polyline: None,
        }
    }

    /// Create a provider that returns the given error for every pair.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self {
            response: StubResponse::Error(error),
            polyline: None,
        }
    }

    /// Answer polyline requests with `polyline`.
    #[must_use]
    pub fn with_polyline(mut self, polyline: impl Into<String>) -> Self {
        self.polyline = Some(polyline.into());
        self
    }
}

impl DistanceProvider for StubDistanceProvider {
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        match &self.response {
            StubResponse::Error(error) => Err(error.clone()),
            StubResponse::Distance(_) if from.id == to.id => Ok(0),
            StubResponse::Distance(meters) => Ok(*meters),
        }
    }

    fn route_polyline(&self, from: &Location, to: &Location) -> Result<String, ProviderError> {
        self.distance(from, to)?;
        self.polyline.clone().ok_or(ProviderError::Unsupported {
            operation: "route_polyline",
        })
    }
}
