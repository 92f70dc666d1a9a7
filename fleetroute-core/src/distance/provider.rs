//! Distance provider trait and the measured-distance value it feeds.

use crate::Location;

use super::error::ProviderError;

/// Fetch the road distance between two locations.
///
/// Implementations are called concurrently from the matrix builder's worker
/// threads, so they must be `Send + Sync`. A call may block; it must not
/// panic on service failure but return a [`ProviderError`] instead.
///
/// # Examples
///
/// ```rust
/// use fleetroute_core::{DistanceProvider, Location, ProviderError};
///
/// struct Manhattan;
///
/// impl DistanceProvider for Manhattan {
///     fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
///         Ok(from.id.abs_diff(to.id) * 1_000)
///     }
/// }
///
/// let a = Location::new(1, 0.0, 0.0);
/// let b = Location::new(4, 0.0, 1.0);
/// assert_eq!(Manhattan.distance(&a, &b)?, 3_000);
/// # Ok::<(), ProviderError>(())
/// ```
pub trait DistanceProvider: Send + Sync {
    /// Road distance from `from` to `to` in whole metres.
    ///
    /// # Errors
    /// Returns a [`ProviderError`] when the distance cannot be obtained.
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError>;

    /// Encoded polyline of the route from `from` to `to`.
    ///
    /// Used for visualisation only. The default implementation reports the
    /// operation as unsupported.
    ///
    /// # Errors
    /// Returns [`ProviderError::Unsupported`] unless overridden.
    fn route_polyline(&self, from: &Location, to: &Location) -> Result<String, ProviderError> {
        let _ = (from, to);
        Err(ProviderError::Unsupported {
            operation: "route_polyline",
        })
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for &P {
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        (**self).distance(from, to)
    }

    fn route_polyline(&self, from: &Location, to: &Location) -> Result<String, ProviderError> {
        (**self).route_polyline(from, to)
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for Box<P> {
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        (**self).distance(from, to)
    }

    fn route_polyline(&self, from: &Location, to: &Location) -> Result<String, ProviderError> {
        (**self).route_polyline(from, to)
    }
}

/// Where a distance value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceSource {
    /// Same location on both ends; no lookup performed.
    Identity,
    /// Served from the cache.
    Cached,
    /// Returned by the provider in this call.
    Provider,
    /// Geometric estimate substituted after a provider failure.
    Fallback,
}

/// A distance together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasuredDistance {
    /// Distance in whole metres.
    pub meters: u64,
    /// How the value was obtained.
    pub source: DistanceSource,
}

impl MeasuredDistance {
    /// Pair a value with its source.
    #[must_use]
    pub const fn new(meters: u64, source: DistanceSource) -> Self {
        Self { meters, source }
    }

    /// Whether the value is a fallback estimate.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, DistanceSource::Fallback)
    }
}
