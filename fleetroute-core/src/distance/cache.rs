//! Symmetric memo of provider distances.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use crate::Location;

use super::error::ProviderError;
use super::fallback::estimate_meters;
use super::provider::{DistanceProvider, DistanceSource, MeasuredDistance};

/// One endpoint of a cached pair: the id plus the exact coordinate bits.
type EndpointKey = (u64, u64, u64);

type Entries = HashMap<(EndpointKey, EndpointKey), u64>;

fn endpoint_key(location: &Location) -> EndpointKey {
    (
        location.id,
        location.latitude.to_bits(),
        location.longitude.to_bits(),
    )
}

fn pair_key(from: &Location, to: &Location) -> (EndpointKey, EndpointKey) {
    (endpoint_key(from), endpoint_key(to))
}

/// Distance cache wrapping a [`DistanceProvider`].
///
/// Every successful provider answer is stored under both `(a, b)` and
/// `(b, a)` in a single write so readers never observe half of a pair.
/// Entries are keyed by id and coordinate together: a location that reuses an
/// id at a different position misses the cache and is measured afresh.
/// Fallback estimates are returned but never stored, so a later request for
/// the same pair asks the provider again.
///
/// The cache is safe to share between threads; wrap it in an `Arc` to reuse
/// it across builders and solves.
///
/// # Examples
/// ```
/// use fleetroute_core::{DistanceCache, DistanceProvider, DistanceSource, Location, ProviderError};
///
/// struct Flat;
/// impl DistanceProvider for Flat {
///     fn distance(&self, _: &Location, _: &Location) -> Result<u64, ProviderError> {
///         Ok(1_500)
///     }
/// }
///
/// let cache = DistanceCache::new(Flat);
/// let a = Location::new(1, 0.0, 0.0);
/// let b = Location::new(2, 0.0, 1.0);
/// assert_eq!(cache.get(&a, &b).source, DistanceSource::Provider);
/// assert_eq!(cache.get(&b, &a).source, DistanceSource::Cached);
/// assert_eq!(cache.size(), 2);
/// ```
#[derive(Debug)]
pub struct DistanceCache<P> {
    provider: P,
    entries: RwLock<Entries>,
}

impl<P: DistanceProvider> DistanceCache<P> {
    /// Wrap `provider` with an empty cache.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Distance between two locations, consulting the cache first.
    ///
    /// Equal ids short-circuit to zero. A provider failure yields the
    /// geometric fallback, logged at `warn`.
    pub fn get(&self, from: &Location, to: &Location) -> MeasuredDistance {
        if from.id == to.id {
            return MeasuredDistance::new(0, DistanceSource::Identity);
        }
        if let Some(meters) = self.lookup(from, to) {
            return MeasuredDistance::new(meters, DistanceSource::Cached);
        }
        match self.provider.distance(from, to) {
            Ok(meters) => {
                self.insert(from, to, meters);
                MeasuredDistance::new(meters, DistanceSource::Provider)
            }
            Err(err) => Self::fallback(from, to, &err),
        }
    }

    /// Cached distance for a pair, if present.
    ///
    /// Both the ids and the coordinates must match a stored entry.
    #[must_use]
    pub fn lookup(&self, from: &Location, to: &Location) -> Option<u64> {
        if from.id == to.id {
            return Some(0);
        }
        self.read().get(&pair_key(from, to)).copied()
    }

    /// Store a distance for both orientations of a pair.
    ///
    /// Inserting a self-pair is ignored.
    pub fn insert(&self, from: &Location, to: &Location, meters: u64) {
        if from.id == to.id {
            return;
        }
        let mut entries = self.write();
        entries.insert(pair_key(from, to), meters);
        entries.insert(pair_key(to, from), meters);
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Number of stored entries; a symmetric pair counts as two.
    #[must_use]
    pub fn size(&self) -> usize {
        self.read().len()
    }

    /// The wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Encoded route polyline, delegated to the provider without caching.
    ///
    /// # Errors
    /// Propagates the provider's [`ProviderError`].
    pub fn route_polyline(&self, from: &Location, to: &Location) -> Result<String, ProviderError> {
        self.provider.route_polyline(from, to)
    }

    /// Fallback estimate for a pair whose measurement is being skipped.
    pub(crate) fn estimate(from: &Location, to: &Location) -> MeasuredDistance {
        if from.id == to.id {
            return MeasuredDistance::new(0, DistanceSource::Identity);
        }
        MeasuredDistance::new(estimate_meters(from, to), DistanceSource::Fallback)
    }

    fn fallback(from: &Location, to: &Location, err: &ProviderError) -> MeasuredDistance {
        let estimate = Self::estimate(from, to);
        warn!(
            "distance {} -> {} unavailable ({err}); using estimate of {} m",
            from.id, to.id, estimate.meters
        );
        estimate
    }

    // Both orientations of a pair are written under one guard, so a poisoned
    // map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        CountingProvider, FailingProvider, FixedDistanceProvider, GeometricProvider,
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn pair() -> (Location, Location) {
        (Location::new(1, 36.7682, 10.2753), Location::new(2, 36.8196, 10.3035))
    }

    #[rstest]
    fn provider_answers_are_cached_symmetrically(pair: (Location, Location)) {
        let (a, b) = pair;
        let cache = DistanceCache::new(CountingProvider::new(FixedDistanceProvider::new(700)));
        assert_eq!(cache.get(&a, &b), MeasuredDistance::new(700, DistanceSource::Provider));
        assert_eq!(cache.get(&b, &a), MeasuredDistance::new(700, DistanceSource::Cached));
        assert_eq!(cache.provider().calls(), 1);
        assert_eq!(cache.size(), 2);
    }

    #[rstest]
    fn identical_ids_skip_the_provider(pair: (Location, Location)) {
        let (a, _) = pair;
        let cache = DistanceCache::new(CountingProvider::new(FixedDistanceProvider::new(700)));
        assert_eq!(cache.get(&a, &a), MeasuredDistance::new(0, DistanceSource::Identity));
        assert_eq!(cache.provider().calls(), 0);
        assert_eq!(cache.size(), 0);
    }

    #[rstest]
    fn fallback_is_returned_but_not_cached(pair: (Location, Location)) {
        let (a, b) = pair;
        let cache = DistanceCache::new(CountingProvider::new(FailingProvider));
        let first = cache.get(&a, &b);
        assert!(first.is_fallback());
        assert_eq!(first.meters, estimate_meters(&a, &b));
        assert_eq!(cache.size(), 0);
        let second = cache.get(&a, &b);
        assert!(second.is_fallback());
        assert_eq!(cache.provider().calls(), 2);
    }

    #[rstest]
    fn insert_lookup_and_clear(pair: (Location, Location)) {
        let (a, b) = pair;
        let cache = DistanceCache::new(FailingProvider);
        cache.insert(&a, &b, 1_200);
        assert_eq!(cache.lookup(&b, &a), Some(1_200));
        assert_eq!(cache.lookup(&a, &a), Some(0));
        cache.insert(&b, &b, 9);
        assert_eq!(cache.size(), 2);
        cache.clear();
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.lookup(&a, &b), None);
    }

    #[rstest]
    fn reused_ids_at_new_coordinates_miss_the_cache(pair: (Location, Location)) {
        let (a, b) = pair;
        let moved = Location::new(b.id, 10.5, 10.5);
        let cache = DistanceCache::new(CountingProvider::new(GeometricProvider));
        let first = cache.get(&a, &b);
        let second = cache.get(&a, &moved);
        assert_eq!(first.source, DistanceSource::Provider);
        assert_eq!(second.source, DistanceSource::Provider);
        assert_ne!(first.meters, second.meters);
        assert_eq!(second.meters, estimate_meters(&a, &moved));
        assert_eq!(cache.lookup(&a, &moved), Some(second.meters));
        assert_eq!(cache.lookup(&moved, &a), Some(second.meters));
        assert_eq!(cache.lookup(&a, &b), Some(first.meters));
        assert_eq!(cache.provider().calls(), 2);
        assert_eq!(cache.size(), 4);
    }

    #[rstest]
    fn polyline_is_delegated(pair: (Location, Location)) {
        let (a, b) = pair;
        let cache = DistanceCache::new(FixedDistanceProvider::new(1));
        let err = cache.route_polyline(&a, &b).expect_err("fixed provider has no polyline");
        assert!(matches!(err, ProviderError::Unsupported { .. }));
    }
}
