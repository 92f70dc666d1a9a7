//! Concurrent construction of a [`DistanceMatrix`] from a location set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::Location;

use super::cache::DistanceCache;
use super::error::MatrixBuildError;
use super::matrix::{DistanceMatrix, index_ids};
use super::provider::{DistanceProvider, DistanceSource, MeasuredDistance};

/// Completed pairs between two progress log lines.
const PROGRESS_INTERVAL: usize = 50;

/// Default bound on simultaneous provider calls.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

/// Tuning for [`DistanceMatrixBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixBuilderConfig {
    max_concurrent_requests: usize,
}

impl MatrixBuilderConfig {
    /// Configuration with the given concurrency bound, raised to at least 1.
    #[must_use]
    pub const fn new(max_concurrent_requests: usize) -> Self {
        let bound = if max_concurrent_requests == 0 {
            1
        } else {
            max_concurrent_requests
        };
        Self {
            max_concurrent_requests: bound,
        }
    }

    /// Replace the concurrency bound.
    #[must_use]
    pub const fn with_max_concurrent_requests(self, max_concurrent_requests: usize) -> Self {
        Self::new(max_concurrent_requests)
    }

    /// Maximum number of provider calls in flight during a build.
    #[must_use]
    pub const fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }
}

impl Default for MatrixBuilderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_REQUESTS)
    }
}

/// Cooperative cancellation for an in-flight build.
///
/// Clones share the same flag. Once cancelled, pairs not yet measured are
/// answered from the cache or the geometric estimate without calling the
/// provider, so the build still returns a complete matrix.
#[derive(Debug, Clone, Default)]
pub struct BuildCancellation {
    cancelled: Arc<AtomicBool>,
}

impl BuildCancellation {
    /// A token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Provenance counts for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildReport {
    /// Number of locations in the matrix.
    pub locations: usize,
    /// Off-diagonal pairs measured (upper triangle).
    pub pairs: usize,
    /// Pairs answered by the provider during this build.
    pub provider: usize,
    /// Pairs served from the cache.
    pub cached: usize,
    /// Pairs filled with the geometric estimate.
    pub fallback: usize,
    /// Wall-clock time spent measuring.
    pub elapsed: Duration,
}

impl BuildReport {
    fn record(&mut self, measured: MeasuredDistance) {
        match measured.source {
            DistanceSource::Provider => self.provider += 1,
            DistanceSource::Cached => self.cached += 1,
            DistanceSource::Fallback => self.fallback += 1,
            DistanceSource::Identity => {}
        }
    }
}

/// Builds complete symmetric distance matrices through a shared cache.
///
/// Only the upper triangle is measured; each value is mirrored into both
/// cells and the diagonal is zero. Measurements run on a dedicated `rayon`
/// pool sized by [`MatrixBuilderConfig::max_concurrent_requests`] and are
/// assembled after every task has returned, so the matrix does not depend on
/// completion order.
///
/// # Examples
/// ```
/// use fleetroute_core::{DistanceMatrixBuilder, Location};
/// use fleetroute_core::test_support::FixedDistanceProvider;
///
/// let builder = DistanceMatrixBuilder::new(FixedDistanceProvider::new(250));
/// let locations = [Location::new(0, 0.0, 0.0), Location::new(1, 0.0, 1.0)];
/// let matrix = builder.build(&locations)?;
/// assert_eq!(matrix.distance(0, 1)?, 250);
/// assert_eq!(matrix.distance(1, 1)?, 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct DistanceMatrixBuilder<P> {
    cache: Arc<DistanceCache<P>>,
    config: MatrixBuilderConfig,
}

impl<P: DistanceProvider> DistanceMatrixBuilder<P> {
    /// Builder with a fresh cache and the default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, MatrixBuilderConfig::default())
    }

    /// Builder with a fresh cache and explicit configuration.
    pub fn with_config(provider: P, config: MatrixBuilderConfig) -> Self {
        Self::with_cache(Arc::new(DistanceCache::new(provider)), config)
    }

    /// Builder sharing an existing cache.
    #[must_use]
    pub const fn with_cache(cache: Arc<DistanceCache<P>>, config: MatrixBuilderConfig) -> Self {
        Self { cache, config }
    }

    /// The cache every measurement goes through.
    #[must_use]
    pub const fn cache(&self) -> &Arc<DistanceCache<P>> {
        &self.cache
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> MatrixBuilderConfig {
        self.config
    }

    /// Build the matrix for `locations`.
    ///
    /// # Errors
    /// Returns [`MatrixBuildError::EmptyInput`] or
    /// [`MatrixBuildError::DuplicateLocation`] before any provider call, and
    /// [`MatrixBuildError::WorkerPool`] if the worker pool cannot be created.
    /// Provider failures are never returned; they become fallback cells.
    pub fn build(&self, locations: &[Location]) -> Result<DistanceMatrix, MatrixBuildError> {
        self.run(locations, None).map(|(matrix, _)| matrix)
    }

    /// Build the matrix and report where each value came from.
    ///
    /// # Errors
    /// As [`DistanceMatrixBuilder::build`].
    pub fn build_with_report(
        &self,
        locations: &[Location],
    ) -> Result<(DistanceMatrix, BuildReport), MatrixBuildError> {
        self.run(locations, None)
    }

    /// Build the matrix, stopping provider calls once `cancellation` fires.
    ///
    /// # Errors
    /// As [`DistanceMatrixBuilder::build`].
    pub fn build_cancellable(
        &self,
        locations: &[Location],
        cancellation: &BuildCancellation,
    ) -> Result<(DistanceMatrix, BuildReport), MatrixBuildError> {
        self.run(locations, Some(cancellation))
    }

    fn run(
        &self,
        locations: &[Location],
        cancellation: Option<&BuildCancellation>,
    ) -> Result<(DistanceMatrix, BuildReport), MatrixBuildError> {
        if locations.is_empty() {
            return Err(MatrixBuildError::EmptyInput);
        }
        let ids: Vec<u64> = locations.iter().map(|l| l.id).collect();
        let index = index_ids(&ids).map_err(|id| MatrixBuildError::DuplicateLocation { id })?;
        let n = ids.len();

        let pairs: Vec<(usize, usize, &Location, &Location)> = locations
            .iter()
            .enumerate()
            .flat_map(|(i, from)| {
                locations
                    .iter()
                    .enumerate()
                    .skip(i + 1)
                    .map(move |(j, to)| (i, j, from, to))
            })
            .collect();

        let started = Instant::now();
        let measured = self.measure_all(&pairs, cancellation)?;

        let mut cells = vec![0_u64; n * n];
        let mut report = BuildReport {
            locations: n,
            pairs: pairs.len(),
            ..BuildReport::default()
        };
        for (&(i, j, _, _), value) in pairs.iter().zip(&measured) {
            report.record(*value);
            for cell in [i * n + j, j * n + i] {
                if let Some(slot) = cells.get_mut(cell) {
                    *slot = value.meters;
                }
            }
        }
        report.elapsed = started.elapsed();

        info!(
            "built {n}x{n} distance matrix: {} pairs ({} provider, {} cached, {} fallback) in {:?}",
            report.pairs, report.provider, report.cached, report.fallback, report.elapsed
        );
        Ok((DistanceMatrix::from_parts(ids, index, cells), report))
    }

    fn measure_all(
        &self,
        pairs: &[(usize, usize, &Location, &Location)],
        cancellation: Option<&BuildCancellation>,
    ) -> Result<Vec<MeasuredDistance>, MatrixBuildError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.max_concurrent_requests)
            .thread_name(|i| format!("fleetroute-distance-{i}"))
            .build()
            .map_err(|source| MatrixBuildError::WorkerPool { source })?;

        let total = pairs.len();
        let completed = AtomicUsize::new(0);
        let measured = pool.install(|| {
            pairs
                .par_iter()
                .map(|&(_, _, from, to)| {
                    let value = self.measure(from, to, cancellation);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if done.is_multiple_of(PROGRESS_INTERVAL) {
                        debug!("distance matrix progress: {done}/{total} pairs");
                    }
                    value
                })
                .collect()
        });
        Ok(measured)
    }

    fn measure(
        &self,
        from: &Location,
        to: &Location,
        cancellation: Option<&BuildCancellation>,
    ) -> MeasuredDistance {
        if cancellation.is_some_and(BuildCancellation::is_cancelled) {
            return self.cache.lookup(from, to).map_or_else(
                || DistanceCache::<P>::estimate(from, to),
                |meters| MeasuredDistance::new(meters, DistanceSource::Cached),
            );
        }
        self.cache.get(from, to)
    }
}
