//! Road distances between locations.
//!
//! The [`DistanceProvider`] trait abstracts the external routing service.
//! [`DistanceCache`] memoises its answers symmetrically and substitutes a
//! geometric estimate when the service fails. [`DistanceMatrixBuilder`] fans
//! the upper triangle of a location set out over a bounded worker pool and
//! assembles an immutable [`DistanceMatrix`].
//!
//! Provider failures never abort a build: they surface only as
//! [`DistanceSource::Fallback`] cells.

mod builder;
mod cache;
mod error;
pub mod fallback;
mod matrix;
mod provider;

pub use builder::{
    BuildCancellation, BuildReport, DEFAULT_MAX_CONCURRENT_REQUESTS, DistanceMatrixBuilder,
    MatrixBuilderConfig,
};
pub use cache::DistanceCache;
pub use error::{MatrixBuildError, MatrixLookupError, MatrixShapeError, ProviderError};
pub use matrix::DistanceMatrix;
pub use provider::{DistanceProvider, DistanceSource, MeasuredDistance};
