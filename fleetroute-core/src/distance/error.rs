use thiserror::Error;

/// Errors from a single [`DistanceProvider`](super::DistanceProvider) call.
///
/// These are recovered locally by the geometric fallback and never reach the
/// planner's caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Error description.
        message: String,
    },
    /// The service found no route between the two points.
    #[error("no route found: {message}")]
    NoRoute {
        /// Message reported by the service.
        message: String,
    },
    /// The service reported a negative or non-finite distance.
    #[error("routing service returned an unusable distance: {message}")]
    InvalidDistance {
        /// Description of the offending value.
        message: String,
    },
    /// The request could not be constructed.
    #[error("invalid routing request: {message}")]
    InvalidRequest {
        /// Error description.
        message: String,
    },
    /// The provider does not implement the requested operation.
    #[error("{operation} is not supported by this provider")]
    Unsupported {
        /// Name of the operation.
        operation: &'static str,
    },
}

/// Errors from [`DistanceMatrixBuilder::build`](super::DistanceMatrixBuilder::build).
///
/// Only precondition violations and worker-pool failures are fatal; provider
/// errors are absorbed by the fallback.
#[derive(Debug, Error)]
pub enum MatrixBuildError {
    /// No locations were supplied.
    #[error("at least one location is required to build a distance matrix")]
    EmptyInput,
    /// A location id appears more than once.
    #[error("location id {id} appears more than once")]
    DuplicateLocation {
        /// Repeated identifier.
        id: u64,
    },
    /// The bounded worker pool could not be created.
    #[error("failed to create distance worker pool")]
    WorkerPool {
        /// Source error from `rayon`.
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

/// A matrix lookup referenced a location the matrix does not cover.
///
/// A matrix built from a problem instance covers every location in it, so this
/// indicates an inconsistency between instance and matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixLookupError {
    /// The location id has no row/column.
    #[error("location {id} is not present in the distance matrix")]
    UnknownLocation {
        /// Missing identifier.
        id: u64,
    },
}

/// Errors from [`DistanceMatrix::from_rows`](super::DistanceMatrix::from_rows).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixShapeError {
    /// A location id appears more than once.
    #[error("location id {id} appears more than once")]
    DuplicateLocation {
        /// Repeated identifier.
        id: u64,
    },
    /// The row count or a row length differs from the number of locations.
    #[error("expected a {expected}x{expected} matrix, found a row of length {found}")]
    NotSquare {
        /// Number of locations.
        expected: usize,
        /// Offending length.
        found: usize,
    },
    /// A diagonal cell is non-zero.
    #[error("distance from location {id} to itself must be zero")]
    NonZeroDiagonal {
        /// Location on the diagonal.
        id: u64,
    },
    /// The matrix is not symmetric.
    #[error("distance {from} -> {to} differs from {to} -> {from}")]
    Asymmetric {
        /// Row location.
        from: u64,
        /// Column location.
        to: u64,
    },
}
