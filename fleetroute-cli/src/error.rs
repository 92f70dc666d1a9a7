//! Error type for the fleetroute CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use fleetroute_core::{MatrixBuildError, PlanError, ProviderError};
use fleetroute_data::routing::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the fleetroute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass it on the command line or set {env})")]
    MissingArgument {
        /// Name of the missing argument.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A numeric option is out of range.
    #[error("--{field} must be at least 1")]
    ZeroOption {
        /// Name of the offending option.
        field: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Argument that named the path.
        field: &'static str,
        /// Path as given.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Argument that named the path.
        field: &'static str,
        /// Path as given.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Argument that named the path.
        field: &'static str,
        /// Path as given.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the plan request file failed.
    #[error("failed to open plan request at {path:?}: {source}")]
    OpenPlanRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Plan request JSON could not be decoded.
    #[error("failed to parse plan request JSON at {path:?}: {source}")]
    ParsePlanRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Opening the locations file failed.
    #[error("failed to open locations at {path:?}: {source}")]
    OpenLocations {
        /// Locations path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Locations JSON could not be decoded.
    #[error("failed to parse locations JSON at {path:?}: {source}")]
    ParseLocations {
        /// Locations path.
        path: Utf8PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// A coordinate argument is not a valid `LAT,LON` pair.
    #[error("{field} {value:?} is not a valid LAT,LON coordinate")]
    InvalidCoordinate {
        /// Argument that carried the coordinate.
        field: &'static str,
        /// Value as given.
        value: String,
    },
    /// Constructing the GraphHopper distance provider failed.
    #[error("failed to build distance provider for {base_url:?}: {source}")]
    BuildDistanceProvider {
        /// Configured GraphHopper base URL.
        base_url: String,
        /// Underlying construction error.
        #[source]
        source: ProviderBuildError,
    },
    /// Planning failed.
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
    /// Building a distance matrix failed.
    #[error("failed to build distance matrix: {0}")]
    BuildMatrix(#[from] MatrixBuildError),
    /// The routing service could not produce a polyline.
    #[error("failed to fetch route polyline: {0}")]
    Polyline(#[source] ProviderError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
