//! Matrix command: road distances between every pair of a location list.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use fleetroute_core::{DistanceMatrix, DistanceMatrixBuilder, Location};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{open_utf8_file, require_file};
use crate::output::write_json;
use crate::routing::{HttpProviderBuilder, ProviderBuilder, RoutingOverrides, RoutingSettings};
use crate::{
    ARG_GRAPHHOPPER_URL, ARG_MATRIX_LOCATIONS, ARG_MAX_CONCURRENT_REQUESTS,
    ARG_REQUEST_TIMEOUT_SECS, CliError, ENV_MATRIX_LOCATIONS,
};

/// CLI arguments for the `matrix` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Measure road distances between every pair of a JSON list \
                 of locations. Pairs the routing server cannot answer fall \
                 back to a great-circle estimate.",
    about = "Build a distance matrix for a JSON location list"
)]
#[ortho_config(prefix = "FLEETROUTE")]
pub(crate) struct MatrixArgs {
    /// Path to a JSON array of locations.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) locations_path: Option<Utf8PathBuf>,
    /// Base URL for the GraphHopper server (e.g. "http://localhost:8989").
    #[arg(long = ARG_GRAPHHOPPER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) graphhopper_url: Option<String>,
    /// Maximum number of concurrent distance requests.
    #[arg(long = ARG_MAX_CONCURRENT_REQUESTS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_concurrent_requests: Option<usize>,
    /// Timeout in seconds for a single routing request.
    #[arg(long = ARG_REQUEST_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) request_timeout_secs: Option<u64>,
}

impl MatrixArgs {
    pub(crate) fn into_config(self) -> Result<MatrixConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MatrixConfig::try_from(merged)
    }
}

/// Resolved `matrix` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MatrixConfig {
    pub(crate) locations_path: Utf8PathBuf,
    pub(crate) settings: RoutingSettings,
}

impl TryFrom<MatrixArgs> for MatrixConfig {
    type Error = CliError;

    fn try_from(args: MatrixArgs) -> Result<Self, Self::Error> {
        let locations_path = args.locations_path.ok_or(CliError::MissingArgument {
            field: ARG_MATRIX_LOCATIONS,
            env: ENV_MATRIX_LOCATIONS,
        })?;
        let settings = RoutingSettings::try_from(RoutingOverrides {
            graphhopper_url: args.graphhopper_url,
            max_concurrent_requests: args.max_concurrent_requests,
            request_timeout_secs: args.request_timeout_secs,
        })?;
        Ok(Self {
            locations_path,
            settings,
        })
    }
}

/// Matrix as printed by the command: row `i` holds distances from `ids[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MatrixOutput {
    pub(crate) ids: Vec<u64>,
    pub(crate) distances: Vec<Vec<u64>>,
}

impl From<&DistanceMatrix> for MatrixOutput {
    fn from(matrix: &DistanceMatrix) -> Self {
        Self {
            ids: matrix.ids().to_vec(),
            distances: matrix.to_rows(),
        }
    }
}

pub(crate) fn run_matrix(args: MatrixArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_matrix_with(args, &HttpProviderBuilder, &mut stdout)
}

pub(crate) fn run_matrix_with(
    args: MatrixArgs,
    builder: &dyn ProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_file(ARG_MATRIX_LOCATIONS, &config.locations_path)?;
    let locations = load_locations(&config.locations_path)?;
    let provider = builder.build(&config.settings)?;
    let matrix_builder =
        DistanceMatrixBuilder::with_config(provider, config.settings.matrix_config());
    let (matrix, report) = matrix_builder.build_with_report(&locations)?;
    info!(
        "measured {} pairs for {} locations ({} fallback)",
        report.pairs, report.locations, report.fallback
    );
    write_json(writer, &MatrixOutput::from(&matrix))
}

/// Loads a JSON array of [`Location`] values from disk.
pub(crate) fn load_locations(path: &Utf8Path) -> Result<Vec<Location>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenLocations {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseLocations {
        path: path.to_path_buf(),
        source,
    })
}
