//! Polyline command: the encoded road route between two coordinates.

use std::io::Write;

use clap::Parser;
use fleetroute_core::Location;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::write_line;
use crate::routing::{HttpProviderBuilder, ProviderBuilder, RoutingOverrides, RoutingSettings};
use crate::{
    ARG_GRAPHHOPPER_URL, ARG_POLYLINE_FROM, ARG_POLYLINE_TO, ARG_REQUEST_TIMEOUT_SECS, CliError,
    ENV_POLYLINE_FROM, ENV_POLYLINE_TO,
};

/// CLI arguments for the `polyline` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the encoded polyline of the road route between two \
                 coordinates, each given as LAT,LON in decimal degrees.",
    about = "Fetch the encoded route between two coordinates"
)]
#[ortho_config(prefix = "FLEETROUTE")]
pub(crate) struct PolylineArgs {
    /// Start coordinate as LAT,LON.
    #[arg(value_name = "from", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// End coordinate as LAT,LON.
    #[arg(value_name = "to", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Base URL for the GraphHopper server (e.g. "http://localhost:8989").
    #[arg(long = ARG_GRAPHHOPPER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) graphhopper_url: Option<String>,
    /// Timeout in seconds for the routing request.
    #[arg(long = ARG_REQUEST_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) request_timeout_secs: Option<u64>,
}

impl PolylineArgs {
    pub(crate) fn into_config(self) -> Result<PolylineConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PolylineConfig::try_from(merged)
    }
}

/// Resolved `polyline` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PolylineConfig {
    pub(crate) from: Location,
    pub(crate) to: Location,
    pub(crate) settings: RoutingSettings,
}

impl TryFrom<PolylineArgs> for PolylineConfig {
    type Error = CliError;

    fn try_from(args: PolylineArgs) -> Result<Self, Self::Error> {
        let from = args.from.ok_or(CliError::MissingArgument {
            field: ARG_POLYLINE_FROM,
            env: ENV_POLYLINE_FROM,
        })?;
        let to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_POLYLINE_TO,
            env: ENV_POLYLINE_TO,
        })?;
        let settings = RoutingSettings::try_from(RoutingOverrides {
            graphhopper_url: args.graphhopper_url,
            max_concurrent_requests: None,
            request_timeout_secs: args.request_timeout_secs,
        })?;
        Ok(Self {
            from: parse_coordinate(0, ARG_POLYLINE_FROM, &from)?,
            to: parse_coordinate(1, ARG_POLYLINE_TO, &to)?,
            settings,
        })
    }
}

/// Parse `LAT,LON` into a location with the given id.
pub(crate) fn parse_coordinate(
    id: u64,
    field: &'static str,
    value: &str,
) -> Result<Location, CliError> {
    let invalid = || CliError::InvalidCoordinate {
        field,
        value: value.to_owned(),
    };
    let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid());
    }
    Ok(Location::new(id, latitude, longitude))
}

pub(crate) fn run_polyline(args: PolylineArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_polyline_with(args, &HttpProviderBuilder, &mut stdout)
}

pub(crate) fn run_polyline_with(
    args: PolylineArgs,
    builder: &dyn ProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let provider = builder.build(&config.settings)?;
    debug!(
        "fetching polyline ({}, {}) -> ({}, {})",
        config.from.latitude, config.from.longitude, config.to.latitude, config.to.longitude
    );
    let polyline = provider
        .route_polyline(&config.from, &config.to)
        .map_err(CliError::Polyline)?;
    write_line(writer, &polyline)
}
