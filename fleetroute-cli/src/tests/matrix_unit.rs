//! Unit tests for the `matrix` command.

use std::time::Duration;

use camino::Utf8PathBuf;
use fleetroute_core::distance::fallback::estimate_meters;
use fleetroute_core::{Location, MatrixBuildError, ProviderError};
use fleetroute_data::routing::test_support::StubDistanceProvider;
use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

use super::helpers::{StubProviderBuilder, write_utf8};
use super::*;
use crate::matrix::{MatrixArgs, MatrixConfig, MatrixOutput, load_locations, run_matrix_with};
use crate::routing::RoutingSettings;

struct LocationsFile {
    _tmp: TempDir,
    path: Utf8PathBuf,
}

#[fixture]
fn locations_file() -> LocationsFile {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    LocationsFile {
        path: root.join("locations.json"),
        _tmp: tmp,
    }
}

fn tunis() -> Vec<Location> {
    vec![
        Location::new(0, 36.7682, 10.2753),
        Location::new(7, 36.8196, 10.3035),
        Location::new(3, 36.8064, 10.1817),
    ]
}

fn args_for(path: &Utf8PathBuf) -> MatrixArgs {
    MatrixArgs {
        locations_path: Some(path.clone()),
        ..MatrixArgs::default()
    }
}

#[rstest]
fn converting_matrix_without_locations_errors() {
    let err = MatrixConfig::try_from(MatrixArgs::default()).expect_err("missing locations");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_MATRIX_LOCATIONS);
            assert_eq!(env, ENV_MATRIX_LOCATIONS);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn matrix_config_applies_routing_defaults() {
    let config = MatrixConfig::try_from(args_for(&Utf8PathBuf::from("locations.json")))
        .expect("config should build");
    assert_eq!(config.settings, RoutingSettings::default());
    assert_eq!(config.settings.max_concurrent_requests, 10);
    assert_eq!(config.settings.request_timeout, Duration::from_secs(10));
}

#[rstest]
fn matrix_rejects_zero_concurrency() {
    let args = MatrixArgs {
        max_concurrent_requests: Some(0),
        ..args_for(&Utf8PathBuf::from("locations.json"))
    };
    match MatrixConfig::try_from(args).expect_err("zero concurrency") {
        CliError::ZeroOption { field } => assert_eq!(field, ARG_MAX_CONCURRENT_REQUESTS),
        other => panic!("expected ZeroOption, found {other:?}"),
    }
}

#[rstest]
fn load_locations_decodes_a_json_array(locations_file: LocationsFile) {
    let payload = json!([
        { "id": 0, "latitude": 36.7682, "longitude": 10.2753 },
        { "id": 7, "latitude": 36.8196, "longitude": 10.3035 },
    ]);
    write_utf8(&locations_file.path, payload.to_string().as_bytes());

    let decoded = load_locations(&locations_file.path).expect("locations should decode");
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.get(1).map(|location| location.id), Some(7));
}

#[rstest]
fn load_locations_rejects_invalid_json(locations_file: LocationsFile) {
    write_utf8(&locations_file.path, b"[{ \"id\": 0 }");

    match load_locations(&locations_file.path).expect_err("invalid JSON") {
        CliError::ParseLocations { path, .. } => assert_eq!(path, locations_file.path),
        other => panic!("expected ParseLocations, found {other:?}"),
    }
}

#[rstest]
fn load_locations_reports_open_errors(locations_file: LocationsFile) {
    match load_locations(&locations_file.path).expect_err("missing file") {
        CliError::OpenLocations { path, .. } => assert_eq!(path, locations_file.path),
        other => panic!("expected OpenLocations, found {other:?}"),
    }
}

#[rstest]
fn run_matrix_with_prints_ids_and_rows(locations_file: LocationsFile) {
    let payload = serde_json::to_string(&tunis()).expect("serialise locations");
    write_utf8(&locations_file.path, payload.as_bytes());
    let args = MatrixArgs {
        max_concurrent_requests: Some(2),
        ..args_for(&locations_file.path)
    };
    let builder = StubProviderBuilder::new(StubDistanceProvider::with_distance(700));
    let mut stdout = Vec::new();

    run_matrix_with(args, &builder, &mut stdout).expect("matrix should build");

    let output: MatrixOutput = serde_json::from_slice(&stdout).expect("matrix JSON");
    assert_eq!(output.ids, vec![0, 7, 3]);
    assert_eq!(
        output.distances,
        vec![vec![0, 700, 700], vec![700, 0, 700], vec![700, 700, 0]]
    );
    let seen = builder.seen.borrow();
    assert_eq!(
        seen.as_ref().map(|settings| settings.max_concurrent_requests),
        Some(2)
    );
}

#[rstest]
fn unreachable_provider_yields_estimates(locations_file: LocationsFile) {
    let locations = tunis();
    let payload = serde_json::to_string(&locations).expect("serialise locations");
    write_utf8(&locations_file.path, payload.as_bytes());
    let builder = StubProviderBuilder::new(StubDistanceProvider::with_error(
        ProviderError::Network {
            url: "http://localhost:8989/route".to_owned(),
            message: "connection refused".to_owned(),
        },
    ));
    let mut stdout = Vec::new();

    run_matrix_with(args_for(&locations_file.path), &builder, &mut stdout)
        .expect("fallback keeps the matrix complete");

    let output: MatrixOutput = serde_json::from_slice(&stdout).expect("matrix JSON");
    let (Some(first), Some(second)) = (locations.first(), locations.get(1)) else {
        panic!("fixture has three locations");
    };
    let row = output.distances.first().expect("first row");
    assert_eq!(row.get(1).copied(), Some(estimate_meters(first, second)));
}

#[rstest]
#[case::empty(json!([]))]
#[case::duplicate(json!([
    { "id": 4, "latitude": 0.0, "longitude": 0.0 },
    { "id": 4, "latitude": 1.0, "longitude": 1.0 },
]))]
fn invalid_location_lists_are_rejected(
    locations_file: LocationsFile,
    #[case] payload: serde_json::Value,
) {
    write_utf8(&locations_file.path, payload.to_string().as_bytes());
    let builder = StubProviderBuilder::new(StubDistanceProvider::with_distance(1));
    let mut stdout = Vec::new();

    let err = run_matrix_with(args_for(&locations_file.path), &builder, &mut stdout)
        .expect_err("invalid location list");
    match err {
        CliError::BuildMatrix(MatrixBuildError::EmptyInput) => {
            assert_eq!(payload, json!([]));
        }
        CliError::BuildMatrix(MatrixBuildError::DuplicateLocation { id }) => assert_eq!(id, 4),
        other => panic!("expected BuildMatrix, found {other:?}"),
    }
    assert!(stdout.is_empty());
}

#[rstest]
fn matrix_rejects_directories(locations_file: LocationsFile) {
    std::fs::create_dir(&locations_file.path).expect("locations directory");
    let builder = StubProviderBuilder::new(StubDistanceProvider::with_distance(1));
    let mut stdout = Vec::new();

    let err = run_matrix_with(args_for(&locations_file.path), &builder, &mut stdout)
        .expect_err("directory is not a file");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_MATRIX_LOCATIONS);
            assert_eq!(path, locations_file.path);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
    assert!(builder.seen.borrow().is_none());
}
