//! Focused unit tests covering solve CLI configuration and request parsing.

use std::time::Duration;

use camino::Utf8PathBuf;
use fleetroute_core::{DEFAULT_VEHICLE_PENALTY, Location, PlanRequest, PlanSummary, Score};
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use super::helpers::{StubPlannerBuilder, write_utf8};
use super::*;
use crate::planner::{PlannerOverrides, PlannerSettings};
use crate::solve::{
    SolveArgs, SolveConfig, config_from_layers_for_test, load_plan_request, run_solve_with,
};

/// Helper to set up a temporary directory and request path.
fn setup_request_test() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    let request_path = root.join("request.json");
    (tmp, request_path)
}

fn two_customer_request() -> PlanRequest {
    PlanRequest::new(
        Location::new(0, 36.7682, 10.2753),
        vec![
            Location::new(1, 36.8196, 10.3035),
            Location::new(2, 36.8064, 10.1817),
        ],
        vec![100],
        vec![40, 40],
    )
}

#[rstest]
fn converting_solve_without_request_errors() {
    let args = SolveArgs {
        request_path: None,
        ..SolveArgs::default()
    };

    let err = SolveConfig::try_from(args).expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_SOLVE_REQUEST);
            assert_eq!(env, ENV_SOLVE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn solve_config_applies_library_defaults() {
    let args = SolveArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        ..SolveArgs::default()
    };

    let config = SolveConfig::try_from(args).expect("config should build");
    assert_eq!(config.request_path, Utf8PathBuf::from("request.json"));
    assert_eq!(config.settings, PlannerSettings::default());
    assert_eq!(config.settings.graphhopper_url, "http://localhost:8989");
    assert_eq!(config.settings.max_concurrent_requests, 10);
    assert_eq!(config.settings.request_timeout, Duration::from_secs(10));
    assert_eq!(config.settings.max_steps, 10_000);
    assert_eq!(config.settings.time_limit, Duration::from_secs(30));
}

#[rstest]
fn solve_config_keeps_explicit_options() {
    let args = SolveArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        graphhopper_url: Some("http://routing.internal:8989".to_owned()),
        max_concurrent_requests: Some(4),
        request_timeout_secs: Some(3),
        max_steps: Some(0),
        time_limit_secs: Some(5),
    };

    let config = SolveConfig::try_from(args).expect("config should build");
    assert_eq!(
        config.settings,
        PlannerSettings {
            graphhopper_url: "http://routing.internal:8989".to_owned(),
            max_concurrent_requests: 4,
            request_timeout: Duration::from_secs(3),
            max_steps: 0,
            time_limit: Duration::from_secs(5),
        }
    );
}

#[rstest]
#[case::concurrency(ARG_MAX_CONCURRENT_REQUESTS)]
#[case::timeout(ARG_REQUEST_TIMEOUT_SECS)]
#[case::time_limit(ARG_TIME_LIMIT_SECS)]
fn zero_valued_options_are_rejected(#[case] expected_field: &'static str) {
    let mut args = SolveArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        ..SolveArgs::default()
    };
    match expected_field {
        ARG_MAX_CONCURRENT_REQUESTS => args.max_concurrent_requests = Some(0),
        ARG_REQUEST_TIMEOUT_SECS => args.request_timeout_secs = Some(0),
        _ => args.time_limit_secs = Some(0),
    }

    let err = SolveConfig::try_from(args).expect_err("zero option should error");
    match err {
        CliError::ZeroOption { field } => assert_eq!(field, expected_field),
        other => panic!("expected ZeroOption, found {other:?}"),
    }
}

#[rstest]
fn planner_settings_expose_their_routing_half() {
    let settings = PlannerSettings::try_from(PlannerOverrides {
        graphhopper_url: Some("http://routing.internal:8989".to_owned()),
        max_concurrent_requests: Some(3),
        max_steps: Some(12),
        ..PlannerOverrides::default()
    })
    .expect("settings should resolve");

    let routing = settings.routing();
    assert_eq!(routing.graphhopper_url, "http://routing.internal:8989");
    assert_eq!(routing.max_concurrent_requests, 3);
    assert_eq!(routing.request_timeout, Duration::from_secs(10));
    assert_eq!(routing.matrix_config().max_concurrent_requests(), 3);
    assert_eq!(settings.max_steps, 12);
}

#[rstest]
fn validate_sources_reports_missing_request() {
    let (_tmp, request_path) = setup_request_test();
    let config = SolveConfig {
        request_path: request_path.clone(),
        settings: PlannerSettings::default(),
    };

    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_SOLVE_REQUEST);
            assert_eq!(path, request_path);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file() {
    let (_tmp, request_path) = setup_request_test();
    std::fs::create_dir(&request_path).expect("request directory");
    let config = SolveConfig {
        request_path: request_path.clone(),
        settings: PlannerSettings::default(),
    };

    let err = config
        .validate_sources()
        .expect_err("expected directory path to fail validation");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_SOLVE_REQUEST);
            assert_eq!(path, request_path);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn load_plan_request_decodes_json() {
    let (_tmp, request_path) = setup_request_test();
    let request = two_customer_request();
    let payload = serde_json::to_string_pretty(&request).expect("serialise request");
    write_utf8(&request_path, payload.as_bytes());

    let decoded = load_plan_request(&request_path).expect("request should decode");
    assert_eq!(decoded, request);
}

#[rstest]
fn load_plan_request_reads_camel_case_fields() {
    let (_tmp, request_path) = setup_request_test();
    let payload = json!({
        "depot": { "id": 0, "latitude": 36.7682, "longitude": 10.2753 },
        "customerLocations": [{ "id": 1, "latitude": 36.8196, "longitude": 10.3035 }],
        "vehicleCapacities": [50],
        "customerDemands": [12],
    });
    write_utf8(&request_path, payload.to_string().as_bytes());

    let decoded = load_plan_request(&request_path).expect("request should decode");
    assert_eq!(decoded.vehicle_capacities, vec![50]);
    assert_eq!(decoded.customer_demands, vec![12]);
    assert_eq!(decoded.customer_locations.len(), 1);
}

#[rstest]
fn load_plan_request_rejects_invalid_json() {
    let (_tmp, request_path) = setup_request_test();
    write_utf8(&request_path, b"{ not valid json");

    let err = load_plan_request(&request_path).expect_err("invalid json should error");
    match err {
        CliError::ParsePlanRequest { path, .. } => assert_eq!(path, request_path),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn load_plan_request_io_error_returns_open_error() {
    let (_tmp, request_path) = setup_request_test();

    let err = load_plan_request(&request_path).expect_err("missing request should error");
    match err {
        CliError::OpenPlanRequest { path, .. } => assert_eq!(path, request_path),
        other => panic!("expected OpenPlanRequest, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "graphhopper_url": "http://from-file:8989",
            "max_steps": 100,
            "time_limit_secs": 7,
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": "from-env.json",
        "max_steps": 200,
    }));
    composer.push_cli(json!({
        "max_steps": 300,
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, Utf8PathBuf::from("from-env.json"));
    assert_eq!(config.settings.graphhopper_url, "http://from-file:8989");
    assert_eq!(config.settings.max_steps, 300);
    assert_eq!(config.settings.time_limit, Duration::from_secs(7));
}

#[rstest]
fn run_solve_with_prints_the_plan_summary() {
    let (_tmp, request_path) = setup_request_test();
    let payload = serde_json::to_string(&two_customer_request()).expect("serialise request");
    write_utf8(&request_path, payload.as_bytes());
    let args = SolveArgs {
        request_path: Some(request_path),
        max_steps: Some(50),
        ..SolveArgs::default()
    };
    let builder = StubPlannerBuilder::with_distance(1_000);
    let mut stdout = Vec::new();

    run_solve_with(args, &builder, &mut stdout).expect("solve should succeed");

    let text = String::from_utf8(stdout).expect("stdout utf-8");
    assert!(text.ends_with('\n'));
    let summary: PlanSummary = serde_json::from_str(&text).expect("output should be a summary");
    assert!(summary.feasible);
    assert_eq!(summary.total_customers, 2);
    assert_eq!(summary.total_distance, 3_000);
    assert_eq!(summary.score, Score::new(0, -(3_000 + DEFAULT_VEHICLE_PENALTY)));
    let seen = builder.seen.borrow();
    assert_eq!(seen.as_ref().map(|settings| settings.max_steps), Some(50));
}

#[rstest]
fn run_solve_with_surfaces_planning_errors() {
    let (_tmp, request_path) = setup_request_test();
    let request = PlanRequest::new(
        Location::new(0, 36.7682, 10.2753),
        vec![Location::new(1, 36.8196, 10.3035)],
        vec![100],
        vec![-5],
    );
    let payload = serde_json::to_string(&request).expect("serialise request");
    write_utf8(&request_path, payload.as_bytes());
    let args = SolveArgs {
        request_path: Some(request_path),
        ..SolveArgs::default()
    };
    let mut stdout = Vec::new();

    let err = run_solve_with(args, &StubPlannerBuilder::with_distance(1_000), &mut stdout)
        .expect_err("negative demand should fail");
    match err {
        CliError::Plan(fleetroute_core::PlanError::InvalidDemand { index, value }) => {
            assert_eq!(index, 0);
            assert_eq!(value, -5);
        }
        other => panic!("expected InvalidDemand, found {other:?}"),
    }
    assert!(stdout.is_empty());
}
