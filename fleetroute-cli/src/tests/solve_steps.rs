//! Behaviour-driven step definitions driving the solve and sample CLI
//! scenarios.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use clap::Parser;
use fleetroute_core::{Location, PlanRequest, PlanSummary};
use fleetroute_data::routing::test_support::StubDistanceProvider;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use super::helpers::{StubPlannerBuilder, StubProviderBuilder, write_utf8};
use super::*;
use crate::matrix::run_matrix_with;
use crate::polyline::run_polyline_with;
use crate::sample::run_sample_with;
use crate::solve::run_solve_with;

#[derive(Debug)]
struct SolveWorld {
    _tmp: TempDir,
    request_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SolveWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let request_path = root.join("request.json");

        Self {
            _tmp: tmp,
            request_path,
            include_request: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn solve_command_line(&self) -> Vec<String> {
        let mut argv = vec!["fleetroute".to_owned(), "solve".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_owned());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn run(&self, argv: Vec<String>) {
        let builder = StubPlannerBuilder::with_distance(1_000);
        let providers = StubProviderBuilder::new(StubDistanceProvider::with_distance(1_000));
        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| {
            let mut buffer = self.stdout.borrow_mut();
            match cli.command {
                Command::Solve(args) => run_solve_with(args, &builder, &mut *buffer),
                Command::Sample(args) => run_sample_with(args, &builder, &mut *buffer),
                Command::Matrix(args) => run_matrix_with(args, &providers, &mut *buffer),
                Command::Polyline(args) => run_polyline_with(args, &providers, &mut *buffer),
            }
        });
        self.result.replace(Some(outcome));
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> SolveWorld {
    SolveWorld::new()
}

#[given("a valid plan request exists on disk")]
fn valid_plan_request_exists(#[from(world)] world: &SolveWorld) {
    let request = PlanRequest::new(
        Location::new(0, 36.7682, 10.2753),
        vec![
            Location::new(1, 36.8196, 10.3035),
            Location::new(2, 36.8064, 10.1817),
        ],
        vec![100],
        vec![40, 40],
    );
    let payload = serde_json::to_string_pretty(&request).expect("serialise request");
    write_utf8(&world.request_path, payload.as_bytes());
}

#[given("the plan request contains invalid JSON")]
fn plan_request_contains_invalid_json(#[from(world)] world: &SolveWorld) {
    write_utf8(&world.request_path, b"{ not valid json");
}

#[given("I omit the plan request path")]
fn omit_plan_request_path(#[from(world)] world: &SolveWorld) {
    world.include_request.replace(false);
}

#[given("no plan request has been written")]
fn no_plan_request_written(#[from(world)] world: &SolveWorld) {
    assert!(!world.request_path.exists());
}

#[given("the concurrency limit is set to zero")]
fn concurrency_limit_zero(#[from(world)] world: &SolveWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_MAX_CONCURRENT_REQUESTS}"),
        "0".to_owned(),
    ]);
}

#[when("I run the solve command")]
fn run_solve_command(#[from(world)] world: &SolveWorld) {
    world.run(world.solve_command_line());
}

#[when("I run the sample command")]
fn run_sample_command(#[from(world)] world: &SolveWorld) {
    world.run(vec!["fleetroute".to_owned(), "sample".to_owned()]);
}

#[then("the command succeeds and prints a feasible plan for {count} customers")]
fn command_succeeds_with_plan(#[from(world)] world: &SolveWorld, count: usize) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    assert!(result.is_ok(), "expected success, found {result:?}");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let summary: PlanSummary =
        serde_json::from_str(&stdout).expect("output should be a JSON plan summary");
    assert!(summary.feasible);
    assert_eq!(summary.total_customers, count);
    let served: usize = summary.routes.iter().map(|route| route.stops.len()).sum();
    assert_eq!(served, count);
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &SolveWorld) {
    match &*world.error() {
        CliError::ParsePlanRequest { path, .. } => assert_eq!(*path, world.request_path),
        other => panic!("expected ParsePlanRequest, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &SolveWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_SOLVE_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the request file does not exist")]
fn command_fails_missing_request_file(#[from(world)] world: &SolveWorld) {
    match &*world.error() {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(*field, ARG_SOLVE_REQUEST);
            assert_eq!(*path, world.request_path);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[then("the command fails because the concurrency limit is zero")]
fn command_fails_zero_concurrency(#[from(world)] world: &SolveWorld) {
    match &*world.error() {
        CliError::ZeroOption { field } => assert_eq!(*field, ARG_MAX_CONCURRENT_REQUESTS),
        other => panic!("expected ZeroOption, found {other:?}"),
    }
}

macro_rules! register_solve_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/solve_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SolveWorld) {
            let _ = world;
        }
    };
}

register_solve_scenario!(solve_happy_path, "solving a request from JSON");
register_solve_scenario!(solve_invalid_json, "rejecting invalid JSON input");
register_solve_scenario!(solve_missing_request, "rejecting missing request paths");
register_solve_scenario!(
    solve_absent_request_file,
    "rejecting a request file that does not exist"
);
register_solve_scenario!(solve_zero_concurrency, "rejecting a zero concurrency limit");
register_solve_scenario!(sample_happy_path, "planning the sample problem");
