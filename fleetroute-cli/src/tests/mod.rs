//! Shared test harness modules for the fleetroute CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
mod matrix_unit;
mod solve_steps;
mod solve_unit;
