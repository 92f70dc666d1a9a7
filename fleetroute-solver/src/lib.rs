//! Local search solver for Fleetroute.
//!
//! This crate provides [`LocalSearchSolver`], the default implementation of the
//! [`Solver`](fleetroute_core::Solver) trait. It builds a complete assignment
//! by greedy best insertion and then improves it with relocate moves, scoring
//! every candidate move incrementally through
//! [`ScoreTracker`](fleetroute_core::objective::ScoreTracker).
//!
//! The search is deterministic for a given problem as long as the time limit
//! is not reached: customers, vehicles and positions are always visited in the
//! same order and ties keep the first candidate found.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;

pub use solver::{LocalSearchConfig, LocalSearchSolver};
