//! Routing-service adapters for the Fleetroute engine.
//!
//! Responsibilities:
//! - Implement `fleetroute_core::DistanceProvider` against HTTP routing
//!   services.
//! - Translate transport and payload failures into
//!   `fleetroute_core::ProviderError`.
//!
//! Boundaries:
//! - Do not encode planning rules (live in `fleetroute-core`).
//! - Do not substitute fallback distances; the matrix builder owns that.
//!
//! Invariants:
//! - Providers are `Send + Sync` and safe to call from many worker threads.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod routing;
