//! Road-distance providers backed by HTTP routing services.
//!
//! This module provides implementations of the
//! [`DistanceProvider`](fleetroute_core::DistanceProvider) trait that query
//! external routing engines for driving distances.
//!
//! # Available providers
//!
//! - [`HttpDistanceProvider`]: Queries a GraphHopper instance's `/route`
//!   endpoint once per location pair.
//!
//! # Example
//!
//! ```no_run
//! use fleetroute_core::{DistanceMatrixBuilder, Location};
//! use fleetroute_data::routing::HttpDistanceProvider;
//!
//! let provider = HttpDistanceProvider::new("http://localhost:8989")?;
//! let builder = DistanceMatrixBuilder::new(provider);
//! let locations = vec![
//!     Location::new(0, 36.7682, 10.2753),
//!     Location::new(1, 36.8196, 10.3035),
//! ];
//!
//! let matrix = builder.build(&locations)?;
//! println!("{} m", matrix.distance(0, 1)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod graphhopper;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpDistanceProvider,
    HttpDistanceProviderConfig, ProviderBuildError,
};
