//! Geometric distance estimate used when the routing provider fails.
//!
//! The estimate is the great-circle distance inflated by a fixed detour factor
//! to approximate road length.

use geo::{Distance, Haversine};

use crate::Location;

/// Multiplier applied to the great-circle distance.
pub const DETOUR_FACTOR: f64 = 1.3;

/// Estimated road distance in whole metres.
///
/// Rounds up so distinct positions never collapse to zero; identical
/// coordinates yield `0`.
///
/// # Examples
/// ```
/// use fleetroute_core::Location;
/// use fleetroute_core::distance::fallback::estimate_meters;
///
/// let a = Location::new(1, 0.0, 0.0);
/// let b = Location::new(2, 0.0, 1.0);
/// let meters = estimate_meters(&a, &b);
/// assert!((144_000..146_000).contains(&meters));
/// ```
#[must_use]
pub fn estimate_meters(from: &Location, to: &Location) -> u64 {
    if from.same_position(to) {
        return 0;
    }
    let straight = Haversine.distance(from.point(), to.point());
    to_whole_meters(inflate(straight)).max(1)
}

#[expect(
    clippy::float_arithmetic,
    reason = "detour factor is a floating-point multiplier"
)]
fn inflate(meters: f64) -> f64 {
    meters * DETOUR_FACTOR
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "input is finite and non-negative; values beyond u64 saturate"
)]
fn to_whole_meters(meters: f64) -> u64 {
    if meters.is_finite() && meters > 0.0 {
        meters.ceil() as u64
    } else {
        0
    }
}
