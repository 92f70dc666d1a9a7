//! Geographic locations addressed by stable identifiers.

use geo::{Coord, Point};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on the map with a unique identifier.
///
/// The identifier is what the distance matrix is keyed on; coordinates are
/// only used when querying the routing provider or estimating a fallback.
///
/// # Examples
/// ```
/// use fleetroute_core::Location;
///
/// let depot = Location::new(0, 36.7682, 10.2753);
/// assert_eq!(depot.coord().x, 10.2753);
/// assert_eq!(depot.coord().y, 36.7682);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Unique identifier.
    pub id: u64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Location {
    /// Construct a location.
    #[must_use]
    pub const fn new(id: u64, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
        }
    }

    /// Coordinate in `geo` convention (`x` = longitude, `y` = latitude).
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Coordinate as a `geo` point.
    #[must_use]
    pub fn point(&self) -> Point<f64> {
        Point::from(self.coord())
    }

    /// Whether both locations sit on exactly the same coordinate.
    #[must_use]
    pub fn same_position(&self, other: &Self) -> bool {
        self.coord() == other.coord()
    }
}
