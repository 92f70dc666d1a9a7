//! GraphHopper API response types for the Routing service.
//!
//! Only the fields the distance provider reads are modelled. Unknown fields
//! are ignored.
//!
//! See: <https://docs.graphhopper.com/#operation/getRoute>

use serde::Deserialize;

/// GraphHopper `/route` response.
///
/// Successful responses carry at least one path. Failures (including "no
/// route found") carry a `message` and no paths.
#[derive(Debug, Default, Deserialize)]
pub struct RouteResponse {
    /// Alternative paths, best first.
    #[serde(default)]
    pub paths: Vec<RoutePath>,

    /// Error description when no path could be computed.
    pub message: Option<String>,
}

/// A single routed path.
#[derive(Debug, Deserialize)]
pub struct RoutePath {
    /// Path length in metres.
    pub distance: f64,

    /// Encoded polyline, present when `points_encoded=true` and points were
    /// calculated.
    pub points: Option<String>,
}

impl RouteResponse {
    /// The best path, if the service found any.
    #[must_use]
    pub fn best_path(&self) -> Option<&RoutePath> {
        self.paths.first()
    }

    /// Service message, or a generic description when none was sent.
    #[must_use]
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "No route found".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_success_response() {
        let json = r#"{
            "hints": {"visited_nodes.sum": 42},
            "paths": [{"distance": 5321.7, "time": 412000, "points": "_p~iF~ps|U_ulLnnqC"}]
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        let path = response.best_path().expect("should have a path");
        assert_eq!(path.distance.to_bits(), 5321.7_f64.to_bits());
        assert_eq!(path.points.as_deref(), Some("_p~iF~ps|U_ulLnnqC"));
        assert!(response.message.is_none());
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{
            "message": "Cannot find point 0: 36.0,10.0",
            "hints": [{"message": "Cannot find point 0"}]
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.best_path().is_none());
        assert_eq!(
            response.failure_message(),
            "Cannot find point 0: 36.0,10.0"
        );
    }

    #[test]
    fn missing_message_uses_generic_description() {
        let response: RouteResponse = serde_json::from_str(r#"{"paths": []}"#)
            .expect("should deserialise");

        assert_eq!(response.failure_message(), "No route found");
    }
}
