use serde::{Deserialize, Serialize};

use crate::entity::LatLng;

/// One point of a planned route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    /// Part of the return leg; never chosen as an endpoint.
    #[serde(default)]
    pub is_returning: bool,
}

impl Waypoint {
    pub const fn new(lat: f64, lng: f64, is_returning: bool) -> Self {
        Self {
            lat,
            lng,
            is_returning,
        }
    }

    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Start and end of an itinerary as drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoints {
    pub from: Waypoint,
    pub to: Waypoint,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
}

impl Itinerary {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Path geometry: every waypoint, returning or not, in sequence order.
    pub fn path_points(&self) -> Vec<LatLng> {
        self.waypoints.iter().map(Waypoint::position).collect()
    }

    /// First and second non-returning waypoints, or `None` if there are fewer than two.
    pub fn endpoints(&self) -> Option<Endpoints> {
        let mut outbound = self.waypoints.iter().filter(|w| !w.is_returning);
        let from = *outbound.next()?;
        let to = *outbound.next()?;
        Some(Endpoints { from, to })
    }
}
