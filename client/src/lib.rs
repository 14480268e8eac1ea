pub mod config;
pub mod icons;
pub mod map;
pub mod overlay;
pub mod spawn;
pub mod telemetry;
pub mod tracker;

#[cfg(test)]
mod fake_map;

pub use config::{IconSet, OverlayConfig, TrackerConfig};
pub use map::{MapSurface, MarkerHandle, MarkerIcon, MarkerOptions, PathHandle, PathOptions};
pub use overlay::TrajectoryOverlay;
pub use telemetry::{ObservabilityCounters, ObservabilitySnapshot};
pub use tracker::EntityMarkerTracker;
