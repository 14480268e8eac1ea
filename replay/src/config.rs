use std::path::PathBuf;
use std::time::Duration;

use fleet_map_client::config::DEFAULT_ICON_BASE_DIR;

pub const DEFAULT_REPLAY_STEP_MS: u64 = 250;
pub const DEFAULT_ICON_REFRESH_SECS: u64 = 30; // icons age on a 5-minute scale

/// JSON-lines file of vehicle snapshots. Required.
pub fn feed_path() -> Option<PathBuf> {
    non_empty_var("FLEET_MAP_FEED").map(PathBuf::from)
}

/// JSON itinerary to draw next to the fleet.
pub fn itinerary_path() -> Option<PathBuf> {
    non_empty_var("FLEET_MAP_ITINERARY").map(PathBuf::from)
}

pub fn icon_base_dir() -> String {
    non_empty_var("FLEET_MAP_ICON_BASE").unwrap_or_else(|| DEFAULT_ICON_BASE_DIR.to_string())
}

pub fn replay_step() -> Duration {
    std::env::var("REPLAY_STEP_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(DEFAULT_REPLAY_STEP_MS))
}

pub fn icon_refresh_interval() -> Duration {
    std::env::var("ICON_REFRESH_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_ICON_REFRESH_SECS))
}

/// Shift the tracker clock back so a recorded feed ages as if it were live.
/// On unless `REPLAY_ANCHOR_CLOCK` is `0`, `false`, `no` or `off`.
pub fn anchor_clock() -> bool {
    non_empty_var("REPLAY_ANCHOR_CLOCK")
        .map(|value| {
            !matches!(
                value.to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            )
        })
        .unwrap_or(true)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
