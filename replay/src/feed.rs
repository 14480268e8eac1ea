use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::warn;

use fleet_map_shared::{EntitySnapshot, Itinerary};

/// Parse a JSON-lines snapshot feed. Lines that fail to parse are skipped.
pub fn parse_feed(text: &str) -> Vec<EntitySnapshot> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match serde_json::from_str::<EntitySnapshot>(line) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "skipping unparsable feed line");
                None
            }
        })
        .collect()
}

/// How far behind wall time the feed was recorded, taken from its first
/// snapshot. `None` when the feed is empty or not in the past.
pub fn recording_lag(snapshots: &[EntitySnapshot], now: DateTime<Utc>) -> Option<TimeDelta> {
    let first = snapshots.first()?;
    Some(now.signed_duration_since(first.last_update)).filter(|lag| *lag > TimeDelta::zero())
}

pub async fn load_feed(path: &Path) -> Result<Vec<EntitySnapshot>, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("read {}: {e}", path.display()))?;
    Ok(parse_feed(&text))
}

pub async fn load_itinerary(path: &Path) -> Result<Itinerary, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::{TimeDelta, TimeZone, Utc};

    use fleet_map_shared::EntityId;

    use super::{load_itinerary, parse_feed, recording_lag};

    #[test]
    fn parse_feed_keeps_order_and_skips_bad_lines() {
        let text = r#"{"id":"A1","lat":1,"lng":2,"lastUpdate":"2024-03-01T12:00:00Z","label":"474"}

not json
{"id":"A2","lat":3,"lng":4,"lastUpdate":"2024-03-01T12:00:05Z","label":"474"}
"#;
        let feed = parse_feed(text);
        let ids: Vec<EntityId> = feed.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![EntityId::new("A1"), EntityId::new("A2")]);
    }

    #[test]
    fn recording_lag_is_measured_from_the_first_snapshot() {
        let feed = parse_feed(
            r#"{"id":"A1","lat":1,"lng":2,"lastUpdate":"2024-03-01T12:00:00Z"}
{"id":"A2","lat":3,"lng":4,"lastUpdate":"2024-03-01T11:00:00Z"}"#,
        );
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(recording_lag(&feed, now), Some(TimeDelta::days(1)));

        let before = Utc.with_ymd_and_hms(2024, 3, 1, 11, 59, 0).unwrap();
        assert_eq!(recording_lag(&feed, before), None);
        assert_eq!(recording_lag(&[], now), None);
    }

    #[tokio::test]
    async fn missing_itinerary_file_is_an_error() {
        let err = load_itinerary(Path::new("/nonexistent/fleet-map/itinerary.json"))
            .await
            .unwrap_err();
        assert!(err.starts_with("read "), "unexpected error: {err}");
    }
}
