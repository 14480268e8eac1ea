use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minutes without an update before a vehicle counts as aging.
pub const AGING_AFTER_MINUTES: f64 = 5.0;
/// Minutes without an update before a vehicle counts as stale.
pub const STALE_AFTER_MINUTES: f64 = 10.0;

/// Freshness of a vehicle's last reported position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalenessTier {
    Fresh,
    Aging,
    Stale,
}

pub fn tier_for_minutes(minutes: f64) -> StalenessTier {
    if minutes >= STALE_AFTER_MINUTES {
        StalenessTier::Stale
    } else if minutes >= AGING_AFTER_MINUTES {
        StalenessTier::Aging
    } else {
        StalenessTier::Fresh
    }
}

pub fn elapsed_minutes(last_update: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    now.signed_duration_since(last_update).num_milliseconds() as f64 / 60_000.0
}

pub fn tier_at(last_update: DateTime<Utc>, now: DateTime<Utc>) -> StalenessTier {
    tier_for_minutes(elapsed_minutes(last_update, now))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{StalenessTier, tier_at, tier_for_minutes};

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier_for_minutes(0.0), StalenessTier::Fresh);
        assert_eq!(tier_for_minutes(4.99), StalenessTier::Fresh);
        assert_eq!(tier_for_minutes(5.0), StalenessTier::Aging);
        assert_eq!(tier_for_minutes(9.99), StalenessTier::Aging);
        assert_eq!(tier_for_minutes(10.0), StalenessTier::Stale);
        assert_eq!(tier_for_minutes(600.0), StalenessTier::Stale);
    }

    #[test]
    fn future_timestamps_are_fresh() {
        assert_eq!(tier_for_minutes(-3.0), StalenessTier::Fresh);
    }

    #[test]
    fn tier_at_uses_millisecond_precision() {
        let last = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let just_under = last + Duration::minutes(5) - Duration::milliseconds(1);
        assert_eq!(tier_at(last, just_under), StalenessTier::Fresh);
        assert_eq!(tier_at(last, last + Duration::minutes(5)), StalenessTier::Aging);
        assert_eq!(tier_at(last, last + Duration::minutes(10)), StalenessTier::Stale);
    }
}
