use chrono::{DateTime, Utc};

/// Human readable age of an update, e.g. "3 minutos".
///
/// Each unit is derived from the previous one by division, so only the
/// printed value is rounded.
pub fn format_age(elapsed_secs: f64) -> String {
    let mut value = elapsed_secs.max(0.0);
    if value < 60.0 {
        return with_unit(value, "segundos");
    }
    value /= 60.0;
    if value < 60.0 {
        return with_unit(value, "minutos");
    }
    value /= 60.0;
    if value < 24.0 {
        return with_unit(value, "horas");
    }
    value /= 24.0;
    with_unit(value, "dias")
}

pub fn format_age_between(last_update: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = now.signed_duration_since(last_update).num_milliseconds();
    format_age(elapsed_ms as f64 / 1000.0)
}

fn with_unit(value: f64, unit: &str) -> String {
    format!("{} {unit}", value.round() as i64)
}
