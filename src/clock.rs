//! Time-of-day helpers.
//!
//! Schedules are expressed as wall-clock `HH:MM` values on a single day.

use chrono::{NaiveTime, Timelike};

/// Build a time of day from hour/minute, rejecting out-of-range values.
pub fn hm(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Minutes since midnight.
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Time of day for a minute offset, `None` past 23:59.
pub fn from_minutes(minutes: u32) -> Option<NaiveTime> {
    hm(minutes / 60, minutes % 60)
}

/// Parse `HH:MM`.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Format as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter that writes times as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw)
            .ok_or_else(|| D::Error::custom(format!("expected HH:MM, got {raw:?}")))
    }

    /// Same as the parent module, for optional times.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_some(&super::super::format_hhmm(*time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|value| {
                super::super::parse_hhmm(&value)
                    .ok_or_else(|| D::Error::custom(format!("expected HH:MM, got {value:?}")))
            })
            .transpose()
        }
    }
}
