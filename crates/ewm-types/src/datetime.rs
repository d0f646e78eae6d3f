//! `yyyy-MM-dd HH:mm:ss` timestamps.
//!
//! All timestamps on the wire are naive UTC date-times with second
//! precision. The [`serde_format`] and [`serde_format_opt`] modules plug the
//! format into `#[serde(with = ...)]`.

use chrono::{Months, NaiveDateTime, SubsecRound, Utc};

/// `strftime` pattern for wire timestamps.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current UTC time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

/// Formats a timestamp for the wire.
pub fn format(value: &NaiveDateTime) -> String {
    value.format(FORMAT).to_string()
}

/// Parses a wire timestamp.
pub fn parse(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), FORMAT)
}

/// Adds calendar years; Feb 29 falls back to Feb 28. Saturates at the
/// largest representable time.
pub fn plus_years(value: NaiveDateTime, years: u32) -> NaiveDateTime {
    value
        .checked_add_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Serde adapter for `NaiveDateTime` fields.
pub mod serde_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<NaiveDateTime>` fields.
pub mod serde_format_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&super::format(v)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        raw.map(|r| super::parse(&r).map_err(serde::de::Error::custom))
            .transpose()
    }
}
