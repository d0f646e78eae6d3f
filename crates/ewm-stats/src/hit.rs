//! Hit and view-count types.

use chrono::NaiveDateTime;
use ewm_types::datetime::serde_format;
use serde::{Deserialize, Serialize};

use crate::{Result, StatsError};

/// A hit as submitted to `POST /hit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHit {
    /// Application that served the request.
    pub app: String,
    /// Request path, e.g. `/events/7`.
    pub uri: String,
    /// Client address.
    pub ip: String,
    #[serde(with = "serde_format")]
    pub timestamp: NaiveDateTime,
}

impl NewHit {
    /// Creates a hit.
    pub fn new(
        app: impl Into<String>,
        uri: impl Into<String>,
        ip: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            app: app.into(),
            uri: uri.into(),
            ip: ip.into(),
            timestamp,
        }
    }

    /// Rejects hits with blank text fields.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("app", &self.app), ("uri", &self.uri), ("ip", &self.ip)] {
            if value.trim().is_empty() {
                return Err(StatsError::BlankField { field });
            }
        }
        Ok(())
    }
}

/// A stored hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointHit {
    pub id: u64,
    pub app: String,
    pub uri: String,
    pub ip: String,
    #[serde(with = "serde_format")]
    pub timestamp: NaiveDateTime,
}

/// Aggregated hits for one (app, uri) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStats {
    pub app: String,
    pub uri: String,
    pub hits: u64,
}

/// Parameters of a `GET /stats` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Exact URIs to include; empty means all.
    pub uris: Vec<String>,
    /// Count distinct IPs instead of raw hits.
    pub unique: bool,
}

impl StatsQuery {
    /// Creates a query over `[start, end]` for every URI.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            uris: Vec::new(),
            unique: false,
        }
    }

    /// Restricts the query to the given URIs.
    pub fn uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uris = uris.into_iter().map(Into::into).collect();
        self
    }

    /// Switches between raw hits and distinct IPs.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Checks the window bounds.
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(StatsError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ewm_types::datetime;

    #[test]
    fn test_hit_wire_format() {
        let json = r#"{"app":"ewm-main-service","uri":"/events/1","ip":"10.0.0.1","timestamp":"2024-03-01 12:00:00"}"#;
        let hit: NewHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.uri, "/events/1");
        assert_eq!(datetime::format(&hit.timestamp), "2024-03-01 12:00:00");
        assert!(hit.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let hit = NewHit::new("app", " ", "1.1.1.1", datetime::now());
        assert!(matches!(
            hit.validate(),
            Err(StatsError::BlankField { field: "uri" })
        ));
    }

    #[test]
    fn test_query_range() {
        let now = datetime::now();
        assert!(StatsQuery::new(now, now).validate().is_ok());
        assert!(StatsQuery::new(now + chrono::Duration::seconds(1), now)
            .validate()
            .is_err());
    }
}
