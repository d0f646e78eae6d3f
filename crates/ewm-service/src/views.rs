//! Hit recording and view counts, backed by the stats service.
//!
//! Every call here is best effort: a failing stats service is logged at
//! `warn` and reads as zero views, never as a failed request.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Months, NaiveDateTime};
use ewm_core::{Event, EventDetails};
use ewm_stats::{NewHit, StatsQuery, StatsSource};

const EVENT_URI_PREFIX: &str = "/events/";

/// URI under which an event's public page is counted.
pub fn event_uri(id: u64) -> String {
    format!("{EVENT_URI_PREFIX}{id}")
}

fn event_id(uri: &str) -> Option<u64> {
    uri.strip_prefix(EVENT_URI_PREFIX)?.parse().ok()
}

/// Records hits and looks up view counts for events.
#[derive(Clone)]
pub struct ViewTracker {
    stats: Arc<dyn StatsSource>,
    app: String,
}

impl ViewTracker {
    /// `app` is the name hits are recorded under.
    pub fn new(stats: Arc<dyn StatsSource>, app: impl Into<String>) -> Self {
        Self {
            stats,
            app: app.into(),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    /// Records one hit on `uri` from `ip`.
    pub async fn record_hit(&self, uri: &str, ip: &str, now: NaiveDateTime) {
        let hit = NewHit::new(&self.app, uri, ip, now);
        if let Err(e) = self.stats.save_hit(hit).await {
            tracing::warn!(error = %e, uri, "failed to record hit");
        }
    }

    /// Unique-IP views of a published event since its publication.
    pub async fn event_views(&self, event: &Event, now: NaiveDateTime) -> u64 {
        let Some(published_on) = event.published_on else {
            return 0;
        };
        let start = published_on - Duration::seconds(1);
        self.views(&[event.id], start, now, true)
            .await
            .get(&event.id)
            .copied()
            .unwrap_or(0)
    }

    /// Unique-IP views for a page of search results, in one query.
    pub async fn search_views(
        &self,
        events: &[EventDetails],
        now: NaiveDateTime,
    ) -> HashMap<u64, u64> {
        let Some(start) = events.iter().filter_map(|d| d.event.published_on).min() else {
            return HashMap::new();
        };
        let ids: Vec<u64> = events.iter().map(|d| d.event.id).collect();
        self.views(&ids, start - Duration::seconds(1), now, true)
            .await
    }

    /// Total views for the events of one or more compilations, in one query.
    ///
    /// The window opens at the earliest publication among the events, or a
    /// month back when none is published.
    pub async fn compilation_views<'a>(
        &self,
        events: impl IntoIterator<Item = &'a EventDetails>,
        now: NaiveDateTime,
    ) -> HashMap<u64, u64> {
        let events: Vec<&Event> = events.into_iter().map(|d| &d.event).collect();
        if events.is_empty() {
            return HashMap::new();
        }
        let start = events
            .iter()
            .filter_map(|e| e.published_on)
            .min()
            .unwrap_or_else(|| now.checked_sub_months(Months::new(1)).unwrap_or(now));
        let mut ids: Vec<u64> = events.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        self.views(&ids, start, now, false).await
    }

    async fn views(
        &self,
        ids: &[u64],
        start: NaiveDateTime,
        end: NaiveDateTime,
        unique: bool,
    ) -> HashMap<u64, u64> {
        if ids.is_empty() {
            return HashMap::new();
        }
        let query = StatsQuery::new(start, end)
            .uris(ids.iter().map(|&id| event_uri(id)))
            .unique(unique);

        let stats = match self.stats.get_stats(&query).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, events = ids.len(), "failed to fetch views");
                return HashMap::new();
            }
        };

        // distinct ips are counted per app, so only our own rows add up
        let mut views = HashMap::new();
        for row in stats.into_iter().filter(|row| row.app == self.app) {
            if let Some(id) = event_id(&row.uri) {
                *views.entry(id).or_insert(0) += row.hits;
            }
        }
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ewm_stats::HitStore;
    use ewm_types::datetime;

    fn at(s: &str) -> NaiveDateTime {
        datetime::parse(s).unwrap()
    }

    #[test]
    fn test_event_uri_roundtrip() {
        assert_eq!(event_uri(12), "/events/12");
        assert_eq!(event_id("/events/12"), Some(12));
        assert_eq!(event_id("/events"), None);
        assert_eq!(event_id("/events/x"), None);
    }

    #[tokio::test]
    async fn test_views_count_unique_ips() {
        let hits = Arc::new(HitStore::new());
        let tracker = ViewTracker::new(hits.clone(), "ewm-main-service");
        let t = at("2024-01-01 12:00:00");
        tracker.record_hit("/events/1", "10.0.0.1", t).await;
        tracker.record_hit("/events/1", "10.0.0.1", t).await;
        tracker.record_hit("/events/1", "10.0.0.2", t).await;
        tracker.record_hit("/events/2", "10.0.0.1", t).await;
        assert_eq!(hits.len(), 4);

        let unique = tracker
            .views(&[1, 2], at("2024-01-01 00:00:00"), at("2024-01-02 00:00:00"), true)
            .await;
        assert_eq!(unique.get(&1), Some(&2));
        assert_eq!(unique.get(&2), Some(&1));

        let all = tracker
            .views(&[1], at("2024-01-01 00:00:00"), at("2024-01-02 00:00:00"), false)
            .await;
        assert_eq!(all.get(&1), Some(&3));
        assert!(all.get(&2).is_none());
    }

    #[tokio::test]
    async fn test_views_ignore_other_apps() {
        let hits = Arc::new(HitStore::new());
        let tracker = ViewTracker::new(hits.clone(), "ewm-main-service");
        let t = at("2024-01-01 12:00:00");
        tracker.record_hit("/events/1", "10.0.0.1", t).await;
        hits.record(NewHit::new("ewm-mobile", "/events/1", "10.0.0.1", t))
            .unwrap();

        let unique = tracker
            .views(&[1], at("2024-01-01 00:00:00"), at("2024-01-02 00:00:00"), true)
            .await;
        assert_eq!(unique.get(&1), Some(&1));
    }
}
