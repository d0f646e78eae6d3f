//! In-memory hit log.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{EndpointHit, NewHit, Result, StatsQuery, ViewStats};

/// Thread-safe log of recorded hits.
#[derive(Default)]
pub struct HitStore {
    hits: RwLock<Vec<EndpointHit>>,
    next_id: AtomicU64,
}

impl HitStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records a hit.
    pub fn record(&self, hit: NewHit) -> Result<EndpointHit> {
        hit.validate()?;

        let stored = EndpointHit {
            id: self.next_id(),
            app: hit.app,
            uri: hit.uri,
            ip: hit.ip,
            timestamp: hit.timestamp,
        };
        self.hits.write().push(stored.clone());
        Ok(stored)
    }

    /// Aggregates hits inside `[start, end]`, grouped by (app, uri) and
    /// ordered by count, highest first.
    pub fn stats(&self, query: &StatsQuery) -> Result<Vec<ViewStats>> {
        query.validate()?;

        let uris: HashSet<&str> = query.uris.iter().map(String::as_str).collect();
        let hits = self.hits.read();

        let mut groups: BTreeMap<(&str, &str), (u64, HashSet<&str>)> = BTreeMap::new();
        for hit in hits.iter().filter(|h| {
            h.timestamp >= query.start
                && h.timestamp <= query.end
                && (uris.is_empty() || uris.contains(h.uri.as_str()))
        }) {
            let entry = groups
                .entry((hit.app.as_str(), hit.uri.as_str()))
                .or_default();
            entry.0 += 1;
            entry.1.insert(hit.ip.as_str());
        }

        let mut stats: Vec<ViewStats> = groups
            .into_iter()
            .map(|((app, uri), (total, ips))| ViewStats {
                app: app.to_string(),
                uri: uri.to_string(),
                hits: if query.unique { ips.len() as u64 } else { total },
            })
            .collect();

        // Stable sort keeps (app, uri) order among equal counts.
        stats.sort_by(|a, b| b.hits.cmp(&a.hits));
        Ok(stats)
    }

    /// Number of stored hits.
    pub fn len(&self) -> usize {
        self.hits.read().len()
    }

    /// Returns true when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.hits.read().is_empty()
    }

    /// Drops every recorded hit.
    pub fn clear(&self) {
        self.hits.write().clear();
    }
}
