//! Abstraction over where hits go and where view counts come from.

use async_trait::async_trait;

use crate::{HitStore, NewHit, Result, StatsQuery, ViewStats};

/// A place hits can be sent to and view counts read from.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Records one hit.
    async fn save_hit(&self, hit: NewHit) -> Result<()>;

    /// Runs an aggregate query.
    async fn get_stats(&self, query: &StatsQuery) -> Result<Vec<ViewStats>>;
}

#[async_trait]
impl StatsSource for HitStore {
    async fn save_hit(&self, hit: NewHit) -> Result<()> {
        self.record(hit).map(|_| ())
    }

    async fn get_stats(&self, query: &StatsQuery) -> Result<Vec<ViewStats>> {
        self.stats(query)
    }
}
