use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tablerank_core::{is_fresh, Restaurant, FRESHNESS_WINDOW_HOURS};
use tokio::sync::Mutex;

const MAX_TTL_HOURS: i64 = 24 * 365 * 10;

/// A restaurant snapshot and when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedRestaurant {
    pub restaurant: Restaurant,
    pub fetched_at: DateTime<Utc>,
}

/// In-memory place details keyed by place id. Entries older than the TTL
/// are treated as missing. Clones share the same map.
#[derive(Debug, Clone)]
pub struct DetailsCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, CachedRestaurant>>>,
}

impl Default for DetailsCache {
    fn default() -> Self {
        Self::new(Duration::hours(FRESHNESS_WINDOW_HOURS))
    }
}

impl DetailsCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// TTL in whole hours, capped at ten years.
    #[must_use]
    pub fn with_ttl_hours(hours: u64) -> Self {
        let hours = i64::try_from(hours).unwrap_or(MAX_TTL_HOURS).min(MAX_TTL_HOURS);
        Self::new(Duration::hours(hours))
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached snapshot if it is still fresh at `now`.
    pub async fn get(&self, place_id: &str, now: DateTime<Utc>) -> Option<CachedRestaurant> {
        let entries = self.entries.lock().await;
        entries
            .get(place_id)
            .filter(|entry| is_fresh(entry.fetched_at, now, self.ttl))
            .cloned()
    }

    pub async fn insert(&self, restaurant: Restaurant, fetched_at: DateTime<Utc>) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            restaurant.place_id.clone(),
            CachedRestaurant {
                restaurant,
                fetched_at,
            },
        );
    }

    /// Drops stale entries and returns how many were removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| is_fresh(entry.fetched_at, now, self.ttl));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "purged stale place details");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
