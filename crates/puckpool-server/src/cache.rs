// Time-bounded cache of player season stats keyed by (player id, season).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use puckpool_core::model::{PlayerId, PlayerStats};
use puckpool_core::season::Season;
use tokio::time::Instant;
use tracing::debug;

type CacheKey = (PlayerId, Season);

#[derive(Debug, Clone)]
struct CacheEntry {
    stats: PlayerStats,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// TTL cache for `/api/player/:id` results.
///
/// Concurrent misses for the same key may both populate the entry; the last
/// insert wins. The lock is never held across an await.
pub struct StatsCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl StatsCache {
    /// `max_entries == 0` leaves the cache unbounded.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    pub fn get(&self, id: PlayerId, season: &Season) -> Option<PlayerStats> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let key = (id, season.clone());
        match entries.get(&key) {
            Some(entry) if !entry.is_expired(self.ttl) => Some(entry.stats.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, season: &Season, stats: PlayerStats) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let key = (stats.id, season.clone());

        if self.max_entries > 0 && !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let ttl = self.ttl;
            entries.retain(|_, entry| !entry.is_expired(ttl));
            if entries.len() >= self.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    debug!(player_id = oldest.0, season = %oldest.1, "evicting oldest cache entry");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                stats,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included until touched.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
