// Shared state handed to every request handler.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::cache::StatsCache;
use crate::config::CacheConfig;
use crate::upstream::StatsProvider;

/// Clock used to decide which season is "current".
pub type Today = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub struct AppState {
    pub provider: Arc<dyn StatsProvider>,
    pub cache: StatsCache,
    pub today: Today,
}

impl AppState {
    pub fn new(provider: Arc<dyn StatsProvider>, cache: &CacheConfig) -> Self {
        Self {
            provider,
            cache: StatsCache::new(cache.ttl(), cache.max_entries),
            today: local_today,
        }
    }

    /// Replace the clock; tests pin "today" to a fixed date.
    pub fn with_today(mut self, today: Today) -> Self {
        self.today = today;
        self
    }
}
