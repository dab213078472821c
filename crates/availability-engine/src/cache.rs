//! Pull-based cache of resolved day schedules.
//!
//! Entries are keyed by `(professional_id, date)` and served only while they
//! are younger than the staleness window. Any booking mutation for a key must
//! invalidate it; rule edits invalidate every date of the professional. The
//! cache never refreshes anything on its own, callers recompute on a miss.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::trace;

use crate::schedule::DaySchedule;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    professional_id: String,
    date: NaiveDate,
}

#[derive(Debug, Clone)]
struct CachedDay {
    schedule: DaySchedule,
    stored_at: Instant,
}

/// Day schedules with a staleness window.
///
/// Time is passed in explicitly so that callers (and tests) control the clock.
#[derive(Debug, Clone)]
pub struct SlotCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CachedDay>,
}

impl SlotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached schedule, if present and not older than the window at `now`.
    pub fn get(&self, professional_id: &str, date: NaiveDate, now: Instant) -> Option<&DaySchedule> {
        let key = CacheKey {
            professional_id: professional_id.to_string(),
            date,
        };
        let entry = self.entries.get(&key)?;
        if now.saturating_duration_since(entry.stored_at) >= self.ttl {
            trace!(professional_id, %date, "cache entry stale");
            return None;
        }
        Some(&entry.schedule)
    }

    pub fn insert(&mut self, professional_id: &str, schedule: DaySchedule, now: Instant) {
        let key = CacheKey {
            professional_id: professional_id.to_string(),
            date: schedule.date,
        };
        self.entries.insert(
            key,
            CachedDay {
                schedule,
                stored_at: now,
            },
        );
    }

    /// Drop one `(professional, date)` entry. Returns whether one existed.
    pub fn invalidate(&mut self, professional_id: &str, date: NaiveDate) -> bool {
        let key = CacheKey {
            professional_id: professional_id.to_string(),
            date,
        };
        let removed = self.entries.remove(&key).is_some();
        trace!(professional_id, %date, removed, "cache invalidate");
        removed
    }

    /// Drop every date cached for a professional. Returns how many were removed.
    pub fn invalidate_professional(&mut self, professional_id: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|key, _| key.professional_id != professional_id);
        let removed = before - self.entries.len();
        trace!(professional_id, removed, "cache invalidate professional");
        removed
    }

    /// Evict entries that are stale at `now`. Returns how many were removed.
    pub fn purge_stale(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
