//! Time-bounded cache around the refresh pipeline.
//!
//! Policy (used by the watch loop so rapid refreshes don't hammer the feed):
//!
//! - serve the cached result for up to the staleness window
//! - at most one recomputation in flight when the window expires (the lock is
//!   held across the recompute)
//! - a failed recomputation leaves the previous good result intact; the
//!   stale value is served instead of replacing it with a partial one

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::AppError;

struct Entry<T> {
    value: T,
    refreshed_at: Instant,
}

pub struct RefreshCache<T> {
    ttl: Duration,
    slot: Mutex<Option<Entry<T>>>,
}

impl<T: Clone> RefreshCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached value if fresh, otherwise recompute it.
    ///
    /// On recompute failure with a previous value available, returns the
    /// stale value (reads of a previously cached, immutable result stay
    /// safe); the error is only surfaced when there is nothing to serve.
    pub fn get_or_refresh<F>(&self, refresh: F) -> Result<T, AppError>
    where
        F: FnOnce() -> Result<T, AppError>,
    {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(entry) = slot.as_ref() {
            if entry.refreshed_at.elapsed() < self.ttl {
                return Ok(entry.value.clone());
            }
        }

        match refresh() {
            Ok(value) => {
                *slot = Some(Entry {
                    value: value.clone(),
                    refreshed_at: Instant::now(),
                });
                Ok(value)
            }
            Err(err) => match slot.as_ref() {
                Some(entry) => Ok(entry.value.clone()),
                None => Err(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fresh_value_is_served_without_recompute() {
        let cache = RefreshCache::new(Duration::from_secs(3600));
        let calls = Cell::new(0u32);
        let refresh = || {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        };
        assert_eq!(cache.get_or_refresh(refresh).unwrap(), 1);
        assert_eq!(
            cache
                .get_or_refresh(|| {
                    calls.set(calls.get() + 1);
                    Ok(calls.get())
                })
                .unwrap(),
            1
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn expired_value_triggers_exactly_one_recompute() {
        let cache = RefreshCache::new(Duration::ZERO);
        let calls = Cell::new(0u32);
        for _ in 0..3 {
            cache
                .get_or_refresh(|| {
                    calls.set(calls.get() + 1);
                    Ok(calls.get())
                })
                .unwrap();
        }
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn failed_recompute_keeps_previous_value() {
        let cache = RefreshCache::new(Duration::ZERO);
        assert_eq!(cache.get_or_refresh(|| Ok(7)).unwrap(), 7);
        let served = cache
            .get_or_refresh(|| Err(AppError::new(4, "feed unreachable")))
            .unwrap();
        assert_eq!(served, 7);
    }

    #[test]
    fn failure_with_no_previous_value_is_an_error() {
        let cache: RefreshCache<u32> = RefreshCache::new(Duration::ZERO);
        assert!(
            cache
                .get_or_refresh(|| Err(AppError::new(4, "feed unreachable")))
                .is_err()
        );
    }
}
