//! Timer-driven cache over the host's configuration backend.
//!
//! [`SettingsCache`] bounds backend queries to one full read per refresh
//! interval of simulated time, regardless of tick rate. Every tick reads
//! the same fully-populated [`ConfigSnapshot`]; a refresh replaces it
//! whole.

use perfix_core::{ConfigSnapshot, ConfigSource, OptionKey};
use tracing::{debug, info};

/// Cached snapshot of the enumerated option set.
#[derive(Debug)]
pub struct SettingsCache {
    snapshot: ConfigSnapshot,
    accum: f64,
    interval: f64,
    elapsed: f64,
    refreshes: u64,
}

impl SettingsCache {
    /// Create an empty (invalid) cache refreshing every `interval_secs`.
    pub fn new(interval_secs: f64) -> Self {
        Self {
            snapshot: ConfigSnapshot::default(),
            accum: 0.0,
            interval: interval_secs,
            elapsed: 0.0,
            refreshes: 0,
        }
    }

    /// Accumulate `simulated_dt` and refresh if the interval has elapsed or
    /// the cache has never been populated.
    ///
    /// Returns `true` if a refresh happened.
    pub fn refresh_if_due(&mut self, simulated_dt: f64, source: &dyn ConfigSource) -> bool {
        let dt = if simulated_dt.is_finite() && simulated_dt > 0.0 {
            simulated_dt
        } else {
            0.0
        };
        self.accum += dt;
        self.elapsed += dt;
        if self.accum >= self.interval || !self.snapshot.is_valid() {
            self.refresh_now(source);
            true
        } else {
            false
        }
    }

    /// Unconditionally read every option from `source` and reset the
    /// accumulator.
    pub fn refresh_now(&mut self, source: &dyn ConfigSource) {
        let next = ConfigSnapshot::capture(source, self.elapsed);
        if !next.same_flags(&self.snapshot) {
            let enabled: Vec<&'static str> = next.enabled().map(OptionKey::name).collect();
            info!(?enabled, "profiler options changed");
        }
        self.snapshot = next;
        self.accum = 0.0;
        self.refreshes += 1;
        debug!(
            at = self.elapsed,
            refreshes = self.refreshes,
            enabled = self.snapshot.enabled().count(),
            "settings refreshed"
        );
    }

    /// The most recent snapshot. Never queries the backend.
    #[inline]
    pub fn current(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    /// Shorthand for `current().get(key)`.
    #[inline]
    pub fn get(&self, key: OptionKey) -> bool {
        self.snapshot.get(key)
    }

    /// Number of refreshes performed so far.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts lookups so tests can tell when the backend was queried.
    struct CountingSource {
        lookups: Cell<usize>,
        glow: Cell<bool>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                lookups: Cell::new(0),
                glow: Cell::new(false),
            }
        }
    }

    impl ConfigSource for CountingSource {
        fn lookup(&self, name: &str) -> Option<bool> {
            self.lookups.set(self.lookups.get() + 1);
            (name == "disable-glow").then(|| self.glow.get())
        }
    }

    #[test]
    fn first_call_refreshes_regardless_of_dt() {
        let src = CountingSource::new();
        let mut cache = SettingsCache::new(0.25);
        assert!(!cache.current().is_valid());
        assert!(cache.refresh_if_due(0.0, &src));
        assert!(cache.current().is_valid());
        assert_eq!(src.lookups.get(), OptionKey::COUNT);
    }

    #[test]
    fn refresh_waits_for_quarter_second() {
        let src = CountingSource::new();
        let mut cache = SettingsCache::new(0.25);
        cache.refresh_now(&src);
        assert!(!cache.refresh_if_due(0.1, &src));
        assert!(!cache.refresh_if_due(0.1, &src));
        assert!(cache.refresh_if_due(0.1, &src));
        // Accumulator restarted.
        assert!(!cache.refresh_if_due(0.1, &src));
        assert_eq!(cache.refresh_count(), 2);
    }

    #[test]
    fn current_never_requeries() {
        let src = CountingSource::new();
        let mut cache = SettingsCache::new(0.25);
        cache.refresh_now(&src);
        let before = src.lookups.get();
        for _ in 0..10 {
            let _ = cache.get(OptionKey::DisableGlow);
            let _ = cache.current();
        }
        assert_eq!(src.lookups.get(), before);
    }

    #[test]
    fn backend_change_visible_only_after_refresh() {
        let src = CountingSource::new();
        let mut cache = SettingsCache::new(0.25);
        cache.refresh_now(&src);
        src.glow.set(true);
        cache.refresh_if_due(0.1, &src);
        assert!(!cache.get(OptionKey::DisableGlow));
        cache.refresh_if_due(0.2, &src);
        assert!(cache.get(OptionKey::DisableGlow));
    }

    #[test]
    fn negative_dt_does_not_rewind() {
        let src = CountingSource::new();
        let mut cache = SettingsCache::new(0.25);
        cache.refresh_now(&src);
        assert!(!cache.refresh_if_due(-5.0, &src));
        assert!(!cache.refresh_if_due(f64::NAN, &src));
        assert!(cache.refresh_if_due(0.25, &src));
    }

    #[test]
    fn validity_is_sticky() {
        let src = CountingSource::new();
        let mut cache = SettingsCache::new(0.25);
        cache.refresh_if_due(0.01, &src);
        for _ in 0..100 {
            cache.refresh_if_due(0.01, &src);
            assert!(cache.current().is_valid());
        }
    }
}
