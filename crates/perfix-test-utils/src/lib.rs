//! Test utilities and mock collaborators for Perfix development.
//!
//! Provides a hand-advanced [`ManualClock`], a map-backed
//! [`MapConfigSource`], a [`RecordingDisplay`] that keeps every panel
//! update, and deterministic operation and frame-sequence fixtures in
//! [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use perfix_core::{ms_to_duration, ConfigSource, DisplaySurface, MonotonicClock, OptionKey};

pub use fixtures::{jittered_frames, CountingOperation, SleepOperation};

/// Monotonic clock that only moves when told to.
///
/// Interior mutability lets tests advance it through a shared reference
/// while the profiler holds another (`Rc<ManualClock>`).
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.advance(ms_to_duration(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Config source backed by an ordered name → value map.
///
/// Unset names report `None`, which the profiler treats as `false`.
#[derive(Clone, Debug, Default)]
pub struct MapConfigSource {
    values: IndexMap<String, bool>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: &str, value: bool) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_owned(), value);
    }

    pub fn set_key(&mut self, key: OptionKey, value: bool) {
        self.set(key.name(), value);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl ConfigSource for MapConfigSource {
    fn lookup(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }
}

/// Display surface that records panel text and visibility.
#[derive(Clone, Debug, Default)]
pub struct RecordingDisplay {
    primary: String,
    detail: String,
    primary_visible: bool,
    detail_visible: bool,
    primary_updates: usize,
    detail_updates: usize,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_text(&self) -> &str {
        &self.primary
    }

    pub fn detail_text(&self) -> &str {
        &self.detail
    }

    pub fn primary_visible(&self) -> bool {
        self.primary_visible
    }

    pub fn detail_visible(&self) -> bool {
        self.detail_visible
    }

    /// Times the primary panel text was replaced.
    pub fn primary_updates(&self) -> usize {
        self.primary_updates
    }

    /// Times the detail panel text was replaced.
    pub fn detail_updates(&self) -> usize {
        self.detail_updates
    }
}

impl DisplaySurface for RecordingDisplay {
    fn show_primary(&mut self, text: &str) {
        self.primary.clear();
        self.primary.push_str(text);
        self.primary_visible = true;
        self.primary_updates += 1;
    }

    fn hide_primary(&mut self) {
        self.primary_visible = false;
    }

    fn show_detail(&mut self, text: &str) {
        self.detail.clear();
        self.detail.push_str(text);
        self.detail_visible = true;
        self.detail_updates += 1;
    }

    fn hide_detail(&mut self) {
        self.detail_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_only_on_request() {
        let c = ManualClock::new();
        let t0 = c.now();
        assert_eq!(c.now(), t0);
        c.advance_ms(2.5);
        assert_eq!(c.now() - t0, Duration::from_micros(2500));
    }

    #[test]
    fn map_source_reports_unset_as_none() {
        let src = MapConfigSource::new().with("disable-glow", true);
        assert_eq!(src.lookup("disable-glow"), Some(true));
        assert_eq!(src.lookup("disable-shake"), None);
    }

    #[test]
    fn recording_display_tracks_visibility() {
        let mut d = RecordingDisplay::new();
        d.show_primary("a");
        d.show_primary("b");
        d.hide_primary();
        assert_eq!(d.primary_text(), "b");
        assert!(!d.primary_visible());
        assert_eq!(d.primary_updates(), 2);
    }
}
