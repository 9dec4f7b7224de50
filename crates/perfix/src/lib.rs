//! Perfix: frame telemetry and adaptive throttling for real-time simulation loops.
//!
//! This is the top-level facade crate that re-exports the public API from the
//! Perfix sub-crates. For most hosts, adding `perfix` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use perfix::prelude::*;
//!
//! // Options live wherever the host keeps them; here only the overlay is on.
//! struct Options;
//! impl ConfigSource for Options {
//!     fn lookup(&self, name: &str) -> Option<bool> {
//!         Some(name == "show-profiler")
//!     }
//! }
//!
//! // Panels are host resources; this host discards them.
//! struct NoPanels;
//! impl DisplaySurface for NoPanels {
//!     fn show_primary(&mut self, _text: &str) {}
//!     fn hide_primary(&mut self) {}
//!     fn show_detail(&mut self, _text: &str) {}
//!     fn hide_detail(&mut self) {}
//! }
//!
//! let mut ctx = ProfilerContext::new(ProfilerConfig::default(), SystemClock, &Options).unwrap();
//! let mut panels = NoPanels;
//!
//! ctx.begin_tick(1.0 / 60.0, &Options);
//! let moved = ctx.invoke(CallSite::MoveActions, FnOperation::new(|| 2 + 2));
//! assert_eq!(moved, Some(4));
//! ctx.end_tick(1.0 / 60.0, SceneStats::default(), &mut panels);
//!
//! assert_eq!(ctx.tick(), TickId(1));
//! assert!(ctx.is_enabled());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `perfix-core` | IDs, options, categories, clocks, capability traits |
//! | [`engine`] | `perfix-engine` | Gate, timing, metrics, reports and the tick context |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`perfix-core`).
///
/// Contains the option set ([`types::OptionKey`], [`types::ConfigSnapshot`]),
/// timing [`types::Category`] values, the [`types::MonotonicClock`]
/// abstraction and the host capability traits ([`types::Operation`],
/// [`types::DisplaySurface`], [`types::ConfigSource`]).
pub use perfix_core as types;

/// Profiler engine (`perfix-engine`).
///
/// [`engine::ProfilerContext`] drives one host loop. The building blocks it
/// owns ([`engine::ThrottleGate`], [`engine::TimingAggregator`],
/// [`engine::SpikeDetector`], [`engine::ReportFormatter`]) are usable on
/// their own.
pub use perfix_engine as engine;

/// Common imports for typical Perfix usage.
///
/// ```rust
/// use perfix::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use perfix_core::{
        CallAttrs, Category, ConfigSnapshot, ConfigSource, DisplaySurface, FnOperation,
        HostEffect, MonotonicClock, OptionKey, Operation, SystemClock, TickId, TriggerKind,
    };

    // Engine
    pub use perfix_engine::{
        CallSite, Counter, Grade, IntervalMetrics, ProfilerConfig, ProfilerContext, SceneStats,
        SectionBounds, SpikeStatus, ThrottleDecision,
    };

    // Errors
    pub use perfix_core::ParseOptionError;
    pub use perfix_engine::ConfigError;
}
