//! Frame telemetry and adaptive throttling controller.
//!
//! Provides [`ProfilerContext`], which a host integration owns and passes
//! into every wrapped subsystem call. Per tick the context refreshes its
//! cached settings on a timer, samples wall-clock and simulated frame
//! time, gates calls through the [`CallSite`] policy table, times the ones
//! that run, and on a fixed cadence renders report panels to a
//! [`DisplaySurface`](perfix_core::DisplaySurface) before resetting its
//! interval accumulators.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod counters;
pub mod frame;
pub mod gate;
pub mod metrics;
pub mod ops;
pub mod report;
pub mod scene;
pub mod settings;
pub mod sites;
pub mod spike;
pub mod timing;

pub use config::{ConfigError, ProfilerConfig};
pub use context::ProfilerContext;
pub use counters::{Counter, OptimizationCounters};
pub use frame::{FrameClock, FrameTimingState};
pub use gate::{
    Condition, EveryNth, GateRule, GateVerdict, SkipReason, ThrottleDecision, ThrottleGate,
};
pub use metrics::{fps, percentage, IntervalMetrics, IntervalSources};
pub use ops::{chain, Bare, Gated, Invoke, Timed};
pub use report::{DetailPanel, PrimaryPanel, ReportFormatter};
pub use scene::{SceneStats, SectionBounds};
pub use settings::SettingsCache;
pub use sites::{CallPolicy, CallSite, Tally, TimingSpec};
pub use spike::{Grade, SpikeDetector, SpikeStatus};
pub use timing::{CategoryTimings, ScopedTimer, TimingAggregator, TimingGuard};
