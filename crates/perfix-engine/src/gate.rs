//! Per-call throttle decisions.
//!
//! [`ThrottleGate::decide`] evaluates a call site's [`GateRule`]s against
//! the current [`ConfigSnapshot`] and tick, before the wrapped operation
//! starts. Every rule except [`GateRule::MinInterval`] is a pure function
//! of `(tick, snapshot, attrs)`; minimum-interval rules keep one last-run
//! marker per `(site, instance)`.

use indexmap::IndexMap;
use perfix_core::{CallAttrs, ConfigSnapshot, HostEffect, OptionKey, TickId, TriggerKind};
use smallvec::SmallVec;
use tracing::trace;

use crate::counters::Counter;
use crate::sites::CallSite;

// ── EveryNth ───────────────────────────────────────────────────────

/// "Run on every Nth tick" predicate.
///
/// A tick hits when `tick % n == phase % n`. `n == 0` and `n == 1` hit
/// every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EveryNth {
    n: u64,
    phase: u64,
}

impl EveryNth {
    /// Predicate hitting ticks congruent to `phase` modulo `n`.
    pub const fn new(n: u64, phase: u64) -> Self {
        Self { n, phase }
    }

    /// Period.
    pub fn period(self) -> u64 {
        self.n
    }

    /// Whether `tick` is on this predicate's phase.
    #[inline]
    pub fn hits(self, tick: TickId) -> bool {
        self.n <= 1 || tick.0 % self.n == self.phase % self.n
    }
}

// ── Rules ──────────────────────────────────────────────────────────

/// Extra per-call condition on a hard-disable rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Applies to every call.
    Always,
    /// Applies only to high-detail targets.
    HighDetail,
    /// Applies only to activations of one trigger kind.
    Trigger(TriggerKind),
}

impl Condition {
    fn matches(self, attrs: &CallAttrs) -> bool {
        match self {
            Self::Always => true,
            Self::HighDetail => attrs.high_detail,
            Self::Trigger(kind) => attrs.trigger == Some(kind),
        }
    }
}

/// One gating rule on a call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateRule {
    /// Flag set and condition holds: skip.
    Disable {
        /// Controlling option.
        flag: OptionKey,
        /// Extra condition on the call.
        when: Condition,
        /// Counter bumped on skip.
        counter: Option<Counter>,
        /// Host effect applied on skip.
        effect: Option<HostEffect>,
    },
    /// Flag set and the tick misses the predicate: skip.
    Periodic {
        /// Controlling option.
        flag: OptionKey,
        /// Ticks on which the call still runs.
        every: EveryNth,
        /// Counter bumped on skip. Pure-rate throttles leave this unset.
        counter: Option<Counter>,
    },
    /// Flag set and fewer than the configured gap of ticks since this
    /// site last ran: skip.
    MinInterval {
        /// Controlling option.
        flag: OptionKey,
    },
    /// Flag set: the call runs, with an extra host effect.
    SideEffect {
        /// Controlling option.
        flag: OptionKey,
        /// Effect applied before the call.
        effect: HostEffect,
    },
    /// Flag is read but has no effect.
    Inert {
        /// Controlling option.
        flag: OptionKey,
    },
}

impl GateRule {
    /// The option this rule consults.
    pub fn flag(&self) -> OptionKey {
        match *self {
            Self::Disable { flag, .. }
            | Self::Periodic { flag, .. }
            | Self::MinInterval { flag }
            | Self::SideEffect { flag, .. }
            | Self::Inert { flag } => flag,
        }
    }
}

// ── Decisions ──────────────────────────────────────────────────────

/// Why a call was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// A hard-disable flag is set.
    Disabled,
    /// A periodic throttle is active and this tick is off-phase.
    Throttled,
    /// A minimum-interval throttle rejected the call.
    TooSoon,
    /// The call's target does not exist this tick.
    Absent,
}

/// Outcome of one gate evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Run the wrapped call.
    Run,
    /// Do not start the wrapped call.
    Skip(SkipReason),
}

impl ThrottleDecision {
    /// Whether the call runs.
    pub fn runs(self) -> bool {
        matches!(self, Self::Run)
    }
}

/// A decision plus the side effects and counter it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateVerdict {
    /// Run or skip.
    pub decision: ThrottleDecision,
    /// Host effects to apply, in order, before the call would start.
    pub effects: SmallVec<[HostEffect; 2]>,
    /// Counter to bump for this skip.
    pub counter: Option<Counter>,
}

impl GateVerdict {
    fn run() -> Self {
        Self {
            decision: ThrottleDecision::Run,
            effects: SmallVec::new(),
            counter: None,
        }
    }

    fn skip(&mut self, reason: SkipReason, counter: Option<Counter>, effect: Option<HostEffect>) {
        self.decision = ThrottleDecision::Skip(reason);
        self.counter = counter;
        self.effects.extend(effect);
    }
}

// ── ThrottleGate ───────────────────────────────────────────────────

/// Evaluates call-site rules and owns minimum-interval markers.
///
/// Markers are keyed by `(site, instance)`. A marker only matters while
/// it is younger than the minimum gap, so [`prune`](Self::prune) drops
/// the rest and the map stays bounded by the instances run in the last
/// `min_gap` ticks.
#[derive(Debug)]
pub struct ThrottleGate {
    min_gap: u64,
    markers: IndexMap<(CallSite, u64), TickId>,
}

impl ThrottleGate {
    /// Create a gate whose minimum-interval rules require `min_gap` ticks
    /// between runs.
    pub fn new(min_gap: u64) -> Self {
        Self {
            min_gap,
            markers: IndexMap::new(),
        }
    }

    /// Decide whether a call at `site` runs during `tick`.
    ///
    /// Absent targets skip without counting. Otherwise rules are tried in
    /// table order and the first skipping rule wins. A minimum-interval
    /// rule that lets the call through records `tick` as its marker.
    pub fn decide(
        &mut self,
        site: CallSite,
        attrs: &CallAttrs,
        snapshot: &ConfigSnapshot,
        tick: TickId,
    ) -> GateVerdict {
        let policy = site.policy();
        let mut verdict = GateVerdict::run();

        if !attrs.target_present {
            verdict.skip(SkipReason::Absent, None, None);
            return verdict;
        }

        for rule in policy.rules {
            if !snapshot.get(rule.flag()) {
                continue;
            }
            match *rule {
                GateRule::Disable {
                    when,
                    counter,
                    effect,
                    ..
                } => {
                    if when.matches(attrs) {
                        verdict.skip(SkipReason::Disabled, counter, effect);
                        return verdict;
                    }
                }
                GateRule::Periodic { every, counter, .. } => {
                    if !every.hits(tick) {
                        verdict.skip(SkipReason::Throttled, counter, None);
                        return verdict;
                    }
                }
                GateRule::MinInterval { .. } => {
                    let key = (site, attrs.instance);
                    if let Some(last) = self.markers.get(&key) {
                        let gap = tick.since(*last);
                        if gap < self.min_gap {
                            trace!(?site, tick = tick.0, last = last.0, gap, "min-interval rejected");
                            verdict.skip(SkipReason::TooSoon, None, None);
                            return verdict;
                        }
                    }
                    self.markers.insert(key, tick);
                }
                GateRule::SideEffect { effect, .. } => verdict.effects.push(effect),
                GateRule::Inert { .. } => {}
            }
        }

        verdict.effects.extend(policy.on_run);
        verdict
    }

    /// Last tick a minimum-interval rule let `(site, instance)` run.
    pub fn last_run(&self, site: CallSite, instance: u64) -> Option<TickId> {
        self.markers.get(&(site, instance)).copied()
    }

    /// Drop markers that can no longer reject a call at `tick` or later.
    pub fn prune(&mut self, tick: TickId) {
        let min_gap = self.min_gap;
        self.markers.retain(|_, last| tick.since(*last) < min_gap);
    }

    /// Live minimum-interval markers.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}
