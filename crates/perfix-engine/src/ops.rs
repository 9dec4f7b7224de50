//! Decorator chain around wrapped operations.
//!
//! A host call becomes `Gated(Timed(Bare(op)))`: the gate decides first,
//! the timer measures only a call that actually ran, and the bare layer
//! runs the [`Operation`]. Each layer forwards [`attrs`](Invoke::attrs)
//! and [`apply`](Invoke::apply) down to the operation.

use perfix_core::{CallAttrs, HostEffect, Operation};

use crate::context::ProfilerContext;
use crate::sites::{CallSite, TimingSpec};

/// One layer of the wrapper chain.
pub trait Invoke {
    /// Value produced by the wrapped operation.
    type Output;

    /// Run this layer. `None` means the call was skipped.
    fn invoke(&mut self, ctx: &mut ProfilerContext) -> Option<Self::Output>;

    /// Attributes of the wrapped operation.
    fn attrs(&self) -> CallAttrs;

    /// Forward a gate side effect to the wrapped operation.
    fn apply(&mut self, effect: HostEffect);

    /// Wrap in a timing layer.
    fn timed(self, spec: Option<TimingSpec>) -> Timed<Self>
    where
        Self: Sized,
    {
        Timed { inner: self, spec }
    }

    /// Wrap in a gate layer for `site`.
    fn gated(self, site: CallSite) -> Gated<Self>
    where
        Self: Sized,
    {
        Gated { inner: self, site }
    }
}

/// Innermost layer: runs the operation unconditionally.
pub struct Bare<O>(pub O);

impl<O: Operation> Invoke for Bare<O> {
    type Output = O::Output;

    #[inline]
    fn invoke(&mut self, _ctx: &mut ProfilerContext) -> Option<O::Output> {
        Some(self.0.run())
    }

    fn attrs(&self) -> CallAttrs {
        self.0.attrs()
    }

    fn apply(&mut self, effect: HostEffect) {
        self.0.apply(effect);
    }
}

/// Measures the inner layer into a timing category.
///
/// Nothing is recorded when the inner layer skipped.
pub struct Timed<I> {
    inner: I,
    spec: Option<TimingSpec>,
}

impl<I: Invoke> Invoke for Timed<I> {
    type Output = I::Output;

    fn invoke(&mut self, ctx: &mut ProfilerContext) -> Option<I::Output> {
        let Some(spec) = self.spec else {
            return self.inner.invoke(ctx);
        };
        let guard = ctx.begin_timing();
        let out = self.inner.invoke(ctx);
        if out.is_some() {
            ctx.end_timing(guard, spec);
        } else {
            drop(guard);
        }
        out
    }

    fn attrs(&self) -> CallAttrs {
        self.inner.attrs()
    }

    fn apply(&mut self, effect: HostEffect) {
        self.inner.apply(effect);
    }
}

/// Consults the throttle gate before running the inner layer.
pub struct Gated<I> {
    inner: I,
    site: CallSite,
}

impl<I: Invoke> Invoke for Gated<I> {
    type Output = I::Output;

    fn invoke(&mut self, ctx: &mut ProfilerContext) -> Option<I::Output> {
        let verdict = ctx.decide(self.site, self.inner.attrs());
        for effect in &verdict.effects {
            self.inner.apply(*effect);
        }
        if verdict.decision.runs() {
            self.inner.invoke(ctx)
        } else {
            None
        }
    }

    fn attrs(&self) -> CallAttrs {
        self.inner.attrs()
    }

    fn apply(&mut self, effect: HostEffect) {
        self.inner.apply(effect);
    }
}

/// The standard chain for `site`: gate, then the site's timing, then `op`.
pub fn chain<O: Operation>(site: CallSite, op: O) -> Gated<Timed<Bare<O>>> {
    Bare(op).timed(site.policy().timing).gated(site)
}
