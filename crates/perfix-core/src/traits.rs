//! Capability traits at the boundary between the profiler and its host.

use crate::call::{CallAttrs, HostEffect};

/// A wrapped subsystem call.
///
/// The profiler never looks inside `run`; it only decides whether to call
/// it and measures how long it takes. When the call runs, its output is
/// handed back to the host untouched.
pub trait Operation {
    /// Value produced by the call.
    type Output;

    /// Execute the call.
    fn run(&mut self) -> Self::Output;

    /// Facts about this call that gate rules may inspect.
    fn attrs(&self) -> CallAttrs {
        CallAttrs::default()
    }

    /// Apply a side effect requested by the gate. Ignored by default.
    fn apply(&mut self, _effect: HostEffect) {}
}

impl<O: Operation + ?Sized> Operation for &mut O {
    type Output = O::Output;

    fn run(&mut self) -> Self::Output {
        (**self).run()
    }

    fn attrs(&self) -> CallAttrs {
        (**self).attrs()
    }

    fn apply(&mut self, effect: HostEffect) {
        (**self).apply(effect)
    }
}

/// Adapter turning a closure into an [`Operation`].
pub struct FnOperation<F> {
    f: F,
    attrs: CallAttrs,
}

impl<F> FnOperation<F> {
    /// Wrap `f` with default attributes.
    pub fn new(f: F) -> Self {
        Self {
            f,
            attrs: CallAttrs::default(),
        }
    }

    /// Wrap `f` with explicit attributes.
    pub fn with_attrs(f: F, attrs: CallAttrs) -> Self {
        Self { f, attrs }
    }
}

impl<F, R> Operation for FnOperation<F>
where
    F: FnMut() -> R,
{
    type Output = R;

    fn run(&mut self) -> R {
        (self.f)()
    }

    fn attrs(&self) -> CallAttrs {
        self.attrs
    }
}

/// Text surface receiving rendered report panels.
///
/// Each panel is a single display resource the host creates lazily and
/// mutates in place.
pub trait DisplaySurface {
    /// Replace the primary panel text and make it visible.
    fn show_primary(&mut self, text: &str);

    /// Hide the primary panel.
    fn hide_primary(&mut self);

    /// Replace the detail panel text and make it visible.
    fn show_detail(&mut self, text: &str);

    /// Hide the detail panel.
    fn hide_detail(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_operation_passes_output_through() {
        let mut calls = 0;
        let mut op = FnOperation::new(|| {
            calls += 1;
            0.1_f32 + 0.2_f32
        });
        assert_eq!(op.run(), 0.1_f32 + 0.2_f32);
        assert_eq!(op.run(), 0.1_f32 + 0.2_f32);
        drop(op);
        assert_eq!(calls, 2);
    }

    #[test]
    fn fn_operation_reports_attrs() {
        let op = FnOperation::with_attrs(|| (), CallAttrs::absent());
        assert!(!op.attrs().target_present);
    }
}
