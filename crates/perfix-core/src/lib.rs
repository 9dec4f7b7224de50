//! Core types and traits for the Perfix frame profiler.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the controller and its hosts: tick identifiers,
//! the enumerated option set, timing categories, the clock abstraction,
//! and the capability traits for wrapped operations and display surfaces.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod call;
pub mod category;
pub mod clock;
pub mod error;
pub mod id;
pub mod options;
pub mod traits;

pub use call::{CallAttrs, HostEffect, TriggerKind};
pub use category::{Accumulation, Category};
pub use clock::{elapsed_ms, ms_to_duration, MonotonicClock, SystemClock};
pub use error::ParseOptionError;
pub use id::TickId;
pub use options::{ConfigSnapshot, ConfigSource, OptionKey};
pub use traits::{DisplaySurface, FnOperation, Operation};
