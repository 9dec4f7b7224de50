//! Error types shared across the Perfix workspace.
//!
//! The per-tick path never fails; these errors only surface while a host
//! is wiring a configuration backend to the profiler.

use std::error::Error;
use std::fmt;

/// An option name that is not part of the enumerated option set.
///
/// Returned by [`OptionKey::from_str`](crate::OptionKey) when a host
/// backend reports a key the profiler does not know about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptionError {
    /// The unrecognized option name.
    pub name: String,
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option '{}'", self.name)
    }
}

impl Error for ParseOptionError {}
