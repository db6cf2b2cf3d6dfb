//! Common identifiers used throughout the runtime.

use std::fmt;

/// Identifier of one live client connection.
///
/// Allocated by [`crate::RuntimeHandle::connect`] and never reused within a
/// process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}
