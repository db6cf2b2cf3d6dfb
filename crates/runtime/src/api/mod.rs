//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! transports can stay focused on framing and leave orchestration to workers.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::{Connection, RuntimeHandle};
