//! JSON wire protocol spoken over each client's message stream.
//!
//! Every frame is a JSON object whose `type` field selects the message kind;
//! field names are camelCase. [`client`] covers inbound decoding and
//! [`server`] the events the runtime emits.

pub mod client;
pub mod server;

pub use client::{ClientMessage, ExternalKind, ProtocolError, decode};
pub use server::{PlayerView, ServerMessage};
