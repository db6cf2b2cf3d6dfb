//! Topic-based broadcast bus for outbound frames.
//!
//! Connections subscribe to topics and receive every event published there,
//! already encoded as a shared JSON [`Frame`].

mod bus;

pub use bus::{EventBus, Frame, Topic};
