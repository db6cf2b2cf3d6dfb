//! Data-driven world content and loaders.
//!
//! This crate houses the static world content and loads it from data files:
//! - World tuning (data-driven via TOML)
//! - Zone and portal layout (data-driven via RON)
//! - The built-in layout used when no layout file is present
//!
//! Content is consumed when the runtime builds its [`game_core::WorldState`]
//! and never changes afterwards.

pub mod presets;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use presets::builtin_layout;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LayoutLoader};
