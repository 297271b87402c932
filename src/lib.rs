pub mod card;
pub mod config;
pub mod core;
pub mod gesture;
pub mod host;
pub mod message;
pub mod sync;

/// Version reported in the registry banner.
pub const CARD_VERSION: &str = env!("CARGO_PKG_VERSION");
