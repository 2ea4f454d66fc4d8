//! Configuration types
//!
//! Board-agnostic configuration structures supplied by the host settings
//! store and read-only after load.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
