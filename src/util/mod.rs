//! Utility functions for common operations.
//!
//! - **Text**: Unicode-aware width calculation and truncation for card
//!   rendering in the terminal
//! - **Time**: playback timestamps and human-readable video ages

mod text;
mod time;

pub use text::{display_width, truncate_to_width};
pub use time::{format_age, format_timestamp};
