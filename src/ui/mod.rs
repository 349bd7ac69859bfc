//! Terminal User Interface module.
//!
//! This module provides the TUI for the video feed, including:
//! - Main event loop (`run`)
//! - Keyboard and mouse-wheel input handling
//! - Feed card rendering with snap scrolling
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `feed` - Vertical feed card widget
//! - `status` - Status bar widget
//! - `help` - Help overlay widget

mod events;
mod feed;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
