//! flick — a terminal short-video feed browser.
//!
//! Fetches pages of videos from a platform API, renders a vertical
//! snap-scrolling feed of cards, and keeps exactly one item "active" for
//! playback purposes. The interesting part lives in [`controller`]: a
//! single-owner reducer that reconciles scroll samples, viewport
//! visibility transitions, and programmatic navigation into one
//! authoritative active index.

pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod player;
pub mod ui;
pub mod util;
pub mod viewport;
