//! Feed API client for the short-video platform.
//!
//! The platform backend owns all persistence (videos, users, likes,
//! comments); this client consumes exactly one surface of it: the paginated
//! video feed. Pages are cursor-based — the server hands back an opaque
//! timestamp-like token plus a `hasNextPage` flag that gates whether the UI
//! should ever ask for more.

mod client;
mod types;

pub use client::{FeedApiError, FeedClient};
pub use types::{FeedPage, VideoAuthor, VideoItem};
