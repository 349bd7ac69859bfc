//! Wire types for the video feed API.
//!
//! Field names mirror the platform's JSON (camelCase). The cursor is
//! deliberately kept as an uninterpreted `String`: the server encodes a
//! timestamp in it today, but the client treats it as opaque and only ever
//! echoes it back.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Author record embedded in each video.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAuthor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// One video in the feed, newest-first as served.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Playback URL; the TUI only ever opens this in an external browser.
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Duration in seconds, when the backend knows it.
    #[serde(default)]
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub user: VideoAuthor,
}

/// One page of the feed plus the pagination contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub videos: Vec<VideoItem>,
    /// Opaque token to pass back for the next page. `None` on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// False once the feed is exhausted; no further requests should be made.
    #[serde(default)]
    pub has_next_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_page_deserializes_camel_case() {
        let json = r#"{
            "videos": [{
                "id": "vid-1",
                "title": "First clip",
                "description": "hello",
                "url": "https://cdn.example.com/vid-1.mp4",
                "thumbnail": null,
                "duration": 12.5,
                "createdAt": "2024-03-01T12:00:00Z",
                "user": { "id": "u1", "name": "Ada", "image": null }
            }],
            "nextCursor": "2024-03-01T12:00:00.000Z",
            "hasNextPage": true
        }"#;

        let page: FeedPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.videos.len(), 1);
        assert_eq!(page.videos[0].id, "vid-1");
        assert_eq!(page.videos[0].user.name, "Ada");
        assert_eq!(page.videos[0].duration, Some(12.5));
        assert_eq!(page.next_cursor.as_deref(), Some("2024-03-01T12:00:00.000Z"));
        assert!(page.has_next_page);
    }

    #[test]
    fn test_last_page_defaults() {
        // Server omits cursor fields on the final page.
        let json = r#"{ "videos": [] }"#;
        let page: FeedPage = serde_json::from_str(json).unwrap();
        assert!(page.videos.is_empty());
        assert!(page.next_cursor.is_none());
        assert!(!page.has_next_page);
    }
}
