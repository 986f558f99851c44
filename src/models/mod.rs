use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, collections::HashMap, fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod suggestion;

pub use suggestion::{
    DurationTarget, MoodSet, SelectionResult, Suggestion, SuggestionOutcome,
};

/// Canonical base for watch links; the video id is appended as the `v` parameter
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch";

/// Identifier of a catalog video (e.g., "dQw4w9WgXcQ")
///
/// Always exactly 11 characters from `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    pub const LEN: usize = 11;

    /// Validates the fixed id format without touching the network
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let valid = raw.len() == Self::LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::InvalidIdentity(format!(
                "'{}' is not an {}-character video id",
                raw,
                Self::LEN
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video
    pub fn watch_url(&self) -> String {
        format!("{}?v={}", WATCH_URL_BASE, self.0)
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VideoId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl Borrow<str> for VideoId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Verified metadata snapshot for one catalog video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: VideoId,
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    /// Raw ISO-8601 duration as reported by the catalog, e.g. "PT12M5S"
    pub duration_iso: String,
    pub duration_seconds: u32,
    /// Display duration, "M:SS" or "H:MM:SS"
    pub duration: String,
    pub thumbnail_url: String,
    pub published_at: DateTime<Utc>,
    pub description: String,
    pub view_count: Option<u64>,
}

/// Deduplicated candidates in aggregation order
///
/// Insertion order is kept: the first entry is the fallback pick when the
/// ranking oracle names a video that is not in the set.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    entries: Vec<CatalogEntry>,
    index: HashMap<VideoId, usize>,
}

impl CandidateSet {
    pub const MAX_SIZE: usize = 20;

    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry unless its id is already present or the set is full.
    /// Returns whether the entry was added.
    pub fn insert(&mut self, entry: CatalogEntry) -> bool {
        if self.is_full() || self.index.contains_key(&entry.id) {
            return false;
        }
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn first(&self) -> Option<&CatalogEntry> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= Self::MAX_SIZE
    }
}

// ============================================================================
// YouTube Data API Types
// ============================================================================

/// Response from GET /search
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YouTubeSearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSearchItem {
    pub id: YouTubeSearchItemId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSearchItemId {
    /// Absent for channel and playlist hits
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Response from GET /videos. Items are kept raw so a single malformed
/// video does not fail the whole page.
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeVideoListResponse {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeVideo {
    pub id: String,
    pub snippet: YouTubeSnippet,
    pub content_details: YouTubeContentDetails,
    #[serde(default)]
    pub statistics: Option<YouTubeStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSnippet {
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: YouTubeThumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YouTubeThumbnails {
    #[serde(default)]
    pub high: Option<YouTubeThumbnail>,
    #[serde(default)]
    pub medium: Option<YouTubeThumbnail>,
    #[serde(default)]
    pub default: Option<YouTubeThumbnail>,
}

impl YouTubeThumbnails {
    /// Highest resolution thumbnail that is present
    pub fn best_url(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeContentDetails {
    pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeStatistics {
    /// YouTube encodes counts as decimal strings
    #[serde(default)]
    pub view_count: Option<String>,
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeErrorResponse {
    pub error: YouTubeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<YouTubeErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeErrorDetail {
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Builds a valid 11-character id from a short tag, e.g. "a" -> "aaaaaaaaaaa"
    pub fn video_id(tag: &str) -> VideoId {
        let mut raw: String = tag.chars().cycle().take(VideoId::LEN).collect();
        raw.truncate(VideoId::LEN);
        VideoId::parse(&raw).unwrap()
    }

    pub fn entry(tag: &str, duration_seconds: u32) -> CatalogEntry {
        let minutes = duration_seconds / 60;
        let seconds = duration_seconds % 60;
        CatalogEntry {
            id: video_id(tag),
            title: format!("Video {}", tag),
            channel_title: format!("Channel {}", tag),
            channel_id: format!("UC{}", tag),
            duration_iso: format!("PT{}M{}S", minutes, seconds),
            duration_seconds,
            duration: format!("{}:{:02}", minutes, seconds),
            thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", tag),
            published_at: Utc.with_ymd_and_hms(2023, 4, 1, 12, 0, 0).unwrap(),
            description: format!("About {}", tag),
            view_count: Some(1_234),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::entry;
    use super::*;

    #[test]
    fn test_video_id_accepts_valid_format() {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(format!("{}", id), "dQw4w9WgXcQ");

        assert!(VideoId::parse("a-b_c-d_e-f").is_ok());
    }

    #[test]
    fn test_video_id_rejects_wrong_length() {
        assert!(matches!(
            VideoId::parse("short"),
            Err(AppError::InvalidIdentity(_))
        ));
        assert!(matches!(
            VideoId::parse("dQw4w9WgXcQx"),
            Err(AppError::InvalidIdentity(_))
        ));
        assert!(VideoId::parse("").is_err());
    }

    #[test]
    fn test_video_id_rejects_foreign_characters() {
        assert!(VideoId::parse("dQw4w9WgXc!").is_err());
        assert!(VideoId::parse("dQw4w9 gXcQ").is_err());
        // 11 characters but multi-byte
        assert!(VideoId::parse("dQw4w9WgXcé").is_err());
    }

    #[test]
    fn test_video_id_watch_url() {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_video_id_serde_is_transparent_and_validated() {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""dQw4w9WgXcQ""#);

        let back: VideoId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<VideoId>(r#""nope""#).is_err());
    }

    #[test]
    fn test_candidate_set_dedupes_keeping_first() {
        let mut set = CandidateSet::new();
        let mut first = entry("a", 900);
        first.title = "First seen".to_string();
        let mut second = entry("a", 900);
        second.title = "Second seen".to_string();

        assert!(set.insert(first));
        assert!(!set.insert(second));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("aaaaaaaaaaa").unwrap().title, "First seen");
    }

    #[test]
    fn test_candidate_set_caps_size() {
        let mut set = CandidateSet::new();
        let tags = "abcdefghijklmnopqrstuvwxyz";
        for tag in tags.chars() {
            set.insert(entry(&tag.to_string(), 900));
        }

        assert_eq!(set.len(), CandidateSet::MAX_SIZE);
        assert!(set.is_full());
        assert_eq!(set.first().unwrap().id.as_str(), "aaaaaaaaaaa");
        assert!(!set.contains("zzzzzzzzzzz"));
    }

    #[test]
    fn test_thumbnails_prefer_high_resolution() {
        let thumbs: YouTubeThumbnails = serde_json::from_str(
            r#"{
                "default": {"url": "https://i.ytimg.com/d.jpg"},
                "medium": {"url": "https://i.ytimg.com/m.jpg"}
            }"#,
        )
        .unwrap();
        assert_eq!(thumbs.best_url(), Some("https://i.ytimg.com/m.jpg"));
        assert_eq!(YouTubeThumbnails::default().best_url(), None);
    }

    #[test]
    fn test_youtube_video_deserialization() {
        let json = r#"{
            "kind": "youtube#video",
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "publishedAt": "2009-10-25T06:57:33Z",
                "channelId": "UCuAXFkgsw1L7xaCfnd5JJOw",
                "title": "Never Gonna Give You Up",
                "description": "The official video",
                "channelTitle": "Rick Astley",
                "thumbnails": {"high": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"}}
            },
            "contentDetails": {"duration": "PT3M33S"},
            "statistics": {"viewCount": "1500000000"}
        }"#;

        let video: YouTubeVideo = serde_json::from_str(json).unwrap();
        assert_eq!(video.id, "dQw4w9WgXcQ");
        assert_eq!(video.snippet.channel_title, "Rick Astley");
        assert_eq!(video.content_details.duration, "PT3M33S");
        assert_eq!(
            video.statistics.unwrap().view_count.as_deref(),
            Some("1500000000")
        );
    }

    #[test]
    fn test_search_item_without_video_id() {
        let json = r#"{"items": [
            {"id": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"}},
            {"id": {"kind": "youtube#channel", "channelId": "UC123"}}
        ]}"#;

        let response: YouTubeSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(
            response.items[0].id.video_id.as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(response.items[1].id.video_id, None);
    }
}
