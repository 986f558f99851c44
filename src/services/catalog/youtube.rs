//! YouTube Data API v3 catalog
//!
//! API Flow:
//! 1. Search: /search?part=id → relevance-ordered video ids
//! 2. Metadata: /videos?part=snippet,contentDetails,statistics → up to 50 ids per call
//!
//! Search costs 100 quota units per call, so hit lists are cached when a
//! cache is configured.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CatalogEntry, VideoId, YouTubeErrorResponse, YouTubeSearchResponse, YouTubeVideo,
        YouTubeVideoListResponse,
    },
    services::{
        catalog::{iso8601, SearchFilters, VideoCatalog, MAX_IDS_PER_CALL},
        duration::DurationBucket,
    },
};
use reqwest::{Client as HttpClient, StatusCode};
use std::collections::HashMap;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const VIDEO_CACHE_TTL: u64 = 86400; // 1 day
const VIDEO_PARTS: &str = "snippet,contentDetails,statistics";

/// Error reasons that mean the key or its quota is the problem, not the request
const CREDENTIAL_REASONS: &[&str] = &[
    "quotaExceeded",
    "dailyLimitExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "keyInvalid",
    "keyExpired",
    "accessNotConfigured",
    "ipRefererBlocked",
    "forbidden",
];

#[derive(Clone)]
pub struct YouTubeCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl YouTubeCatalog {
    pub fn new(cache: Option<Cache>, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Runs the search call and returns video ids in relevance order
    async fn search_ids(&self, query: &str, filters: &SearchFilters) -> AppResult<Vec<String>> {
        let url = format!("{}/search", self.api_url);
        let max_results = filters.fetch_size().to_string();

        let mut params = vec![
            ("part", "id"),
            ("type", "video"),
            ("order", "relevance"),
            ("q", query),
            ("maxResults", max_results.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(max_seconds) = filters.max_seconds {
            params.push(("videoDuration", DurationBucket::from_seconds(max_seconds).as_str()));
        }

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;

        let results: YouTubeSearchResponse = response.json().await.map_err(|e| {
            AppError::CatalogRequest(format!("Malformed YouTube search response: {}", e))
        })?;

        let ids: Vec<String> = results
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();

        tracing::debug!(query = %query, hits = ids.len(), "YouTube search returned ids");

        Ok(ids)
    }

    /// Fetches metadata for at most [`MAX_IDS_PER_CALL`] ids in one call.
    /// Videos with unusable metadata are skipped.
    async fn fetch_videos(&self, ids: &[String]) -> AppResult<Vec<CatalogEntry>> {
        let url = format!("{}/videos", self.api_url);
        let joined = ids.join(",");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", VIDEO_PARTS),
                ("id", joined.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;

        let list: YouTubeVideoListResponse = response.json().await.map_err(|e| {
            AppError::CatalogRequest(format!("Malformed YouTube videos response: {}", e))
        })?;

        Ok(parse_video_items(list.items))
    }

    async fn fetch_one(&self, id: &VideoId) -> AppResult<CatalogEntry> {
        self.fetch_videos(&[id.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }
}

#[async_trait::async_trait]
impl VideoCatalog for YouTubeCatalog {
    async fn search(&self, query: &str, filters: &SearchFilters) -> AppResult<Vec<CatalogEntry>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let key = CacheKey::VideoSearch {
            query: query.to_string(),
            bucket: filters.max_seconds.map(DurationBucket::from_seconds),
            hits: filters.fetch_size(),
        };
        let ids: Vec<String> = cached!(
            self.cache.as_ref(),
            key,
            SEARCH_CACHE_TTL,
            self.search_ids(query, filters)
        )?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let fetched = self.fetch_videos(&ids).await?;
        let fetched_count = fetched.len();

        let rank: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut entries: Vec<CatalogEntry> = fetched
            .into_iter()
            .filter(|entry| filters.accepts_duration(entry.duration_seconds))
            .collect();
        entries.sort_by_key(|entry| rank.get(entry.id.as_str()).copied().unwrap_or(usize::MAX));
        entries.truncate(filters.max_results);

        tracing::info!(
            query = %query,
            hits = ids.len(),
            fetched = fetched_count,
            results = entries.len(),
            provider = self.name(),
            "Video search completed"
        );

        Ok(entries)
    }

    async fn fetch_by_id(&self, id: &str) -> AppResult<CatalogEntry> {
        let id = VideoId::parse(id)?;

        cached!(
            self.cache.as_ref(),
            CacheKey::Video(id.to_string()),
            VIDEO_CACHE_TTL,
            self.fetch_one(&id)
        )
    }

    async fn fetch_batch(&self, ids: &[VideoId]) -> Vec<CatalogEntry> {
        let mut entries = Vec::with_capacity(ids.len());
        let mut failed_chunks = 0;

        for chunk in ids.chunks(MAX_IDS_PER_CALL) {
            let chunk_ids: Vec<String> = chunk.iter().map(|id| id.to_string()).collect();
            match self.fetch_videos(&chunk_ids).await {
                Ok(found) => entries.extend(found),
                Err(e) => {
                    failed_chunks += 1;
                    tracing::warn!(
                        error = %e,
                        chunk_size = chunk.len(),
                        "Metadata chunk failed, continuing with remaining ids"
                    );
                }
            }
        }

        tracing::info!(
            requested = ids.len(),
            resolved = entries.len(),
            failed_chunks = failed_chunks,
            provider = self.name(),
            "Batch metadata fetch completed"
        );

        entries
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    AppError::CatalogRequest(format!("Network error talking to YouTube: {}", e))
}

async fn ensure_success(response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(classify_error(status, &body))
}

/// Maps a non-2xx YouTube response to credential/quota or generic failure
fn classify_error(status: StatusCode, body: &str) -> AppError {
    let parsed = serde_json::from_str::<YouTubeErrorResponse>(body).ok();

    let reason = parsed
        .as_ref()
        .and_then(|r| r.error.errors.first())
        .map(|d| d.reason.clone())
        .unwrap_or_default();
    let message = parsed
        .map(|r| r.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let credential_problem = matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    ) || CREDENTIAL_REASONS.contains(&reason.as_str());

    if credential_problem {
        let reason = if reason.is_empty() {
            status.to_string()
        } else {
            reason
        };
        AppError::CatalogUnavailable(format!("{} ({})", message, reason))
    } else {
        AppError::CatalogRequest(format!(
            "YouTube API returned status {}: {}",
            status, message
        ))
    }
}

/// Converts raw `/videos` items, skipping any that fail to deserialize or
/// carry an unparsable duration
fn parse_video_items(items: Vec<serde_json::Value>) -> Vec<CatalogEntry> {
    items
        .into_iter()
        .filter_map(|item| {
            let video: YouTubeVideo = match serde_json::from_value(item) {
                Ok(video) => video,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed video item");
                    return None;
                }
            };
            let video_id = video.id.clone();
            match entry_from_video(video) {
                Ok(entry) => Some(entry),
                Err(reason) => {
                    tracing::debug!(video_id = %video_id, reason = %reason, "Skipping video");
                    None
                }
            }
        })
        .collect()
}

fn entry_from_video(video: YouTubeVideo) -> Result<CatalogEntry, String> {
    let id = VideoId::parse(&video.id).map_err(|e| e.to_string())?;
    let duration_iso = video.content_details.duration;
    let duration_seconds = iso8601::parse_duration(&duration_iso)
        .ok_or_else(|| format!("unparsable duration '{}'", duration_iso))?;

    let thumbnail_url = video
        .snippet
        .thumbnails
        .best_url()
        .map(str::to_string)
        .unwrap_or_else(|| format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id));
    let view_count = video
        .statistics
        .and_then(|s| s.view_count)
        .and_then(|count| count.parse().ok());

    Ok(CatalogEntry {
        id,
        title: video.snippet.title,
        channel_title: video.snippet.channel_title,
        channel_id: video.snippet.channel_id,
        duration: iso8601::format_seconds(duration_seconds),
        duration_iso,
        duration_seconds,
        thumbnail_url,
        published_at: video.snippet.published_at,
        description: video.snippet.description,
        view_count,
    })
}
