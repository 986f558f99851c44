//! Video catalog abstraction
//!
//! The pipeline only talks to the catalog through [`VideoCatalog`], so the
//! concrete metadata source (YouTube today) can be swapped or stubbed.
use crate::{
    error::AppResult,
    models::{CatalogEntry, VideoId},
};

pub mod iso8601;
pub mod youtube;

pub use youtube::YouTubeCatalog;

/// Largest number of ids the catalog resolves in one metadata call
pub const MAX_IDS_PER_CALL: usize = 50;

/// Filters applied to a free-text search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFilters {
    pub max_results: usize,
    pub min_seconds: Option<u32>,
    pub max_seconds: Option<u32>,
}

impl SearchFilters {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            min_seconds: None,
            max_seconds: None,
        }
    }

    pub fn with_duration(mut self, min_seconds: u32, max_seconds: u32) -> Self {
        self.min_seconds = Some(min_seconds);
        self.max_seconds = Some(max_seconds);
        self
    }

    /// Whether a duration falls inside the bounds; a missing bound is open
    pub fn accepts_duration(&self, seconds: u32) -> bool {
        self.min_seconds.map_or(true, |min| seconds >= min)
            && self.max_seconds.map_or(true, |max| seconds <= max)
    }

    /// Raw hits to request so enough survive duration filtering
    pub fn fetch_size(&self) -> usize {
        (self.max_results * 2).min(MAX_IDS_PER_CALL)
    }
}

/// Trait for video metadata sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Search videos by free text
    ///
    /// Returns at most `filters.max_results` entries in relevance order, all
    /// within the duration bounds. Entries whose metadata cannot be parsed are
    /// skipped rather than failing the search.
    async fn search(&self, query: &str, filters: &SearchFilters) -> AppResult<Vec<CatalogEntry>>;

    /// Fetch one video by id
    ///
    /// Fails with `InvalidIdentity` for malformed ids and `NotFound` for
    /// deleted, private or unknown videos.
    async fn fetch_by_id(&self, id: &str) -> AppResult<CatalogEntry>;

    /// Fetch many videos, best effort
    ///
    /// Ids that do not resolve are omitted. A failing chunk is logged and the
    /// remaining chunks are still fetched.
    async fn fetch_batch(&self, ids: &[VideoId]) -> Vec<CatalogEntry>;

    /// Catalog name for logging and debugging
    fn name(&self) -> &'static str;
}
