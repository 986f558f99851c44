//! Ranking oracle adapter
//!
//! The oracle is an external generative model that picks one candidate and
//! writes tags and a summary for it. Everything around it is deterministic:
//! building the request, enforcing the response shape, and reconciling the
//! pick against the candidate set.
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{CandidateSet, CatalogEntry, DurationTarget, MoodSet, SelectionResult},
    services::duration,
};

pub mod openai;
pub mod prompt;

pub use openai::OpenAiOracle;

/// Characters of each candidate description shown to the oracle
pub const DESCRIPTION_PREVIEW_CHARS: usize = 200;
pub const MIN_TAGS: usize = 3;
pub const MAX_TAGS: usize = 5;

/// One candidate as presented to the oracle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    /// 1-based position in the listing
    pub index: usize,
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub duration: String,
    pub description: String,
}

/// Everything the oracle needs to make a pick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRequest {
    pub moods: Vec<String>,
    pub target_minutes: u32,
    pub candidates: Vec<CandidateSummary>,
}

impl SelectionRequest {
    pub fn new(moods: &MoodSet, target: DurationTarget, candidates: &CandidateSet) -> Self {
        let candidates = candidates
            .iter()
            .enumerate()
            .map(|(i, entry)| CandidateSummary {
                index: i + 1,
                video_id: entry.id.to_string(),
                title: entry.title.clone(),
                channel_title: entry.channel_title.clone(),
                duration: entry.duration.clone(),
                description: entry
                    .description
                    .chars()
                    .take(DESCRIPTION_PREVIEW_CHARS)
                    .collect(),
            })
            .collect();

        Self {
            moods: moods.labels().to_vec(),
            target_minutes: target.minutes(),
            candidates,
        }
    }
}

/// Structured output expected from the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleResponse {
    pub selected_video_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// Trait for ranking oracles
///
/// Implementations pick one of `request.candidates`; they are not trusted to
/// do so, see [`reconcile`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RankingOracle: Send + Sync {
    async fn select(&self, request: &SelectionRequest) -> AppResult<OracleResponse>;

    /// Oracle name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Parses the oracle's raw JSON output, rejecting anything without a pick
pub fn parse_response(content: &str) -> AppResult<OracleResponse> {
    let response: OracleResponse = serde_json::from_str(content.trim()).map_err(|e| {
        AppError::OracleResponseInvalid(format!("could not parse selection: {}", e))
    })?;

    if response.selected_video_id.trim().is_empty() {
        return Err(AppError::OracleResponseInvalid(
            "selection is missing a video id".to_string(),
        ));
    }

    Ok(response)
}

/// Oracle pick bound back to verified catalog data
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub entry: CatalogEntry,
    pub selection: SelectionResult,
    /// The oracle's pick was not a candidate; the first candidate was used
    pub degraded: bool,
}

/// Binds the oracle's pick to a candidate
///
/// An id outside the candidate set does not fail the request: the first
/// candidate in aggregation order is used and the result is marked degraded.
/// Tags are normalised to 3..=5 entries and a blank summary is replaced with
/// a generic one.
pub fn reconcile(
    response: OracleResponse,
    candidates: &CandidateSet,
    moods: &MoodSet,
    target: DurationTarget,
) -> AppResult<Reconciled> {
    let selected = response.selected_video_id.trim();

    let (entry, degraded) = match candidates.get(selected) {
        Some(entry) => (entry, false),
        None => {
            let first = candidates.first().ok_or(AppError::NoCandidates)?;
            tracing::warn!(
                selected = %selected,
                fallback = %first.id,
                "Oracle picked a video outside the candidate set, using first candidate"
            );
            (first, true)
        }
    };

    let tags = normalize_tags(response.tags, moods, target);
    let summary = match response.summary.trim() {
        "" => fallback_summary(entry, moods, target),
        summary => summary.to_string(),
    };

    Ok(Reconciled {
        entry: entry.clone(),
        selection: SelectionResult {
            video_id: entry.id.clone(),
            tags,
            summary,
        },
        degraded,
    })
}

/// Trims, dedupes (case-insensitively) and bounds the tag list, padding from
/// the request's own moods and duration when the oracle gave too few
fn normalize_tags(tags: Vec<String>, moods: &MoodSet, target: DurationTarget) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(MAX_TAGS);

    for tag in &tags {
        push_tag(&mut normalized, tag);
    }

    if normalized.len() < MIN_TAGS {
        let (_, bucket) = duration::classify(target.minutes());
        let pool = moods
            .iter()
            .map(|m| m.to_lowercase())
            .chain([
                format!("{} watch", bucket),
                "hidden gem".to_string(),
                "worth your time".to_string(),
            ]);

        for tag in pool {
            if normalized.len() >= MIN_TAGS {
                break;
            }
            push_tag(&mut normalized, &tag);
        }
    }

    normalized
}

fn push_tag(tags: &mut Vec<String>, tag: &str) {
    let tag = tag.trim();
    if tag.is_empty() || tags.len() >= MAX_TAGS {
        return;
    }
    let lowered = tag.to_lowercase();
    if tags.iter().any(|t| t.to_lowercase() == lowered) {
        return;
    }
    tags.push(tag.to_string());
}

fn fallback_summary(entry: &CatalogEntry, moods: &MoodSet, target: DurationTarget) -> String {
    format!(
        "Picked for a {} mood: \"{}\" from {} runs {}, close to your {}-minute window.",
        moods.joined().to_lowercase(),
        entry.title,
        entry.channel_title,
        entry.duration,
        target.minutes()
    )
}
