use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateSet, CatalogEntry, MoodSet},
    services::{
        catalog::{SearchFilters, VideoCatalog},
        duration::DurationBand,
    },
};

/// Results requested from the catalog for each mood
pub const PER_QUERY_RESULTS: usize = 15;

/// Turns a mood label into a search query: everything but letters, digits
/// and spaces is dropped. Falls back to the raw label if nothing is left.
pub fn mood_query(label: &str) -> String {
    let stripped: String = label
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect();
    let stripped = stripped.trim();

    if stripped.is_empty() {
        label.to_string()
    } else {
        stripped.to_string()
    }
}

/// Builds the candidate set for a request
///
/// One search per mood, all issued concurrently and joined in mood order, so
/// the merge is deterministic: mood order first, then each query's result
/// order. A failing mood query is logged and skipped.
///
/// Errors:
/// - the first query error, when every query failed
/// - `NoCandidates`, when queries succeeded but nothing usable came back
pub async fn aggregate_candidates(
    catalog: Arc<dyn VideoCatalog>,
    moods: &MoodSet,
    band: DurationBand,
) -> AppResult<CandidateSet> {
    let filters =
        SearchFilters::new(PER_QUERY_RESULTS).with_duration(band.min_seconds, band.max_seconds);

    let mut tasks = Vec::with_capacity(moods.len());
    for mood in moods.iter() {
        let catalog = Arc::clone(&catalog);
        let query = mood_query(mood);
        let task = tokio::spawn(async move { catalog.search(&query, &filters).await });
        tasks.push((mood.clone(), task));
    }

    let mut results = Vec::with_capacity(tasks.len());
    let mut errors = Vec::new();

    for (mood, task) in tasks {
        match task.await {
            Ok(Ok(entries)) => {
                tracing::debug!(mood = %mood, results = entries.len(), "Mood search completed");
                results.push(entries);
            }
            Ok(Err(e)) => {
                tracing::warn!(mood = %mood, error = %e, "Mood search failed, skipping");
                errors.push(e);
            }
            Err(e) => {
                tracing::error!(mood = %mood, error = %e, "Mood search task join error");
                errors.push(AppError::Internal(e.to_string()));
            }
        }
    }

    let succeeded = results.len();
    let candidates = merge_results(results, band);

    if !errors.is_empty() {
        tracing::warn!(
            success_count = succeeded,
            error_count = errors.len(),
            "Partial mood search failure"
        );
    }

    if candidates.is_empty() {
        if succeeded == 0 {
            if let Some(first) = errors.into_iter().next() {
                return Err(first);
            }
        }
        return Err(AppError::NoCandidates);
    }

    tracing::info!(
        moods = moods.len(),
        candidates = candidates.len(),
        "Candidate set built"
    );

    Ok(candidates)
}

/// Merges per-query results in order, keeping the first entry seen for each
/// id, dropping entries outside the band and stopping at the set's cap
pub fn merge_results<I>(results: I, band: DurationBand) -> CandidateSet
where
    I: IntoIterator<Item = Vec<CatalogEntry>>,
{
    let mut candidates = CandidateSet::new();

    'merge: for entries in results {
        for entry in entries {
            if candidates.is_full() {
                break 'merge;
            }
            if !band.contains(entry.duration_seconds) {
                tracing::debug!(
                    video_id = %entry.id,
                    duration_seconds = entry.duration_seconds,
                    "Dropping candidate outside duration band"
                );
                continue;
            }
            candidates.insert(entry);
        }
    }

    candidates
}
