use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::AppResult,
    models::{DurationTarget, MoodSet, SuggestionOutcome},
    services::{
        assembler::assemble,
        candidates::aggregate_candidates,
        catalog::VideoCatalog,
        duration,
        oracle::{reconcile, RankingOracle, SelectionRequest},
    },
};

/// Mood + duration → one suggested video
///
/// Holds no per-request state; one instance serves every request.
pub struct SuggestionService {
    catalog: Arc<dyn VideoCatalog>,
    oracle: Arc<dyn RankingOracle>,
}

impl SuggestionService {
    pub fn new(catalog: Arc<dyn VideoCatalog>, oracle: Arc<dyn RankingOracle>) -> Self {
        Self { catalog, oracle }
    }

    /// Runs the full pipeline
    ///
    /// 1. Validate moods and target
    /// 2. Classify the target into a duration band
    /// 3. Search once per mood and merge into a candidate set
    /// 4. Ask the ranking oracle to pick one candidate
    /// 5. Reconcile the pick against the candidate set
    /// 6. Assemble the suggestion from verified catalog data
    pub async fn get_suggestion(
        &self,
        moods: Vec<String>,
        target_minutes: u32,
    ) -> AppResult<SuggestionOutcome> {
        let start = Instant::now();

        let moods = MoodSet::new(moods)?;
        let target = DurationTarget::new(target_minutes)?;
        let (band, bucket) = duration::classify(target.minutes());

        tracing::info!(
            moods = ?moods.labels(),
            target_minutes = target.minutes(),
            min_seconds = band.min_seconds,
            max_seconds = band.max_seconds,
            bucket = %bucket,
            "Starting suggestion pipeline"
        );

        let candidates = aggregate_candidates(Arc::clone(&self.catalog), &moods, band).await?;

        let request = SelectionRequest::new(&moods, target, &candidates);
        let response = self.oracle.select(&request).await?;

        let reconciled = reconcile(response, &candidates, &moods, target)?;
        let suggestion = assemble(&reconciled.entry, reconciled.selection);

        tracing::info!(
            video_id = %suggestion.video_id,
            degraded = reconciled.degraded,
            candidates = candidates.len(),
            catalog = self.catalog.name(),
            oracle = self.oracle.name(),
            processing_time_ms = start.elapsed().as_millis(),
            "Suggestion ready"
        );

        Ok(SuggestionOutcome {
            suggestion,
            degraded: reconciled.degraded,
            candidate_count: candidates.len(),
        })
    }
}
