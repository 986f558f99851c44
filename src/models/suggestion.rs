use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::VideoId;

/// Mood labels chosen by the user, in the order they were picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodSet(Vec<String>);

impl MoodSet {
    /// Trims labels and drops blanks and exact duplicates (first one wins).
    /// An empty result is rejected.
    pub fn new<I, S>(labels: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut moods: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || moods.iter().any(|m| m == label) {
                continue;
            }
            moods.push(label.to_string());
        }

        if moods.is_empty() {
            return Err(AppError::InvalidInput(
                "Pick at least one mood".to_string(),
            ));
        }

        Ok(Self(moods))
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human-readable list, e.g. "curious, calm"
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

/// Target viewing time in whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationTarget(u32);

impl DurationTarget {
    pub const MIN_MINUTES: u32 = 5;
    pub const MAX_MINUTES: u32 = 120;

    pub fn new(minutes: u32) -> AppResult<Self> {
        if !(Self::MIN_MINUTES..=Self::MAX_MINUTES).contains(&minutes) {
            return Err(AppError::InvalidInput(format!(
                "Target duration must be between {} and {} minutes, got {}",
                Self::MIN_MINUTES,
                Self::MAX_MINUTES,
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

/// The oracle's pick after reconciliation against the candidate set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub video_id: VideoId,
    /// 3 to 5 short descriptive tags
    pub tags: Vec<String>,
    pub summary: String,
}

/// Final recommendation returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub video_id: VideoId,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
    pub channel_title: String,
    pub duration: String,
    pub duration_seconds: u32,
    pub tags: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionOutcome {
    pub suggestion: Suggestion,
    /// True when the oracle's pick was not a candidate and the first
    /// candidate was used instead
    pub degraded: bool,
    pub candidate_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_set_trims_and_dedupes() {
        let moods = MoodSet::new(["  Curious ", "Calm", "Curious", "", "   "]).unwrap();
        assert_eq!(moods.labels(), &["Curious".to_string(), "Calm".to_string()]);
        assert_eq!(moods.joined(), "Curious, Calm");
    }

    #[test]
    fn test_mood_set_rejects_empty() {
        let empty: Vec<String> = vec![];
        assert!(matches!(
            MoodSet::new(empty),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            MoodSet::new(["", "  "]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_duration_target_bounds() {
        assert_eq!(DurationTarget::new(5).unwrap().minutes(), 5);
        assert_eq!(DurationTarget::new(120).unwrap().minutes(), 120);
        assert!(matches!(
            DurationTarget::new(4),
            Err(AppError::InvalidInput(_))
        ));
        assert!(DurationTarget::new(121).is_err());
        assert!(DurationTarget::new(0).is_err());
    }

    #[test]
    fn test_duration_target_off_step_is_accepted() {
        assert_eq!(DurationTarget::new(17).unwrap().minutes(), 17);
    }
}
