use serde::Serialize;
use std::fmt::Display;

/// Accepted video length window in seconds, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationBand {
    pub min_seconds: u32,
    pub max_seconds: u32,
}

/// Shortest video ever accepted, regardless of target
const MIN_BAND_SECONDS: u32 = 60;

impl DurationBand {
    /// Band for a target in minutes: 80% of the target (never under a minute)
    /// up to twice the target.
    ///
    /// No range check happens here; callers validate the target first.
    pub fn for_target(target_minutes: u32) -> Self {
        // 0.8 * 60 = 48 and 2 * 60 = 120, kept integral to avoid float flooring
        let min_seconds = target_minutes.saturating_mul(48).max(MIN_BAND_SECONDS);
        let max_seconds = target_minutes.saturating_mul(120);
        Self {
            min_seconds,
            max_seconds,
        }
    }

    pub fn contains(&self, seconds: u32) -> bool {
        (self.min_seconds..=self.max_seconds).contains(&seconds)
    }

    pub fn bucket(&self) -> DurationBucket {
        DurationBucket::from_seconds(self.max_seconds)
    }
}

/// Coarse length category understood by the catalog's search pre-filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    /// Up to 4 minutes
    Short,
    /// Up to 20 minutes
    Medium,
    /// Longer than 20 minutes
    Long,
}

impl DurationBucket {
    const SHORT_MAX_SECONDS: u32 = 4 * 60;
    const MEDIUM_MAX_SECONDS: u32 = 20 * 60;

    pub fn from_seconds(seconds: u32) -> Self {
        if seconds <= Self::SHORT_MAX_SECONDS {
            DurationBucket::Short
        } else if seconds <= Self::MEDIUM_MAX_SECONDS {
            DurationBucket::Medium
        } else {
            DurationBucket::Long
        }
    }

    /// Value for the YouTube `videoDuration` search parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationBucket::Short => "short",
            DurationBucket::Medium => "medium",
            DurationBucket::Long => "long",
        }
    }
}

impl Display for DurationBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies a target duration into its band and bucket
pub fn classify(target_minutes: u32) -> (DurationBand, DurationBucket) {
    let band = DurationBand::for_target(target_minutes);
    (band, band.bucket())
}
