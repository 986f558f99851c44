use crate::models::{CatalogEntry, SelectionResult, Suggestion};

/// Merges verified catalog metadata with the oracle's text
///
/// Display fields always come from the catalog entry, never from the oracle.
pub fn assemble(entry: &CatalogEntry, selection: SelectionResult) -> Suggestion {
    Suggestion {
        video_id: entry.id.clone(),
        title: entry.title.clone(),
        url: entry.id.watch_url(),
        thumbnail_url: entry.thumbnail_url.clone(),
        channel_title: entry.channel_title.clone(),
        duration: entry.duration.clone(),
        duration_seconds: entry.duration_seconds,
        tags: selection.tags,
        summary: selection.summary,
    }
}
