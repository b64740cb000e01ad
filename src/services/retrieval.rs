//! Best-match selection over k-NN candidates.

use crate::models::{Retrieved, ScoredChunk};

/// Placeholder when a winning candidate has no content field.
pub const MISSING_CONTENT: &str = "No relevant content found.";
/// Placeholder when a winning candidate has no source url.
pub const MISSING_SOURCE: &str = "No source available";

/// Pick the single closest candidate.
///
/// Returns `None` for an empty result set. Ties on distance resolve to the
/// first-listed candidate, so selection is deterministic for a given result
/// order. Absent metadata fields are substituted with fixed placeholders
/// rather than rejected. When `max_distance` is set, a winner farther than
/// the cutoff is treated as not found.
pub fn select_best(results: &[ScoredChunk], max_distance: Option<f32>) -> Option<Retrieved> {
    let mut best: Option<&ScoredChunk> = None;

    for candidate in results {
        match best {
            Some(current) if candidate.distance >= current.distance => {}
            _ => best = Some(candidate),
        }
    }

    let winner = best?;

    if let Some(cutoff) = max_distance
        && winner.distance > cutoff
    {
        return None;
    }

    Some(Retrieved {
        content: winner
            .content
            .clone()
            .unwrap_or_else(|| MISSING_CONTENT.to_string()),
        source_url: winner
            .url
            .clone()
            .unwrap_or_else(|| MISSING_SOURCE.to_string()),
        distance: winner.distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(distance: f32, url: &str) -> ScoredChunk {
        ScoredChunk {
            distance,
            url: Some(url.to_string()),
            content: Some(format!("content from {url}")),
        }
    }

    #[test]
    fn empty_input_is_not_found() {
        assert_eq!(select_best(&[], None), None);
    }

    #[test]
    fn picks_the_strict_minimum_distance() {
        let results = vec![
            candidate(0.4, "https://a.gov"),
            candidate(0.12, "https://b.gov"),
            candidate(0.3, "https://c.gov"),
        ];
        let winner = select_best(&results, None).unwrap();
        assert_eq!(winner.source_url, "https://b.gov");
        assert_eq!(winner.distance, 0.12);
    }

    #[test]
    fn exact_ties_resolve_to_the_first_listed() {
        let results = vec![
            candidate(0.2, "https://first.gov"),
            candidate(0.2, "https://second.gov"),
        ];
        let winner = select_best(&results, None).unwrap();
        assert_eq!(winner.source_url, "https://first.gov");
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let results = vec![ScoredChunk {
            distance: 0.1,
            url: None,
            content: None,
        }];
        let winner = select_best(&results, None).unwrap();
        assert_eq!(winner.content, MISSING_CONTENT);
        assert_eq!(winner.source_url, MISSING_SOURCE);
    }

    #[test]
    fn no_cutoff_returns_even_poor_matches() {
        let results = vec![candidate(0.97, "https://far.gov")];
        assert!(select_best(&results, None).is_some());
    }

    #[test]
    fn cutoff_turns_distant_winner_into_not_found() {
        let results = vec![candidate(0.97, "https://far.gov")];
        assert_eq!(select_best(&results, Some(0.5)), None);
        assert!(select_best(&results, Some(0.98)).is_some());
    }
}
