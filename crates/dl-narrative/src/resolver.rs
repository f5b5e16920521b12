//! Companion name resolution with fuzzy matching.

use dl_core::{CompanionId, GameState};
use strsim::jaro_winkler;

/// Minimum similarity score for fuzzy matching (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// Resolve a companion name to an ID using exact or fuzzy matching.
///
/// Inactive companions resolve too, so callers can say why they can't talk.
pub fn resolve_companion(state: &GameState, input: &str) -> Option<CompanionId> {
    // Try exact match first (case-insensitive)
    if let Some(companion) = state.find_companion(input.trim()) {
        return Some(companion.id);
    }

    let candidates = fuzzy_match(state, input, FUZZY_THRESHOLD);
    candidates.first().map(|(id, _)| *id)
}

/// Find companions matching the input with a similarity score above the threshold.
///
/// Returns a list of (CompanionId, score) sorted by score descending.
pub fn fuzzy_match(state: &GameState, input: &str, threshold: f64) -> Vec<(CompanionId, f64)> {
    let input_lower = input.trim().to_lowercase();
    let mut matches: Vec<(CompanionId, f64)> = state
        .companions()
        .iter()
        .filter_map(|companion| {
            let name_lower = companion.name.to_lowercase();
            let score = jaro_winkler(&input_lower, &name_lower);
            (score >= threshold).then_some((companion.id, score))
        })
        .collect();

    matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

/// Suggest active companion names that start with or contain the partial input.
pub fn suggest_companions(state: &GameState, partial: &str, limit: usize) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut suggestions: Vec<(String, f64)> = state
        .active_companions()
        .filter_map(|companion| {
            let name_lower = companion.name.to_lowercase();
            if name_lower.starts_with(&partial_lower) {
                Some((companion.name.clone(), 2.0))
            } else if name_lower.contains(&partial_lower) {
                Some((companion.name.clone(), 1.0))
            } else {
                let score = jaro_winkler(&partial_lower, &name_lower);
                (score >= 0.6).then(|| (companion.name.clone(), score))
            }
        })
        .collect();

    suggestions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    suggestions
        .into_iter()
        .take(limit)
        .map(|(name, _)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_core::SessionMeta;

    fn state() -> GameState {
        GameState::new(SessionMeta::new("Test", 1), 4)
    }

    fn name_of(state: &GameState, id: CompanionId) -> &str {
        &state.companion(id).unwrap().name
    }

    #[test]
    fn exact_match() {
        let s = state();
        let id = resolve_companion(&s, "Sister Ruth").unwrap();
        assert_eq!(name_of(&s, id), "Sister Ruth");
    }

    #[test]
    fn case_insensitive_match() {
        let s = state();
        let id = resolve_companion(&s, "  marcus ").unwrap();
        assert_eq!(name_of(&s, id), "Marcus");
    }

    #[test]
    fn fuzzy_match_typo() {
        let s = state();
        let id = resolve_companion(&s, "Sister Rut").unwrap();
        assert_eq!(name_of(&s, id), "Sister Ruth");
    }

    #[test]
    fn no_match() {
        let s = state();
        assert!(resolve_companion(&s, "completely different").is_none());
    }

    #[test]
    fn inactive_companions_still_resolve() {
        let mut s = state();
        let id = s.find_companion("Quinn").unwrap().id;
        s.companion_mut(id).unwrap().deactivate();
        assert_eq!(resolve_companion(&s, "quinn"), Some(id));
        assert!(suggest_companions(&s, "Qu", 5).is_empty());
    }

    #[test]
    fn suggest_prefix() {
        let s = state();
        let suggestions = suggest_companions(&s, "El", 5);
        assert_eq!(suggestions.first().map(String::as_str), Some("Elena"));
    }

    #[test]
    fn suggest_substring() {
        let s = state();
        let suggestions = suggest_companions(&s, "Ruth", 5);
        assert!(suggestions.iter().any(|s| s == "Sister Ruth"));
    }
}
