//! Typed-name resolution with fuzzy matching.

use strsim::jaro_winkler;

use crate::region::Region;

/// Minimum similarity score for fuzzy matching (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.85;

/// Minimum similarity score for autocomplete suggestions.
const SUGGEST_THRESHOLD: f64 = 0.6;

/// Resolve typed input to a region by code, name, or close spelling.
pub fn resolve_region<'a>(regions: &'a [Region], input: &str) -> Option<&'a Region> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    // Exact code or name first (case-insensitive)
    let input_lower = input.to_lowercase();
    if let Some(region) = regions.iter().find(|r| {
        r.code.eq_ignore_ascii_case(input) || r.name.to_lowercase() == input_lower
    }) {
        return Some(region);
    }

    fuzzy_match(regions, input, FUZZY_THRESHOLD)
        .first()
        .map(|(region, _)| *region)
}

/// Regions whose name is similar to the input, best first.
pub fn fuzzy_match<'a>(
    regions: &'a [Region],
    input: &str,
    threshold: f64,
) -> Vec<(&'a Region, f64)> {
    let input_lower = input.to_lowercase();
    let mut matches: Vec<(&Region, f64)> = regions
        .iter()
        .filter_map(|region| {
            let score = jaro_winkler(&input_lower, &region.name.to_lowercase());
            if score >= threshold {
                Some((region, score))
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

/// Autocomplete candidates for partial input, best first.
///
/// Code or name prefixes rank above substrings, which rank above
/// similar spellings.
pub fn suggest_regions<'a>(
    candidates: impl IntoIterator<Item = &'a Region>,
    partial: &str,
    limit: usize,
) -> Vec<&'a Region> {
    let partial_lower = partial.trim().to_lowercase();
    let mut suggestions: Vec<(&Region, f64)> = candidates
        .into_iter()
        .filter_map(|region| {
            let name_lower = region.name.to_lowercase();
            if partial_lower.is_empty() {
                Some((region, 0.0))
            } else if name_lower.starts_with(&partial_lower)
                || region.code.to_lowercase().starts_with(&partial_lower)
            {
                Some((region, 2.0))
            } else if name_lower.contains(&partial_lower) {
                Some((region, 1.0))
            } else {
                let score = jaro_winkler(&partial_lower, &name_lower);
                (score >= SUGGEST_THRESHOLD).then_some((region, score))
            }
        })
        .collect();

    // Stable sort keeps dataset order among equal scores
    suggestions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    suggestions
        .into_iter()
        .take(limit)
        .map(|(region, _)| region)
        .collect()
}
