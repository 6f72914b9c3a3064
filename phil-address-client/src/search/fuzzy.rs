/// Relevance of `name` to `query` on a 0..=100 scale, case-insensitive.
pub fn score(query: &str, name: &str) -> u8 {
    let query = query.to_lowercase();
    let name = name.to_lowercase();

    if name == query {
        100
    } else if name.starts_with(&query) {
        90
    } else if name.contains(&query) {
        70
    } else {
        similarity(&query, &name)
    }
}

/// Edit-distance similarity: 100 for identical strings, 0 for nothing in common.
pub fn similarity(a: &str, b: &str) -> u8 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100;
    }
    let distance = distance::levenshtein(a, b);
    let ratio = max_len.saturating_sub(distance) as f64 / max_len as f64;
    (ratio * 100.0).round() as u8
}
