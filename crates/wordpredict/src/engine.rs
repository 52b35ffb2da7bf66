use wordfreq_table::{WordRecord, WordTable};

/// Upper bound on returned predictions; the UI slider stops here too.
pub const MAX_PREDICTIONS: usize = 10;

/// Ranked prediction set for one prefix query.
///
/// `words` and `counts` are parallel; `total_count` sums the counts of ALL
/// matching records, not just the returned top slice, so callers can compute
/// each word's share of the whole match set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub words: Vec<String>,
    pub counts: Vec<u64>,
    pub total_count: u64,
    pub match_count: usize,
}

/// Rank the words in `table` starting with `prefix` by descending count.
///
/// Pure function: one O(n) scan over the table, no index. `limit` is clamped
/// to `[1, MAX_PREDICTIONS]`. An empty prefix returns an empty result without
/// scanning; so does a prefix matching nothing.
pub fn query(table: &WordTable, prefix: &str, limit: usize) -> QueryResult {
    if prefix.is_empty() {
        return QueryResult::default();
    }
    let limit = limit.clamp(1, MAX_PREDICTIONS);

    let mut matches: Vec<&WordRecord> = table
        .records()
        .iter()
        .filter(|r| matches_prefix(&r.word, prefix))
        .collect();

    let total_count = matches.iter().map(|r| r.count).sum();
    let match_count = matches.len();

    // sort_by is stable: equal counts keep their table order.
    matches.sort_by(|a, b| b.count.cmp(&a.count));
    matches.truncate(limit);

    QueryResult {
        words: matches.iter().map(|r| r.word.clone()).collect(),
        counts: matches.iter().map(|r| r.count).collect(),
        total_count,
        match_count,
    }
}

/// Percentage of `total` that `count` represents, rounded to two decimals.
/// A zero total yields 0.0 rather than NaN.
pub fn share_percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let share = count as f64 / total as f64 * 100.0;
    (share * 100.0).round() / 100.0
}

// Case-normalized comparison without allocating: the caller lowercases the
// prefix, the word is lowercased char by char as we walk it.
fn matches_prefix(word: &str, prefix: &str) -> bool {
    let mut chars = word.chars().flat_map(char::to_lowercase);
    prefix.chars().all(|p| chars.next() == Some(p))
}
