use std::collections::HashMap;

use serde::Serialize;

use super::filter::ListingView;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Number of non-missing values the statistics were computed over.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Mean, min and max of a numeric column over the view.
///
/// Missing and non-numeric cells are skipped. Returns `None` when nothing is
/// left to summarise (empty view, unknown column, or all values missing).
pub fn summary_stats(view: &ListingView<'_>, column: &str) -> Option<SummaryStats> {
    let idx = view.table().column_index(column)?;

    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut count = 0usize;
    for v in view.iter().filter_map(|l| l.cells[idx].as_f64()) {
        sum += v;
        min = min.min(v);
        max = max.max(v);
        count += 1;
    }

    (count > 0).then(|| SummaryStats {
        mean: sum / count as f64,
        min,
        max,
        count,
    })
}

/// Occurrences of each value of a categorical column, most frequent first.
///
/// Missing values are not counted. Equal counts keep the order in which the
/// values were first seen in the view.
pub fn value_counts(view: &ListingView<'_>, column: &str) -> Vec<ValueCount> {
    let Some(idx) = view.table().column_index(column) else {
        return Vec::new();
    };

    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for value in view.iter().filter_map(|l| l.cells[idx].as_category()) {
        match positions.get(&value) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(value.clone(), counts.len());
                counts.push(ValueCount { value, count: 1 });
            }
        }
    }

    // Stable sort preserves first-seen order among ties.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
