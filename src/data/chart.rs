use serde::Serialize;

use super::filter::ListingView;

// ---------------------------------------------------------------------------
// Rent distribution by furnishing (stacked histogram)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub range_start: f64,
    pub range_end: f64,
}

/// Per-group counts, aligned with [`Histogram::bins`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub group: String,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub series: Vec<HistogramSeries>,
}

impl Histogram {
    /// Total number of values across every series.
    pub fn total(&self) -> u64 {
        self.series.iter().flat_map(|s| s.counts.iter()).sum()
    }
}

/// Equal-width histogram of `values` split by group label.
///
/// Bin edges are shared by all groups and span the overall min/max. The
/// last bin is closed on the right. Series appear in first-seen order.
pub fn grouped_histogram<'g>(values: impl IntoIterator<Item = (&'g str, f64)>, bins: usize) -> Histogram {
    let values: Vec<(&str, f64)> = values.into_iter().collect();
    if values.is_empty() || bins == 0 {
        return Histogram::default();
    }
    let min = values.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = values.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);

    let (edges, width) = if (max - min).abs() < f64::EPSILON {
        (vec![HistogramBin { range_start: min, range_end: max }], 0.0)
    } else {
        let width = (max - min) / bins as f64;
        let edges = (0..bins)
            .map(|i| HistogramBin {
                range_start: min + i as f64 * width,
                range_end: min + (i + 1) as f64 * width,
            })
            .collect();
        (edges, width)
    };

    let mut series: Vec<HistogramSeries> = Vec::new();
    for (group, v) in values {
        let idx = if width == 0.0 {
            0
        } else {
            (((v - min) / width) as usize).min(edges.len() - 1)
        };
        let pos = match series.iter().position(|s| s.group == group) {
            Some(pos) => pos,
            None => {
                series.push(HistogramSeries {
                    group: group.to_string(),
                    counts: vec![0; edges.len()],
                });
                series.len() - 1
            }
        };
        series[pos].counts[idx] += 1;
    }

    Histogram { bins: edges, series }
}

/// Monthly rent distribution coloured by furnishing state.
///
/// Rows without a rent or without a furnishing label are left out.
pub fn rent_histogram(view: &ListingView<'_>, bins: usize) -> Histogram {
    let labelled: Vec<(String, f64)> = view
        .iter()
        .filter_map(|l| Some((l.furnished.as_ref()?.to_string(), l.monthly_rent?)))
        .collect();
    grouped_histogram(labelled.iter().map(|(g, v)| (g.as_str(), *v)), bins)
}

// ---------------------------------------------------------------------------
// Rent by property type (box plot)
// ---------------------------------------------------------------------------

/// Five-number summary plus Tukey whiskers for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Linear-interpolated quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Box statistics of a non-empty group of values.
pub fn box_stats(group: &str, mut values: Vec<f64>) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let q1 = quantile(&values, 0.25);
    let median = quantile(&values, 0.5);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside = values.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
    let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
    let outliers = values
        .iter()
        .copied()
        .filter(|v| !(lo_fence..=hi_fence).contains(v))
        .collect();

    Some(BoxStats {
        group: group.to_string(),
        count: values.len(),
        min: values[0],
        q1,
        median,
        q3,
        max: values[values.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Rent distribution per property type, groups in first-seen order.
pub fn rent_box_plot(view: &ListingView<'_>) -> Vec<BoxStats> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for l in view.iter() {
        let (Some(ptype), Some(rent)) = (l.property_type.as_ref(), l.monthly_rent) else {
            continue;
        };
        match groups.iter_mut().find(|(g, _)| g == ptype) {
            Some((_, values)) => values.push(rent),
            None => groups.push((ptype.clone(), vec![rent])),
        }
    }
    groups
        .into_iter()
        .filter_map(|(group, values)| box_stats(&group, values))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::tests::table;
    use crate::data::filter::{apply, ListingView, Selections};

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [("a", 0.0), ("b", 2.5), ("a", 5.0), ("a", 7.5), ("b", 10.0)];
        let h = grouped_histogram(values, 4);

        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.bins[0], HistogramBin { range_start: 0.0, range_end: 2.5 });
        assert_eq!(h.series[0].group, "a");
        assert_eq!(h.series[0].counts, vec![1, 0, 1, 1]);
        // The maximum lands in the last bin.
        assert_eq!(h.series[1].counts, vec![0, 1, 0, 1]);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn single_value_gives_one_bin() {
        let h = grouped_histogram([("a", 1200.0), ("a", 1200.0)], 30);
        assert_eq!(h.bins.len(), 1);
        assert_eq!(h.series[0].counts, vec![2]);
    }

    #[test]
    fn empty_input_gives_empty_histogram() {
        assert_eq!(grouped_histogram(Vec::<(&str, f64)>::new(), 30), Histogram::default());
        assert_eq!(grouped_histogram([("a", 1.0)], 0), Histogram::default());
    }

    #[test]
    fn rent_histogram_groups_by_furnishing() {
        let t = table(&[
            ("A", "Condominium", "Fully Furnished", Some(1000.0), false),
            ("A", "Condominium", "Not Furnished", Some(2000.0), false),
            ("A", "Condominium", "", Some(1500.0), false),
            ("A", "Condominium", "Fully Furnished", None, false),
        ]);
        let h = rent_histogram(&ListingView::full(&t), 10);
        let groups: Vec<&str> = h.series.iter().map(|s| s.group.as_str()).collect();
        assert_eq!(groups, vec!["Fully Furnished", "Not Furnished"]);
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn box_stats_quartiles_and_outliers() {
        let stats = box_stats("Condominium", vec![5.0, 1.0, 3.0, 2.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 2.25);
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.q3, 4.75);
        assert_eq!(stats.max, 100.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn box_plot_groups_in_first_seen_order() {
        let t = table(&[
            ("A", "Service Residence", "Fully Furnished", Some(3000.0), false),
            ("A", "Condominium", "Fully Furnished", Some(1000.0), false),
            ("A", "Service Residence", "Fully Furnished", Some(2000.0), false),
        ]);
        let boxes = rent_box_plot(&ListingView::full(&t));
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].group, "Service Residence");
        assert_eq!(boxes[0].median, 2500.0);
        assert_eq!(boxes[1].count, 1);
    }

    #[test]
    fn empty_view_gives_no_boxes() {
        let t = table(&[("A", "Condominium", "Fully Furnished", Some(1000.0), false)]);
        let mut sel = Selections::defaults_for(&t);
        sel.near_transit_only = true;
        let view = apply(&t, &sel);
        assert!(rent_box_plot(&view).is_empty());
        assert_eq!(rent_histogram(&view, 30), Histogram::default());
    }
}
