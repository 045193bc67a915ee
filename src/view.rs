//! The dashboard view model: everything the presentation layer draws,
//! computed in one pure pass from the full table and the current selections.

use serde::Serialize;

use crate::data::aggregate::{summary_stats, value_counts, SummaryStats, ValueCount};
use crate::data::chart::{rent_box_plot, rent_histogram, BoxStats, Histogram};
use crate::data::filter::{apply, Selections};
use crate::data::model::{CellValue, ListingTable, HIDDEN_COLUMNS, LOCATION, MONTHLY_RENT};

/// Knobs that shape the view but are not user filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub histogram_bins: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { histogram_bins: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub total_listings: usize,
    pub filtered_listings: usize,
    /// `None` when no filtered listing has a rent.
    pub rent_summary: Option<SummaryStats>,
    pub top_locations: Vec<ValueCount>,
    pub rent_by_furnishing: Histogram,
    pub rent_by_property_type: Vec<BoxStats>,
    /// Names of the columns shown in the raw data table.
    pub raw_columns: Vec<String>,
    /// Table indices of the visible columns, aligned with `raw_columns`.
    #[serde(skip)]
    pub raw_column_indices: Vec<usize>,
    /// Table indices of the filtered rows, in original order.
    #[serde(skip)]
    pub row_indices: Vec<usize>,
}

impl DashboardView {
    /// Cells of the raw data table for the filtered rows.
    pub fn raw_rows<'t>(&'t self, table: &'t ListingTable) -> impl Iterator<Item = Vec<&'t CellValue>> + 't {
        self.row_indices.iter().map(move |&row| {
            let cells = &table.listings[row].cells;
            self.raw_column_indices.iter().map(|&c| &cells[c]).collect()
        })
    }

    /// Largest location count, used to scale the ranked list.
    pub fn top_location_max(&self) -> usize {
        self.top_locations.first().map(|v| v.count).unwrap_or(0)
    }
}

/// Build the view for `selections`, always starting from the full table.
pub fn render(table: &ListingTable, selections: &Selections, options: &RenderOptions) -> DashboardView {
    let view = apply(table, selections);
    log::debug!("{} of {} listings pass the filters", view.len(), table.len());

    let (raw_column_indices, raw_columns): (Vec<usize>, Vec<String>) = table
        .column_names
        .iter()
        .enumerate()
        .filter(|(_, name)| !HIDDEN_COLUMNS.contains(&name.as_str()))
        .map(|(i, name)| (i, name.clone()))
        .unzip();

    DashboardView {
        total_listings: table.len(),
        filtered_listings: view.len(),
        rent_summary: summary_stats(&view, MONTHLY_RENT),
        top_locations: value_counts(&view, LOCATION),
        rent_by_furnishing: rent_histogram(&view, options.histogram_bins),
        rent_by_property_type: rent_box_plot(&view),
        raw_columns,
        raw_column_indices,
        row_indices: view.indices().to_vec(),
    }
}

/// Format a rent for a metric card: `RM 1250`, or `RM –` when undefined.
pub fn format_rent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("RM {v:.0}"),
        None => "RM –".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listings() -> ListingTable {
        let columns = [
            "ads_id",
            "location",
            "property_type",
            "furnished",
            "monthly_rent",
            "near ktm/lrt",
            "completion_year",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let rows = [
            ["1", "A", "Condominium", "Fully Furnished", "1000", "True", "2015"],
            ["2", "B", "Apartment", "Not Furnished", "2000", "False", "2001"],
            ["3", "A", "Condominium", "Partially Furnished", "1500", "True", ""],
        ]
        .iter()
        .map(|r| r.iter().map(|c| CellValue::guess(c)).collect())
        .collect();
        ListingTable::from_records(columns, rows).unwrap()
    }

    #[test]
    fn render_location_scenario() {
        let t = listings();
        let mut sel = Selections::defaults_for(&t);
        sel.locations.insert("A".into());
        sel.rent_min = 0.0;
        sel.rent_max = 5000.0;
        let view = render(&t, &sel, &RenderOptions::default());

        assert_eq!(view.total_listings, 3);
        assert_eq!(view.filtered_listings, 2);
        let rent = view.rent_summary.unwrap();
        assert_eq!((rent.mean, rent.max, rent.min), (1250.0, 1500.0, 1000.0));
        assert_eq!(view.top_locations, vec![ValueCount { value: "A".into(), count: 2 }]);
        assert_eq!(view.rent_by_property_type.len(), 1);
        assert_eq!(view.rent_by_furnishing.total(), 2);
        assert_eq!(view.top_location_max(), 2);
    }

    #[test]
    fn raw_table_hides_id_and_year() {
        let t = listings();
        let view = render(&t, &Selections::defaults_for(&t), &RenderOptions::default());

        assert_eq!(
            view.raw_columns,
            vec!["location", "property_type", "furnished", "monthly_rent", "near ktm/lrt"]
        );
        let rows: Vec<Vec<&CellValue>> = view.raw_rows(&t).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], &CellValue::String("B".into()));
        assert_eq!(rows[1][3], &CellValue::Integer(2000));
    }

    #[test]
    fn empty_view_degrades_gracefully() {
        let t = listings();
        let mut sel = Selections::defaults_for(&t);
        sel.near_transit_only = true;
        sel.property_types.insert("Apartment".into());
        let view = render(&t, &sel, &RenderOptions::default());

        assert_eq!(view.filtered_listings, 0);
        assert_eq!(view.rent_summary, None);
        assert!(view.top_locations.is_empty());
        assert!(view.rent_by_property_type.is_empty());
        assert_eq!(view.top_location_max(), 0);
        assert_eq!(view.raw_rows(&t).count(), 0);
        assert_eq!(format_rent(view.rent_summary.map(|s| s.mean)), "RM –");
    }

    #[test]
    fn rent_is_formatted_without_decimals() {
        assert_eq!(format_rent(Some(1249.6)), "RM 1250");
        assert_eq!(format_rent(Some(950.0)), "RM 950");
    }

    #[test]
    fn view_serializes_without_row_indices() {
        let t = listings();
        let view = render(&t, &Selections::defaults_for(&t), &RenderOptions::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["filtered_listings"], 3);
        assert!(json.get("row_indices").is_none());
    }
}
