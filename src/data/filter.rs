use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{Furnishing, Listing, ListingTable, LOCATION, PROPERTY_TYPE};

// ---------------------------------------------------------------------------
// Selections: the current user-chosen filter values
// ---------------------------------------------------------------------------

/// Filter configuration. An empty categorical set means "no constraint";
/// the rent bounds always constrain and are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selections {
    pub locations: BTreeSet<String>,
    pub property_types: BTreeSet<String>,
    pub furnishing_states: BTreeSet<Furnishing>,
    pub rent_min: f64,
    pub rent_max: f64,
    pub near_transit_only: bool,
}

impl Selections {
    /// Nothing selected, rent bounds spanning the whole table.
    pub fn defaults_for(table: &ListingTable) -> Self {
        let (rent_min, rent_max) = table.rent_bounds().unwrap_or((0.0, 0.0));
        Self {
            locations: BTreeSet::new(),
            property_types: BTreeSet::new(),
            furnishing_states: BTreeSet::new(),
            rent_min,
            rent_max,
            near_transit_only: false,
        }
    }

    /// Whether a single listing passes every active predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        // NaN never compares, so a missing rent fails the range check.
        let rent = listing.monthly_rent.unwrap_or(f64::NAN);
        if !(rent >= self.rent_min && rent <= self.rent_max) {
            return false;
        }
        if !allows(&self.locations, listing.location.as_ref()) {
            return false;
        }
        if !allows(&self.property_types, listing.property_type.as_ref()) {
            return false;
        }
        if !allows(&self.furnishing_states, listing.furnished.as_ref()) {
            return false;
        }
        !self.near_transit_only || listing.near_transit == Some(true)
    }
}

/// Empty set → everything passes; otherwise the value must be present.
/// A missing value never matches a non-empty set.
fn allows<T: Ord>(selected: &BTreeSet<T>, value: Option<&T>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(v))
}

// ---------------------------------------------------------------------------
// Widget options derived from the full table
// ---------------------------------------------------------------------------

/// Distinct values offered by the filter widgets.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub property_types: Vec<String>,
    pub furnishing_states: Vec<Furnishing>,
    pub rent_bounds: (f64, f64),
}

impl FilterOptions {
    pub fn from_table(table: &ListingTable) -> Self {
        let furnishing_states: BTreeSet<Furnishing> =
            table.listings.iter().filter_map(|l| l.furnished.clone()).collect();
        Self {
            locations: table.distinct_values(LOCATION).into_iter().collect(),
            property_types: table.distinct_values(PROPERTY_TYPE).into_iter().collect(),
            furnishing_states: furnishing_states.into_iter().collect(),
            rent_bounds: table.rent_bounds().unwrap_or((0.0, 0.0)),
        }
    }
}

// ---------------------------------------------------------------------------
// ListingView: the filtered subset of a table
// ---------------------------------------------------------------------------

/// Rows of a table passing a filter, in original order.
#[derive(Debug, Clone)]
pub struct ListingView<'a> {
    table: &'a ListingTable,
    indices: Vec<usize>,
}

impl<'a> ListingView<'a> {
    /// Every row of the table.
    pub fn full(table: &'a ListingTable) -> Self {
        Self {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    /// Narrow this view further. Applying the same selections again is a no-op.
    pub fn filter(&self, selections: &Selections) -> Self {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| selections.matches(&self.table.listings[i]))
            .collect();
        Self {
            table: self.table,
            indices,
        }
    }

    pub fn table(&self) -> &'a ListingTable {
        self.table
    }

    /// Indices into the underlying table.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        self.indices.iter().map(|&i| &self.table.listings[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Filter the full table. The result is always recomputed from `table`.
pub fn apply<'a>(table: &'a ListingTable, selections: &Selections) -> ListingView<'a> {
    ListingView::full(table).filter(selections)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::model::CellValue;

    /// Build a table from `(location, property_type, furnished, rent, near_transit)`.
    pub(crate) fn table(rows: &[(&str, &str, &str, Option<f64>, bool)]) -> ListingTable {
        let columns = ["location", "property_type", "furnished", "monthly_rent", "near ktm/lrt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = rows
            .iter()
            .map(|(loc, ptype, furn, rent, near)| {
                vec![
                    CellValue::guess(loc),
                    CellValue::guess(ptype),
                    CellValue::guess(furn),
                    rent.map(CellValue::Float).unwrap_or(CellValue::Null),
                    CellValue::Bool(*near),
                ]
            })
            .collect();
        ListingTable::from_records(columns, rows).unwrap()
    }

    fn sample() -> ListingTable {
        table(&[
            ("Cheras", "Condominium", "Fully Furnished", Some(1800.0), true),
            ("Puchong", "Apartment", "Not Furnished", Some(950.0), false),
            ("Cheras", "Apartment", "Partially Furnished", Some(1200.0), false),
            ("Setapak", "Service Residence", "Fully Furnished", None, true),
            ("", "Condominium", "Fully Furnished", Some(2500.0), true),
        ])
    }

    #[test]
    fn defaults_keep_every_row_with_rent() {
        let t = sample();
        let sel = Selections::defaults_for(&t);
        assert_eq!((sel.rent_min, sel.rent_max), (950.0, 2500.0));
        assert_eq!(apply(&t, &sel).indices(), &[0, 1, 2, 4]);
    }

    #[test]
    fn rent_bounds_are_inclusive() {
        let t = sample();
        let mut sel = Selections::defaults_for(&t);
        sel.rent_min = 1200.0;
        sel.rent_max = 1800.0;
        assert_eq!(apply(&t, &sel).indices(), &[0, 2]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let t = sample();
        let mut sel = Selections::defaults_for(&t);
        sel.locations.insert("Cheras".into());
        sel.property_types.insert("Apartment".into());
        let view = apply(&t, &sel);

        assert_eq!(view.indices(), &[2]);
        for l in view.iter() {
            assert_eq!(l.location.as_deref(), Some("Cheras"));
            assert_eq!(l.property_type.as_deref(), Some("Apartment"));
        }
    }

    #[test]
    fn furnishing_and_transit_filters() {
        let t = sample();
        let mut sel = Selections::defaults_for(&t);
        sel.furnishing_states.insert(Furnishing::Fully);
        assert_eq!(apply(&t, &sel).indices(), &[0, 4]);

        sel.near_transit_only = true;
        sel.furnishing_states.clear();
        assert_eq!(apply(&t, &sel).indices(), &[0, 4]);
    }

    #[test]
    fn missing_category_fails_a_non_empty_selection() {
        let t = sample();
        let mut sel = Selections::defaults_for(&t);
        sel.property_types.insert("Condominium".into());
        assert_eq!(apply(&t, &sel).indices(), &[0, 4]);

        sel.locations.extend(["Cheras".to_string(), "Setapak".to_string()]);
        assert_eq!(apply(&t, &sel).indices(), &[0]);
    }

    #[test]
    fn empty_selection_equals_selecting_everything() {
        let t = sample();
        let empty = Selections::defaults_for(&t);
        let mut all_types = empty.clone();
        all_types.property_types = t.distinct_values(PROPERTY_TYPE);
        assert_eq!(apply(&t, &empty).indices(), apply(&t, &all_types).indices());

        // Row 4 has no location, so listing every location drops it.
        let mut all_locations = empty.clone();
        all_locations.locations = t.distinct_values(LOCATION);
        assert_eq!(apply(&t, &all_locations).indices(), &[0, 1, 2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = sample();
        let mut sel = Selections::defaults_for(&t);
        sel.rent_max = 1800.0;
        sel.locations.insert("Cheras".into());
        let once = apply(&t, &sel);
        let twice = once.filter(&sel);
        assert_eq!(once.indices(), twice.indices());
    }

    #[test]
    fn inverted_range_yields_empty_view() {
        let t = sample();
        let mut sel = Selections::defaults_for(&t);
        sel.rent_min = 2000.0;
        sel.rent_max = 1000.0;
        assert!(apply(&t, &sel).is_empty());
    }

    #[test]
    fn options_list_distinct_values() {
        let opts = FilterOptions::from_table(&sample());
        assert_eq!(opts.locations, vec!["Cheras", "Puchong", "Setapak"]);
        assert_eq!(opts.furnishing_states.len(), 3);
        assert_eq!(opts.rent_bounds, (950.0, 2500.0));
    }
}
