use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::filter::{FilterOptions, Selections};
use crate::data::model::{Furnishing, ListingTable};
use crate::view::{render, DashboardView, RenderOptions};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Which multi-select a toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Location,
    PropertyType,
    Furnishing,
}

/// The full dashboard state, independent of rendering.
pub struct DashboardState {
    /// Loaded dataset, shared and never mutated.
    pub table: Arc<ListingTable>,

    /// Values offered by the filter widgets.
    pub options: FilterOptions,

    /// Current filter selections.
    pub selections: Selections,

    /// View for the current selections (cached until the next change).
    pub view: DashboardView,

    render_options: RenderOptions,
}

impl DashboardState {
    pub fn new(table: Arc<ListingTable>, render_options: RenderOptions) -> Self {
        let options = FilterOptions::from_table(&table);
        let selections = Selections::defaults_for(&table);
        let view = render(&table, &selections, &render_options);
        Self {
            table,
            options,
            selections,
            view,
            render_options,
        }
    }

    /// Recompute the view from the full table.
    pub fn refresh(&mut self) {
        self.view = render(&self.table, &self.selections, &self.render_options);
    }

    /// Whether a value is currently selected in a multi-select.
    pub fn is_selected(&self, category: Category, label: &str) -> bool {
        match category {
            Category::Location => self.selections.locations.contains(label),
            Category::PropertyType => self.selections.property_types.contains(label),
            Category::Furnishing => self.selections.furnishing_states.contains(&Furnishing::parse(label)),
        }
    }

    /// Toggle a single value in a multi-select.
    pub fn toggle(&mut self, category: Category, label: &str) {
        match category {
            Category::Location => toggle_value(&mut self.selections.locations, label.to_string()),
            Category::PropertyType => toggle_value(&mut self.selections.property_types, label.to_string()),
            Category::Furnishing => toggle_value(&mut self.selections.furnishing_states, Furnishing::parse(label)),
        }
        self.refresh();
    }

    /// Select every offered value of a multi-select.
    pub fn select_all(&mut self, category: Category) {
        match category {
            Category::Location => self.selections.locations = self.options.locations.iter().cloned().collect(),
            Category::PropertyType => {
                self.selections.property_types = self.options.property_types.iter().cloned().collect()
            }
            Category::Furnishing => {
                self.selections.furnishing_states = self.options.furnishing_states.iter().cloned().collect()
            }
        }
        self.refresh();
    }

    /// Clear a multi-select, which removes its constraint.
    pub fn select_none(&mut self, category: Category) {
        match category {
            Category::Location => self.selections.locations.clear(),
            Category::PropertyType => self.selections.property_types.clear(),
            Category::Furnishing => self.selections.furnishing_states.clear(),
        }
        self.refresh();
    }

    /// Set the rent bounds, clamped to the observed range with `min <= max`.
    /// Set the rent window, clamped to the data's bounds. NaN input is ignored.
    pub fn set_rent_range(&mut self, min: f64, max: f64) {
        if min.is_nan() || max.is_nan() {
            return;
        }
        let (lo, hi) = self.options.rent_bounds;
        let min = min.clamp(lo, hi);
        let max = max.clamp(min, hi);
        self.selections.rent_min = min;
        self.selections.rent_max = max;
        self.refresh();
    }

    pub fn set_near_transit_only(&mut self, on: bool) {
        self.selections.near_transit_only = on;
        self.refresh();
    }

    /// Back to the unfiltered defaults.
    pub fn reset(&mut self) {
        self.selections = Selections::defaults_for(&self.table);
        self.refresh();
    }
}

fn toggle_value<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}
