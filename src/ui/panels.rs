use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rental_dashboard::state::{Category, DashboardState};
use rental_dashboard::view::{format_rent, DashboardView};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Filter Listings");
    ui.separator();

    let locations = state.options.locations.clone();
    let property_types = state.options.property_types.clone();
    let furnishing: Vec<String> = state.options.furnishing_states.iter().map(|f| f.to_string()).collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            multi_select(ui, state, Category::Location, "Select Location", &locations);
            multi_select(ui, state, Category::PropertyType, "Property Type", &property_types);
            multi_select(ui, state, Category::Furnishing, "Furnishing", &furnishing);
            ui.separator();

            rent_range(ui, state);
            ui.separator();

            let mut near = state.selections.near_transit_only;
            if ui.checkbox(&mut near, "Only show listings near KTM/LRT").changed() {
                state.set_near_transit_only(near);
            }

            ui.add_space(8.0);
            if ui.button("Reset filters").clicked() {
                state.reset();
            }
        });
}

/// Collapsible checkbox list. Nothing ticked means no constraint.
fn multi_select(ui: &mut Ui, state: &mut DashboardState, category: Category, title: &str, values: &[String]) {
    let n_selected = values.iter().filter(|v| state.is_selected(category, v)).count();
    let header_text = if n_selected == 0 {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({n_selected}/{})", values.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(category);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(category);
                }
            });

            for value in values {
                let mut checked = state.is_selected(category, value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    state.toggle(category, value);
                }
            }
        });
}

fn rent_range(ui: &mut Ui, state: &mut DashboardState) {
    ui.strong("Monthly Rent (RM)");
    let (lo, hi) = state.options.rent_bounds;
    let mut min = state.selections.rent_min;
    let mut max = state.selections.rent_max;

    let min_changed = ui
        .add(egui::Slider::new(&mut min, lo..=hi).text("min").step_by(1.0))
        .changed();
    let max_changed = ui
        .add(egui::Slider::new(&mut max, lo..=hi).text("max").step_by(1.0))
        .changed();

    if min_changed || max_changed {
        // Dragging one handle past the other pushes it along.
        if min_changed && min > max {
            max = min;
        }
        state.set_rent_range(min, max);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &DashboardState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Rental Apartment Dashboard");
        ui.separator();
        ui.label(format!(
            "Showing {} of {} listings after filtering.",
            state.view.filtered_listings, state.view.total_listings
        ));
    });
}

// ---------------------------------------------------------------------------
// Metric cards and ranked locations
// ---------------------------------------------------------------------------

pub fn rent_overview(ui: &mut Ui, view: &DashboardView) {
    ui.heading("Rental Price Overview");
    let rent = view.rent_summary;
    ui.columns(3, |cols| {
        metric_card(&mut cols[0], "Average Rent", &format_rent(rent.map(|r| r.mean)), Color32::from_rgb(46, 125, 50));
        metric_card(&mut cols[1], "Max Rent", &format_rent(rent.map(|r| r.max)), Color32::from_rgb(211, 47, 47));
        metric_card(&mut cols[2], "Min Rent", &format_rent(rent.map(|r| r.min)), Color32::from_rgb(2, 136, 209));
    });
}

fn metric_card(ui: &mut Ui, title: &str, value: &str, color: Color32) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(title).color(Color32::GRAY));
            ui.label(RichText::new(value).size(24.0).strong().color(color));
        });
    });
}

pub fn top_locations(ui: &mut Ui, view: &DashboardView) {
    ui.heading("Top Locations");
    if view.top_locations.is_empty() {
        ui.label("No listings match the current filters.");
        return;
    }

    let max = view.top_location_max().max(1) as f32;
    ScrollArea::vertical()
        .id_salt("top_locations")
        .max_height(220.0)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("top_locations_grid").striped(true).show(ui, |ui: &mut Ui| {
                for entry in &view.top_locations {
                    ui.label(&entry.value);
                    ui.add(
                        egui::ProgressBar::new(entry.count as f32 / max)
                            .desired_width(120.0)
                            .text(entry.count.to_string()),
                    );
                    ui.end_row();
                }
            });
        });
}
