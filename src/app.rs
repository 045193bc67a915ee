use eframe::egui;

use rental_dashboard::state::DashboardState;

use crate::color::ColorMap;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RentalDashboardApp {
    pub state: DashboardState,
    pub furnishing_colors: ColorMap,
    pub property_type_colors: ColorMap,
}

impl RentalDashboardApp {
    pub fn new(state: DashboardState) -> Self {
        let furnishing_colors = ColorMap::new(&state.options.furnishing_states);
        let property_type_colors = ColorMap::new(&state.options.property_types);
        Self {
            state,
            furnishing_colors,
            property_type_colors,
        }
    }
}

impl eframe::App for RentalDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.columns(2, |cols| {
                    panels::rent_overview(&mut cols[0], &self.state.view);
                    panels::top_locations(&mut cols[1], &self.state.view);
                });
                ui.separator();

                ui.columns(2, |cols| {
                    plot::rent_by_furnishing(&mut cols[0], &self.state.view, &self.furnishing_colors);
                    plot::rent_by_property_type(&mut cols[1], &self.state.view, &self.property_type_colors);
                });
                ui.separator();

                table::raw_data(ui, &self.state);
            });
        });
    }
}
