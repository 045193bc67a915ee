use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use rental_dashboard::state::DashboardState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Raw data (filtered rows, ads_id / completion_year hidden)
// ---------------------------------------------------------------------------

pub fn raw_data(ui: &mut Ui, state: &DashboardState) {
    let view = &state.view;
    egui::CollapsingHeader::new("View Raw Data")
        .id_salt("raw_data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if view.row_indices.is_empty() {
                ui.label("No listings match the current filters.");
                return;
            }

            let listings = &state.table.listings;
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(400.0)
                .columns(Column::auto().at_least(60.0), view.raw_columns.len())
                .header(20.0, |mut header| {
                    for name in &view.raw_columns {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, view.row_indices.len(), |mut row| {
                        let cells = &listings[view.row_indices[row.index()]].cells;
                        for &c in &view.raw_column_indices {
                            row.col(|ui| {
                                ui.label(cells[c].to_string());
                            });
                        }
                    });
                });
        });
}
