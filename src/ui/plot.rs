use eframe::egui::{Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, Points};

use rental_dashboard::view::DashboardView;

use crate::color::ColorMap;

const PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Rent by furnishing (stacked histogram)
// ---------------------------------------------------------------------------

pub fn rent_by_furnishing(ui: &mut Ui, view: &DashboardView, colors: &ColorMap) {
    ui.heading("Rent by Furnishing");
    let hist = &view.rent_by_furnishing;
    if hist.series.is_empty() {
        ui.label("No listings to chart.");
        return;
    }

    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.series.len());
    for series in &hist.series {
        let bars: Vec<Bar> = hist
            .bins
            .iter()
            .zip(&series.counts)
            .map(|(bin, &count)| {
                let width = (bin.range_end - bin.range_start).max(1.0);
                Bar::new((bin.range_start + bin.range_end) / 2.0, count as f64).width(width)
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&series.group)
            .color(colors.color_for(&series.group))
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new("rent_by_furnishing")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("monthly_rent")
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Rent by property type (box plot)
// ---------------------------------------------------------------------------

pub fn rent_by_property_type(ui: &mut Ui, view: &DashboardView, colors: &ColorMap) {
    ui.heading("Rent by Property Type");
    if view.rent_by_property_type.is_empty() {
        ui.label("No listings to chart.");
        return;
    }

    Plot::new("rent_by_property_type")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("property_type")
        .y_axis_label("monthly_rent")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, stats) in view.rent_by_property_type.iter().enumerate() {
                let x = i as f64;
                let color = colors.color_for(&stats.group);
                let spread = BoxSpread::new(
                    stats.lower_whisker,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.upper_whisker,
                );
                let elem = BoxElem::new(x, spread)
                    .name(&stats.group)
                    .box_width(0.6)
                    .fill(color.linear_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&stats.group).color(color));

                if !stats.outliers.is_empty() {
                    let points: Vec<[f64; 2]> = stats.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(points).name(&stats.group).color(color).radius(2.5));
                }
            }
        });
}
