mod app;
mod color;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::RentalDashboardApp;
use rental_dashboard::config::DashboardConfig;
use rental_dashboard::state::DashboardState;
use rental_dashboard::{render, DatasetSource, Selections};

#[derive(Parser, Debug)]
#[command(name = "rental-dashboard", version, about = "Rental listings dashboard")]
struct Cli {
    /// Print the default view and its rows as JSON instead of opening a window
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::init();

    let config = DashboardConfig::load().context("loading dashboard config")?;
    let source = DatasetSource::new(&config.data_path);
    let table = match source.load() {
        Ok(table) => table,
        Err(e) => {
            log::error!("Failed to load listings: {e}");
            return Err(e).with_context(|| format!("loading {}", source.path().display()));
        }
    };

    if cli.json {
        let view = render(&table, &Selections::defaults_for(&table), &config.render_options());
        let rows: Vec<_> = view.raw_rows(&table).collect();
        let out = serde_json::json!({ "view": view, "rows": rows });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let state = DashboardState::new(table, config.render_options());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rental Apartment Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(RentalDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag() {
        assert!(!Cli::try_parse_from(["rental-dashboard"]).unwrap().json);
        assert!(Cli::try_parse_from(["rental-dashboard", "--json"]).unwrap().json);
        assert!(Cli::try_parse_from(["rental-dashboard", "--jsn"]).is_err());
    }
}
