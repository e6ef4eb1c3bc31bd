mod app;
mod ui;

use anyhow::{Context, Result};
use app::PfasMapApp;
use clap::Parser;
use eframe::egui;
use pfas_map::config::AppConfig;
use pfas_map::data::loader::load_samples;
use pfas_map::geo::load_boundaries;
use pfas_map::state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::parse();
    log::debug!("{config:?}");

    // Files named at startup must load; never open a half-initialised map.
    let state = startup_state(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PFAS Readings in Maine Towns",
        options,
        Box::new(move |_cc| Ok(Box::new(PfasMapApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

fn startup_state(config: &AppConfig) -> Result<AppState> {
    let mut state = AppState::new(config.debounce());

    if let Some(path) = &config.samples {
        let store = load_samples(path)
            .with_context(|| format!("loading samples from {}", path.display()))?;
        state.set_dataset(store);
    }

    if let Some(path) = &config.towns {
        let towns = load_boundaries(path)
            .with_context(|| format!("loading town boundaries from {}", path.display()))?;
        state.set_towns(towns);
    }

    Ok(state)
}
