mod app;
mod ui;

use app::DashboardApp;
use eframe::egui;
use ipl_dashboard::config::{WINDOW_MIN_SIZE, WINDOW_SIZE, WINDOW_TITLE};
use ipl_dashboard::session::Session;
use ipl_dashboard::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Both datasets are loaded once, up front, before the window opens.
    let loaded = Session::load_http();
    match &loaded {
        Ok(s) => log::info!(
            "session ready: {} matches, {} deliveries",
            s.matches.len(),
            s.deliveries.len()
        ),
        Err(e) => log::error!("halting: {e}"),
    }
    let state = AppState::from_load(loaded);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(WINDOW_MIN_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp { state }))),
    )
}
