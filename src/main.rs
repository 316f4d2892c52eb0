use std::sync::Arc;

use eframe::egui;
use mk_dashboard::app::DashboardApp;
use mk_dashboard::gateway::HttpGateway;
use mk_dashboard::logging;
use mk_dashboard::settings::Settings;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging);

    let gateway = Arc::new(HttpGateway::new(&settings.server_url)?);

    let size = settings.window_size.unwrap_or((1100.0, 760.0));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size.0, size.1])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "Marketplace Dashboard",
        native_options,
        Box::new(move |_cc| Box::new(DashboardApp::new(&settings, gateway))),
    );
    Ok(())
}
