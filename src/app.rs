use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::dashboard::DashboardWidget;
use crate::gateway::DataGateway;
use crate::model::NavigationRequest;
use crate::settings::Settings;
use crate::tray::TrayMenu;

/// Shell around the two widgets: top bar with the tray dropdown, central
/// panel with the dashboard.
pub struct DashboardApp {
    dashboard: DashboardWidget,
    tray: TrayMenu,
    server_url: Option<Url>,
}

impl DashboardApp {
    pub fn new(settings: &Settings, gateway: Arc<dyn DataGateway>) -> Self {
        let mut dashboard = DashboardWidget::new(Arc::clone(&gateway), settings.instance_id);
        dashboard.start();
        let tray = TrayMenu::new(gateway);
        let server_url = Url::parse(&settings.server_url).ok();
        Self {
            dashboard,
            tray,
            server_url,
        }
    }

    /// Hand a tray click over to the backend's own web client.
    fn navigate(&self, request: NavigationRequest) {
        let Some(base) = &self.server_url else {
            tracing::warn!("no valid server url configured; dropping navigation");
            return;
        };
        let mut target = base.clone();
        if let Some(id) = request.target_id() {
            target.set_fragment(Some(&format!(
                "model={}&view_type=form&id={id}",
                request.res_model
            )));
        } else {
            target.set_fragment(Some(&format!(
                "model={}&view_type=kanban",
                request.res_model
            )));
        }
        tracing::info!("opening {target}");
        if let Err(err) = open::that(target.as_str()) {
            tracing::warn!("failed to open {target}: {err}");
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.dashboard.poll();
        self.dashboard.maybe_auto_refresh();

        let mut nav = None;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Marketplace Dashboard");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    nav = self.tray.ui(ui);
                });
            });
        });
        if let Some(request) = nav {
            self.navigate(request);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.ui(ui);
        });

        // Keep frames coming while a fetch is outstanding; its completion
        // is only observed by polling.
        if self.dashboard.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
