use eframe::egui::{self, RichText};
use std::sync::Arc;

use crate::gateway::DataGateway;
use crate::model::{MarketplaceEntity, NavigationRequest};

/// Access group that controls whether the tray entry exists at all.
pub const MANAGER_GROUP: &str = "marketplace.group_manager";

/// Dropdown in the top bar listing the configured marketplace instances.
///
/// The entity list is fetched anew every time the dropdown opens; nothing
/// is cached across opens. Visibility is checked once at construction and
/// never re-evaluated within the session.
pub struct TrayMenu {
    gateway: Arc<dyn DataGateway>,
    visible: bool,
    entries: Vec<MarketplaceEntity>,
    error: Option<String>,
    was_open: bool,
}

impl TrayMenu {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        let visible = match gateway.user_in_group(MANAGER_GROUP) {
            Ok(in_group) => in_group,
            Err(err) => {
                tracing::warn!("tray permission check failed: {err}");
                false
            }
        };
        Self {
            gateway,
            visible,
            entries: Vec::new(),
            error: None,
            was_open: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn entries(&self) -> &[MarketplaceEntity] {
        &self.entries
    }

    /// Fetch and store the preview list. Called on every dropdown show.
    pub fn open(&mut self) {
        match self.gateway.systray_marketplaces() {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!("marketplace preview fetch failed: {err}");
                self.entries.clear();
                self.error = Some(err.to_string());
            }
        }
    }

    /// Navigation carrying the clicked entity's target view, model and id.
    pub fn on_item_click(&self, entity: &MarketplaceEntity) -> NavigationRequest {
        NavigationRequest::for_entity(entity)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<NavigationRequest> {
        if !self.visible {
            return None;
        }
        let mut nav = None;
        let mut open_now = false;
        ui.menu_button("Marketplaces", |ui| {
            open_now = true;
            if !self.was_open {
                self.open();
            }
            if let Some(err) = &self.error {
                ui.colored_label(egui::Color32::from_rgb(0xc0, 0x39, 0x2b), err);
            } else if self.entries.is_empty() {
                ui.label(RichText::new("No marketplaces configured").weak());
            }
            let entries = self.entries.clone();
            for entity in &entries {
                let mut label = entity.name.clone();
                if let Some(kind) = &entity.marketplace_type {
                    label.push_str(&format!("  ({kind})"));
                }
                let response = ui.button(label);
                let detail = preview_line(entity);
                let response = if detail.is_empty() {
                    response
                } else {
                    response.on_hover_text(detail)
                };
                if response.clicked() {
                    nav = Some(self.on_item_click(entity));
                    ui.close_menu();
                }
            }
        });
        self.was_open = open_now;
        nav
    }
}

fn preview_line(entity: &MarketplaceEntity) -> String {
    let mut parts = Vec::new();
    if let Some(orders) = entity.order_count {
        parts.push(format!("{orders} orders"));
    }
    if let Some(listings) = entity.listing_count {
        parts.push(format!("{listings} listings"));
    }
    if let Some(revenue) = &entity.total_revenue {
        parts.push(format!("revenue {revenue}"));
    }
    parts.join(", ")
}
