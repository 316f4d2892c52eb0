use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::charts::{self, EguiChartSurface};
use crate::currency::CurrencyRegistry;
use crate::dashboard::Phase;
use crate::fetcher::{DataFetcher, FetchOutcome};
use crate::filter::{FilterError, FilterMode, FilterState};
use crate::gateway::DataGateway;
use crate::model::{DashboardSnapshot, Summary};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The dashboard screen: date filter bar, summary tiles, best sellers and
/// the five chart slots for one marketplace instance (or all of them).
///
/// All of its state is owned here and discarded on teardown; nothing is
/// process-global. The snapshot is replaced wholesale by every completed
/// fetch, so when refresh cycles overlap the one that resolves last is the
/// one on screen.
pub struct DashboardWidget {
    instance_id: Option<i64>,
    gateway: Arc<dyn DataGateway>,
    fetcher: DataFetcher,
    phase: Phase,
    filter: FilterState,
    currencies: CurrencyRegistry,
    snapshot: Option<DashboardSnapshot>,
    refresh_interval: Option<Duration>,
    last_refresh: Instant,
    filter_error: Option<FilterError>,
    last_error: Option<String>,
    custom_from: String,
    custom_to: String,
}

impl DashboardWidget {
    pub fn new(gateway: Arc<dyn DataGateway>, instance_id: Option<i64>) -> Self {
        let fetcher = DataFetcher::new(Arc::clone(&gateway));
        Self {
            instance_id,
            gateway,
            fetcher,
            phase: Phase::default(),
            filter: FilterState::default(),
            currencies: CurrencyRegistry::default(),
            snapshot: None,
            refresh_interval: None,
            last_refresh: Instant::now(),
            filter_error: None,
            last_error: None,
            custom_from: String::new(),
            custom_to: String::new(),
        }
    }

    /// Resolve the server-side defaults, then kick off the first fetch.
    pub fn start(&mut self) {
        self.phase = self.phase.on_start();
        match self.gateway.dashboard_options(self.instance_id, None) {
            Ok(options) => {
                self.filter = options.filter;
                self.currencies = CurrencyRegistry::new(options.currencies);
                if let Some((from, to)) = self.filter.bounds() {
                    self.custom_from = from.format(DATE_FORMAT).to_string();
                    self.custom_to = to.format(DATE_FORMAT).to_string();
                }
                self.fetcher.refresh(self.instance_id, &self.filter);
            }
            Err(err) => {
                tracing::warn!("dashboard options fetch failed: {err}");
                self.last_error = Some(err.to_string());
                self.phase = self.phase.on_error();
            }
        }
    }

    /// Change the date filter. A validation failure blocks the change and
    /// no request goes out; on success a full refresh runs.
    pub fn set_filter(
        &mut self,
        mode: FilterMode,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<(), FilterError> {
        match self.filter.set_filter(mode, date_from, date_to) {
            Ok(()) => {
                self.filter_error = None;
                self.refresh();
                Ok(())
            }
            Err(err) => {
                self.filter_error = Some(err);
                Err(err)
            }
        }
    }

    /// Re-fetch with the current filter.
    pub fn refresh(&mut self) {
        self.phase = self.phase.on_refresh();
        self.fetcher.refresh(self.instance_id, &self.filter);
    }

    /// Returning to the screen from elsewhere in the shell re-fetches with
    /// the filter that was active when the user left.
    pub fn on_return(&mut self) {
        if self.phase != Phase::Uninitialized {
            self.refresh();
        }
    }

    /// Drain completed fetches. Each completion overwrites the snapshot
    /// unconditionally. Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.fetcher.poll() {
            self.apply(outcome);
            changed = true;
        }
        changed
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Data(resp) => {
                let resp = *resp;
                self.snapshot = Some(resp.dashboards);
                self.refresh_interval = resp.refresh_interval_secs.map(Duration::from_secs);
                self.last_error = None;
                self.phase = self.phase.on_data();
            }
            FetchOutcome::Failed(err) => {
                self.snapshot = None;
                self.last_error = Some(err.to_string());
                self.phase = self.phase.on_error();
            }
        }
        self.last_refresh = Instant::now();
    }

    /// Re-fetch on the cadence the server asked for, but only from `Ready`
    /// so an active cycle is never doubled up.
    pub fn maybe_auto_refresh(&mut self) {
        let Some(interval) = self.refresh_interval else {
            return;
        };
        if self.phase == Phase::Ready && self.last_refresh.elapsed() >= interval {
            tracing::debug!("auto refresh after {interval:?}");
            self.refresh();
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn filter_error(&self) -> Option<FilterError> {
        self.filter_error
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.filter_bar(ui);
        if let Some(err) = self.filter_error {
            ui.colored_label(Color32::from_rgb(0xc0, 0x39, 0x2b), err.to_string());
        }
        ui.separator();

        match self.phase {
            Phase::Uninitialized | Phase::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading dashboard…");
                });
            }
            Phase::Errored => {
                let message = self
                    .last_error
                    .clone()
                    .unwrap_or_else(|| "dashboard data unavailable".to_string());
                ui.colored_label(Color32::from_rgb(0xc0, 0x39, 0x2b), message);
            }
            Phase::Ready | Phase::Refreshing => {
                if self.phase == Phase::Refreshing {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Refreshing…");
                    });
                }
                if let Some(snapshot) = &self.snapshot {
                    summary_tiles(ui, &snapshot.summary, snapshot.currency_id, &self.currencies);
                    best_sellers(ui, snapshot, &self.currencies);
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        let mut surface = EguiChartSurface::new(ui);
                        charts::render_all(snapshot, &self.currencies, &mut surface);
                    });
                }
            }
        }
    }

    fn filter_bar(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;
        ui.horizontal(|ui| {
            for mode in FilterMode::ALL {
                let selected = self.filter.mode == mode;
                if ui.selectable_label(selected, mode.label()).clicked() {
                    clicked = Some(mode);
                }
            }
        });

        if self.filter.mode == FilterMode::Custom || clicked == Some(FilterMode::Custom) {
            ui.horizontal(|ui| {
                ui.label("From");
                ui.add(
                    egui::TextEdit::singleline(&mut self.custom_from)
                        .hint_text(DATE_FORMAT)
                        .desired_width(90.0),
                );
                ui.label("to");
                ui.add(
                    egui::TextEdit::singleline(&mut self.custom_to)
                        .hint_text(DATE_FORMAT)
                        .desired_width(90.0),
                );
                if ui.button("Apply").clicked() {
                    clicked = Some(FilterMode::Custom);
                } else if clicked == Some(FilterMode::Custom) {
                    // Selecting the tab only reveals the inputs; wait for Apply.
                    clicked = None;
                }
            });
        }

        if let Some(mode) = clicked {
            let (from, to) = if mode == FilterMode::Custom {
                (parse_date(&self.custom_from), parse_date(&self.custom_to))
            } else {
                (None, None)
            };
            let _ = self.set_filter(mode, from, to);
        }

        if let Some((from, to)) = self.filter.bounds() {
            ui.label(
                RichText::new(format!(
                    "From {} to {}",
                    from.format(DATE_FORMAT),
                    to.format(DATE_FORMAT)
                ))
                .weak(),
            );
        }
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

fn summary_tiles(
    ui: &mut egui::Ui,
    summary: &Summary,
    currency_id: Option<i64>,
    currencies: &CurrencyRegistry,
) {
    ui.horizontal(|ui| {
        tile(ui, "Orders", summary.total_orders.to_string());
        tile(
            ui,
            "Total Sales",
            currencies.format(currency_id, summary.total_sales),
        );
        tile(ui, "Pending Shipments", summary.pending_shipments.to_string());
        tile(
            ui,
            "Avg Order Value",
            currencies.format(currency_id, summary.avg_order_value),
        );
    });
}

fn tile(ui: &mut egui::Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).weak());
            ui.label(RichText::new(value).heading());
        });
    });
}

fn best_sellers(ui: &mut egui::Ui, snapshot: &DashboardSnapshot, currencies: &CurrencyRegistry) {
    if snapshot.best_sellers.is_empty() {
        return;
    }
    ui.collapsing("Best Sellers", |ui| {
        egui::Grid::new("best_sellers").striped(true).show(ui, |ui| {
            ui.label(RichText::new("Product").strong());
            ui.label(RichText::new("Qty").strong());
            ui.label(RichText::new("Sales").strong());
            ui.end_row();
            for seller in &snapshot.best_sellers {
                ui.label(&seller.name);
                ui.label(format!("{:.0}", seller.qty));
                ui.label(currencies.format(snapshot.currency_id, seller.sales));
                ui.end_row();
            }
        });
    });
}
