use crate::currency::CurrencyRegistry;
use crate::model::{ChartData, DashboardSnapshot, NamedSeries};

mod egui_surface;

pub use egui_surface::EguiChartSurface;

/// Placeholder shown in a slot whose series or axis came back empty. The
/// underlying chart widgets render a broken empty frame otherwise, so the
/// text stands in for the whole slot.
pub const NO_DATA_TEXT: &str = "No data to display!!!";

pub const SALES_SLOT: &str = "Total Selling";
pub const COUNTRY_SLOT: &str = "Country wise Selling";
pub const CATEGORY_SLOT: &str = "Category wise Selling";
pub const INSTANCE_SLOT: &str = "Instance wise Selling";
pub const REVENUE_SLOT: &str = "Marketplace Revenue";

/// Rendering backend for the five dashboard slots, one entry point per
/// chart kind. Widgets call these; what "drawing" means is up to the
/// implementation, which keeps the slot logic testable without a real
/// charting backend.
pub trait ChartSurface {
    fn line_chart(
        &mut self,
        slot: &str,
        categories: &[String],
        series: &[NamedSeries],
        fmt: &dyn Fn(f64) -> String,
    );

    fn pie_chart(
        &mut self,
        slot: &str,
        labels: &[String],
        values: &[f64],
        fmt: &dyn Fn(f64) -> String,
    );

    fn bar_chart(
        &mut self,
        slot: &str,
        categories: &[String],
        series: &[NamedSeries],
        fmt: &dyn Fn(f64) -> String,
    );

    fn placeholder(&mut self, slot: &str, text: &str);

    /// Layout-reflow nudge, emitted once after all slots have rendered.
    /// Charts size themselves from the container at draw time and need it.
    fn reflow(&mut self);
}

fn drawable(chart: Option<&ChartData>) -> Option<&ChartData> {
    chart.filter(|c| c.has_data())
}

/// Draw all five slots independently, empty ones as placeholders, then emit
/// exactly one reflow notification.
pub fn render_all(
    snapshot: &DashboardSnapshot,
    currencies: &CurrencyRegistry,
    surface: &mut dyn ChartSurface,
) {
    let fmt = |value: f64| currencies.format(snapshot.currency_id, value);

    match drawable(snapshot.sale_series.as_ref()) {
        Some(chart) => surface.line_chart(SALES_SLOT, &chart.categories, &chart.named_series(), &fmt),
        None => surface.placeholder(SALES_SLOT, NO_DATA_TEXT),
    }
    match drawable(snapshot.country_series.as_ref()) {
        Some(chart) => surface.pie_chart(COUNTRY_SLOT, &chart.labels, &chart.values(), &fmt),
        None => surface.placeholder(COUNTRY_SLOT, NO_DATA_TEXT),
    }
    match drawable(snapshot.category_series.as_ref()) {
        Some(chart) => surface.pie_chart(CATEGORY_SLOT, &chart.labels, &chart.values(), &fmt),
        None => surface.placeholder(CATEGORY_SLOT, NO_DATA_TEXT),
    }
    match drawable(snapshot.instance_series.as_ref()) {
        Some(chart) => surface.bar_chart(INSTANCE_SLOT, &chart.categories, &chart.named_series(), &fmt),
        None => surface.placeholder(INSTANCE_SLOT, NO_DATA_TEXT),
    }
    match drawable(snapshot.revenue_series.as_ref()) {
        Some(chart) => surface.pie_chart(REVENUE_SLOT, &chart.labels, &chart.values(), &fmt),
        None => surface.placeholder(REVENUE_SLOT, NO_DATA_TEXT),
    }

    surface.reflow();
}
