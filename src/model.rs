use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::currency::Currency;
use crate::filter::FilterState;

/// One named data series, e.g. per-instance daily totals in the sales chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    #[serde(default)]
    pub data: Vec<f64>,
}

/// A series slot entry. Pie slots carry plain numbers, line and bar slots
/// carry named sequences; the wire format mixes both shapes freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesEntry {
    Value(f64),
    Named(NamedSeries),
}

/// Payload of one chart slot. Either axis field may be empty or missing,
/// which means "no data" for that slot rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub series: Vec<SeriesEntry>,
}

impl ChartData {
    /// A slot is drawable only when it has series values and an axis.
    pub fn has_data(&self) -> bool {
        !self.series.is_empty() && (!self.categories.is_empty() || !self.labels.is_empty())
    }

    /// View of the series as named sequences. Plain values collapse into a
    /// single unnamed series, preserving their order.
    pub fn named_series(&self) -> Vec<NamedSeries> {
        let mut named = Vec::new();
        let mut plain = Vec::new();
        for entry in &self.series {
            match entry {
                SeriesEntry::Value(v) => plain.push(*v),
                SeriesEntry::Named(s) => named.push(s.clone()),
            }
        }
        if !plain.is_empty() {
            named.push(NamedSeries {
                name: String::new(),
                data: plain,
            });
        }
        named
    }

    /// View of the series as one value per label, for pie slots. A named
    /// sequence contributes its total.
    pub fn values(&self) -> Vec<f64> {
        self.series
            .iter()
            .map(|entry| match entry {
                SeriesEntry::Value(v) => *v,
                SeriesEntry::Named(s) => s.data.iter().sum(),
            })
            .collect()
    }
}

/// Servers without data for a slot may send `[]` or `null` instead of an
/// object; both collapse to `None` here.
fn chart_or_none<'de, D>(deserializer: D) -> Result<Option<ChartData>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Aggregate tiles shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_sales: f64,
    #[serde(default)]
    pub pending_shipments: u64,
    #[serde(default)]
    pub avg_order_value: f64,
}

/// Top selling product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSeller {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub qty: f64,
    #[serde(default)]
    pub sales: f64,
}

/// The full metric set returned by one data fetch. Replaced wholesale on
/// every refresh; the previous snapshot is discarded, never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub currency_id: Option<i64>,
    #[serde(default, deserialize_with = "chart_or_none")]
    pub sale_series: Option<ChartData>,
    #[serde(default, deserialize_with = "chart_or_none")]
    pub country_series: Option<ChartData>,
    #[serde(default, deserialize_with = "chart_or_none")]
    pub category_series: Option<ChartData>,
    #[serde(default, deserialize_with = "chart_or_none")]
    pub instance_series: Option<ChartData>,
    #[serde(default, deserialize_with = "chart_or_none")]
    pub revenue_series: Option<ChartData>,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub best_sellers: Vec<BestSeller>,
}

/// Response of the data endpoint: the snapshot plus the cadence at which the
/// server wants the client to re-fetch it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataResponse {
    #[serde(default)]
    pub dashboards: DashboardSnapshot,
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
}

/// Server-supplied defaults resolved before the first data fetch: the
/// initial date filter plus the currency table used by the formatters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOptions {
    pub filter: FilterState,
    #[serde(default)]
    pub currencies: HashMap<i64, Currency>,
}

/// One marketplace instance as shown in the tray dropdown. Only used for
/// display and click-through navigation; never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceEntity {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub res_model: String,
    #[serde(default)]
    pub marketplace_type: Option<String>,
    #[serde(default)]
    pub order_count: Option<u64>,
    #[serde(default)]
    pub listing_count: Option<u64>,
    #[serde(default)]
    pub total_revenue: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Kanban,
    Form,
}

/// Outbound navigation action emitted when a tray entry is clicked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub name: String,
    pub res_model: String,
    pub view_modes: Vec<ViewMode>,
    pub domain: Vec<(String, String, i64)>,
}

impl NavigationRequest {
    pub fn for_entity(entity: &MarketplaceEntity) -> Self {
        Self {
            name: entity.name.clone(),
            res_model: entity.res_model.clone(),
            view_modes: vec![ViewMode::Kanban, ViewMode::Form],
            domain: vec![("id".to_string(), "=".to_string(), entity.id)],
        }
    }

    /// Record id pinned by the domain, when the request targets one.
    pub fn target_id(&self) -> Option<i64> {
        self.domain
            .iter()
            .find(|(field, op, _)| field == "id" && op == "=")
            .map(|(_, _, id)| *id)
    }
}
