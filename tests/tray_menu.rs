use chrono::NaiveDate;
use mk_dashboard::filter::FilterState;
use mk_dashboard::gateway::{DataGateway, GatewayError};
use mk_dashboard::model::{DashboardOptions, DataResponse, MarketplaceEntity, ViewMode};
use mk_dashboard::tray::TrayMenu;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct CountingGateway {
    in_group: bool,
    group_checks: AtomicUsize,
    systray_calls: AtomicUsize,
}

impl CountingGateway {
    fn new(in_group: bool) -> Self {
        Self {
            in_group,
            group_checks: AtomicUsize::new(0),
            systray_calls: AtomicUsize::new(0),
        }
    }
}

impl DataGateway for CountingGateway {
    fn dashboard_options(
        &self,
        _instance_id: Option<i64>,
        _previous: Option<&FilterState>,
    ) -> Result<DashboardOptions, GatewayError> {
        Ok(DashboardOptions {
            filter: FilterState::default(),
            currencies: Default::default(),
        })
    }

    fn dashboard_data(
        &self,
        _instance_id: Option<i64>,
        _date_from: Option<NaiveDate>,
        _date_to: Option<NaiveDate>,
    ) -> Result<DataResponse, GatewayError> {
        Ok(DataResponse::default())
    }

    fn systray_marketplaces(&self) -> Result<Vec<MarketplaceEntity>, GatewayError> {
        let n = self.systray_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(vec![
            MarketplaceEntity {
                id: 1,
                name: format!("Store {n}"),
                model: "mk.instance".into(),
                res_model: "mk.instance".into(),
                marketplace_type: Some("shopify".into()),
                order_count: Some(n as u64),
                listing_count: None,
                total_revenue: None,
            },
            MarketplaceEntity {
                id: 2,
                name: "Outlet".into(),
                model: "mk.instance".into(),
                res_model: "mk.instance".into(),
                marketplace_type: None,
                order_count: None,
                listing_count: None,
                total_revenue: None,
            },
        ])
    }

    fn user_in_group(&self, _group: &str) -> Result<bool, GatewayError> {
        self.group_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.in_group)
    }
}

#[test]
fn reopening_refetches_and_rerenders_the_list() {
    let gateway = Arc::new(CountingGateway::new(true));
    let mut tray = TrayMenu::new(gateway.clone());

    tray.open();
    assert_eq!(gateway.systray_calls.load(Ordering::SeqCst), 1);
    assert_eq!(tray.entries()[0].name, "Store 1");

    // Close, reopen: one more fetch, fresh data replaces the old list.
    tray.open();
    assert_eq!(gateway.systray_calls.load(Ordering::SeqCst), 2);
    assert_eq!(tray.entries()[0].name, "Store 2");
    assert_eq!(tray.entries().len(), 2);
}

#[test]
fn visibility_is_checked_once_and_never_again() {
    let gateway = Arc::new(CountingGateway::new(false));
    let mut tray = TrayMenu::new(gateway.clone());
    assert!(!tray.is_visible());
    assert_eq!(gateway.group_checks.load(Ordering::SeqCst), 1);

    // Opening and clicking around later never re-evaluates the gate.
    tray.open();
    tray.open();
    assert_eq!(gateway.group_checks.load(Ordering::SeqCst), 1);
}

#[test]
fn item_click_targets_the_entity_record() {
    let gateway = Arc::new(CountingGateway::new(true));
    let mut tray = TrayMenu::new(gateway);
    tray.open();

    let entity = tray.entries()[1].clone();
    let nav = tray.on_item_click(&entity);
    assert_eq!(nav.name, "Outlet");
    assert_eq!(nav.res_model, "mk.instance");
    assert_eq!(nav.view_modes, vec![ViewMode::Kanban, ViewMode::Form]);
    assert_eq!(nav.target_id(), Some(2));

    let wire = serde_json::to_value(&nav).unwrap();
    assert_eq!(wire["domain"], serde_json::json!([["id", "=", 2]]));
}
