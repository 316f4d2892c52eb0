use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::filter::FilterState;
use crate::gateway::{DataGateway, GatewayError};
use crate::model::DataResponse;

/// Result of one refresh cycle, delivered back on the UI thread.
#[derive(Debug)]
pub enum FetchOutcome {
    Data(Box<DataResponse>),
    Failed(GatewayError),
}

/// Issues one remote call per refresh on a worker thread and hands the
/// outcome back over a channel.
///
/// There is no debouncing and no cancellation: overlapping refreshes all
/// complete, and because every completion overwrites the stored snapshot,
/// the last call to *resolve* wins — not the last one issued. Known race,
/// kept on purpose.
pub struct DataFetcher {
    gateway: Arc<dyn DataGateway>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    in_flight: Arc<AtomicUsize>,
}

impl DataFetcher {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        let (tx, rx) = channel();
        Self {
            gateway,
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start one fetch for the given instance and filter. Exactly one
    /// gateway call is made per invocation.
    pub fn refresh(&self, instance_id: Option<i64>, filter: &FilterState) {
        let (date_from, date_to) = (filter.date_from, filter.date_to);
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);
        thread::spawn(move || {
            let outcome = match gateway.dashboard_data(instance_id, date_from, date_to) {
                Ok(resp) => FetchOutcome::Data(Box::new(resp)),
                Err(err) => {
                    tracing::warn!("dashboard data fetch failed: {err}");
                    FetchOutcome::Failed(err)
                }
            };
            in_flight.fetch_sub(1, Ordering::SeqCst);
            // The receiver only goes away on widget teardown; a send error
            // then just drops a stale result.
            let _ = tx.send(outcome);
        });
    }

    /// Next completed outcome, if any. Outcomes arrive in resolution order.
    pub fn poll(&self) -> Option<FetchOutcome> {
        self.rx.try_recv().ok()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;
    use crate::gateway::GatewayError;
    use crate::model::{DashboardOptions, DashboardSnapshot, MarketplaceEntity};
    use chrono::NaiveDate;
    use std::sync::mpsc::{sync_channel, SyncSender};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Gateway fake whose data calls block until the test releases them,
    /// so resolution order is controlled explicitly.
    struct GatedGateway {
        calls: Mutex<Vec<(Option<i64>, Option<NaiveDate>, Option<NaiveDate>)>>,
        gates: Mutex<Vec<std::sync::mpsc::Receiver<DataResponse>>>,
    }

    impl GatedGateway {
        fn new() -> (Arc<Self>, Vec<SyncSender<DataResponse>>) {
            let mut receivers = Vec::new();
            let mut senders = Vec::new();
            for _ in 0..4 {
                let (tx, rx) = sync_channel(1);
                senders.push(tx);
                receivers.push(rx);
            }
            receivers.reverse();
            (
                Arc::new(Self {
                    calls: Mutex::new(Vec::new()),
                    gates: Mutex::new(receivers),
                }),
                senders,
            )
        }
    }

    impl DataGateway for GatedGateway {
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
            instance_id: Option<i64>,
            date_from: Option<NaiveDate>,
            date_to: Option<NaiveDate>,
        ) -> Result<DataResponse, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((instance_id, date_from, date_to));
            let gate = self.gates.lock().unwrap().pop().expect("gate available");
            Ok(gate.recv().expect("gate released"))
        }

        fn systray_marketplaces(&self) -> Result<Vec<MarketplaceEntity>, GatewayError> {
            Ok(Vec::new())
        }

        fn user_in_group(&self, _group: &str) -> Result<bool, GatewayError> {
            Ok(true)
        }
    }

    fn snapshot_with_orders(total_orders: u64) -> DataResponse {
        DataResponse {
            dashboards: DashboardSnapshot {
                summary: crate::model::Summary {
                    total_orders,
                    ..Default::default()
                },
                ..Default::default()
            },
            refresh_interval_secs: None,
        }
    }

    fn wait_for_outcomes(fetcher: &DataFetcher, n: usize) -> Vec<FetchOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = Vec::new();
        while outcomes.len() < n {
            if let Some(outcome) = fetcher.poll() {
                outcomes.push(outcome);
            } else {
                assert!(Instant::now() < deadline, "timed out waiting for fetches");
                thread::sleep(Duration::from_millis(5));
            }
        }
        outcomes
    }

    #[test]
    fn one_gateway_call_per_refresh_with_ordered_bounds() {
        let (gateway, gates) = GatedGateway::new();
        let fetcher = DataFetcher::new(gateway.clone());

        let mut filter = FilterState::default();
        filter
            .set_filter_from(
                FilterMode::Week,
                None,
                None,
                NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            )
            .unwrap();
        fetcher.refresh(Some(3), &filter);
        gates[0].send(snapshot_with_orders(1)).unwrap();
        wait_for_outcomes(&fetcher, 1);

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (instance, from, to) = calls[0];
        assert_eq!(instance, Some(3));
        assert!(from.unwrap() <= to.unwrap());
    }

    #[test]
    fn overlapping_refreshes_resolve_in_release_order() {
        let (gateway, gates) = GatedGateway::new();
        let fetcher = DataFetcher::new(gateway.clone());
        let filter = FilterState::default();

        fetcher.refresh(None, &filter);
        fetcher.refresh(None, &filter);

        // Wait until both worker threads have claimed their gates.
        let deadline = Instant::now() + Duration::from_secs(5);
        while gateway.calls.lock().unwrap().len() < 2 {
            assert!(Instant::now() < deadline, "workers never started");
            thread::sleep(Duration::from_millis(5));
        }

        // Release the second call first and drain it before releasing the
        // first, so resolution order is fixed regardless of scheduling.
        let orders = |outcomes: Vec<FetchOutcome>| -> Vec<u64> {
            outcomes
                .iter()
                .map(|o| match o {
                    FetchOutcome::Data(resp) => resp.dashboards.summary.total_orders,
                    FetchOutcome::Failed(err) => panic!("unexpected failure: {err}"),
                })
                .collect()
        };
        gates[1].send(snapshot_with_orders(2)).unwrap();
        assert_eq!(orders(wait_for_outcomes(&fetcher, 1)), vec![2]);
        gates[0].send(snapshot_with_orders(1)).unwrap();
        assert_eq!(orders(wait_for_outcomes(&fetcher, 1)), vec![1]);
        assert_eq!(fetcher.in_flight(), 0);
    }
}
