use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::filter::FilterState;
use crate::model::{DashboardOptions, DataResponse, MarketplaceEntity};

/// Remote call failures. Every variant is terminal for the operation that
/// produced it; retrying is always a new user-initiated action.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned http status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed server response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

/// Seam to the backend. The dashboard and tray widgets only ever talk to
/// this trait, so tests substitute recording fakes for the real transport.
pub trait DataGateway: Send + Sync {
    /// Default filter state and currency table for the dashboard screen.
    /// `previous` carries the current selection so the server can keep it.
    fn dashboard_options(
        &self,
        instance_id: Option<i64>,
        previous: Option<&FilterState>,
    ) -> Result<DashboardOptions, GatewayError>;

    /// Aggregated metrics for one instance (or all, when `instance_id` is
    /// `None`) over the given date range.
    fn dashboard_data(
        &self,
        instance_id: Option<i64>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<DataResponse, GatewayError>;

    /// Instances to list in the tray dropdown.
    fn systray_marketplaces(&self) -> Result<Vec<MarketplaceEntity>, GatewayError>;

    /// Whether the current user belongs to the named access group.
    fn user_in_group(&self, group: &str) -> Result<bool, GatewayError>;
}

#[derive(Serialize)]
struct OptionsBody<'a> {
    instance_id: Option<i64>,
    previous: Option<&'a FilterState>,
}

#[derive(Serialize)]
struct DataBody {
    mk_instance_id: Option<i64>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

/// JSON-over-HTTP gateway against the backend server.
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(base: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("mk-dashboard client")
            .build()?;
        Ok(Self {
            client,
            base: Url::parse(base)?,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.base.join(path)?;
        let resp = self.client.get(url).send()?;
        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status()));
        }
        let bytes = resp.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let url = self.base.join(path)?;
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?)
            .send()?;
        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status()));
        }
        let bytes = resp.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl DataGateway for HttpGateway {
    fn dashboard_options(
        &self,
        instance_id: Option<i64>,
        previous: Option<&FilterState>,
    ) -> Result<DashboardOptions, GatewayError> {
        self.post_json(
            "mk_dashboard/options",
            &OptionsBody {
                instance_id,
                previous,
            },
        )
    }

    fn dashboard_data(
        &self,
        instance_id: Option<i64>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<DataResponse, GatewayError> {
        self.post_json(
            "mk_dashboard/data",
            &DataBody {
                mk_instance_id: instance_id,
                date_from,
                date_to,
            },
        )
    }

    fn systray_marketplaces(&self) -> Result<Vec<MarketplaceEntity>, GatewayError> {
        self.get_json("mk_dashboard/systray")
    }

    fn user_in_group(&self, group: &str) -> Result<bool, GatewayError> {
        let mut url = self.base.join("mk_dashboard/has_group")?;
        url.query_pairs_mut().append_pair("name", group);
        let resp = self.client.get(url).send()?;
        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status()));
        }
        let bytes = resp.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_under_the_base() {
        let gateway = HttpGateway::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(
            gateway.base.join("mk_dashboard/data").unwrap().as_str(),
            "http://127.0.0.1:8000/mk_dashboard/data"
        );
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        assert!(matches!(
            HttpGateway::new("not a url"),
            Err(GatewayError::Url(_))
        ));
    }

    #[test]
    fn data_body_serializes_dates_as_iso() {
        let body = DataBody {
            mk_instance_id: Some(4),
            date_from: NaiveDate::from_ymd_opt(2026, 8, 1),
            date_to: NaiveDate::from_ymd_opt(2026, 8, 5),
        };
        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(wire["mk_instance_id"], 4);
        assert_eq!(wire["date_from"], "2026-08-01");
        assert_eq!(wire["date_to"], "2026-08-05");
    }
}
