use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::error::{ExportError, Result};
use crate::core::price::{ChartRange, PriceProvider, PriceRecord};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the IEX Cloud `/stock/{symbol}/chart/{range}` endpoint.
pub struct IexProvider {
    base_url: Url,
    token: String,
    client: reqwest::Client,
}

impl IexProvider {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let invalid = |reason: String| ExportError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let base_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("iexport/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ExportError::HttpClient)?;

        Ok(IexProvider {
            base_url,
            token: token.to_string(),
            client,
        })
    }

    fn chart_url(&self, symbol: &str, range: ChartRange) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&symbol.to_lowercase())
                .push("chart")
                .push(&range.to_string());
        }
        url.query_pairs_mut().append_pair("chartCloseOnly", "true");
        url
    }
}

#[derive(Deserialize, Debug)]
struct IexChartPoint {
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    close: Option<Value>,
}

fn value_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl PriceProvider for IexProvider {
    #[instrument(
        name = "IexChartFetch",
        skip(self),
        fields(symbol = %symbol, range = %range)
    )]
    async fn fetch_history(&self, symbol: &str, range: ChartRange) -> Result<Vec<PriceRecord>> {
        let mut url = self.chart_url(symbol, range);
        debug!("Requesting price history from {}", url);
        url.query_pairs_mut().append_pair("token", &self.token);

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| ExportError::Network {
                    symbol: symbol.to_string(),
                    source: source.without_url(),
                })?;

        let status = response.status();
        debug!(status = %status, "Received IEX response");

        let body = response
            .text()
            .await
            .map_err(|source| ExportError::Network {
                symbol: symbol.to_string(),
                source: source.without_url(),
            })?;

        if !status.is_success() {
            return Err(ExportError::Api {
                symbol: symbol.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let points: Vec<IexChartPoint> =
            serde_json::from_str(&body).map_err(|e| ExportError::MalformedResponse {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        if points.is_empty() {
            warn!("No price history returned for {}", symbol);
        }

        Ok(points
            .into_iter()
            .map(|p| PriceRecord {
                symbol: symbol.to_string(),
                date: value_text(p.date),
                close: value_text(p.close),
            })
            .collect())
    }
}
