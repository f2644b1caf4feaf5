//! Live option chains from a Yahoo-Finance-style JSON quote endpoint.
//!
//! `GET {base}/v7/finance/options/{TICKER}` lists the available expirations;
//! each expiration is then fetched with `?date={epoch}`.

use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use odss_core::{ChainError, OptionChainProvider, OptionContract, OptionType};

/// Default quote endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainEnvelope {
    option_chain: ChainBody,
}

#[derive(Debug, Deserialize)]
struct ChainBody {
    #[serde(default)]
    result: Vec<ChainResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainResult {
    #[serde(default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<ExpirationSlice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpirationSlice {
    expiration_date: i64,
    #[serde(default)]
    calls: Vec<QuoteRow>,
    #[serde(default)]
    puts: Vec<QuoteRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteRow {
    contract_symbol: String,
    strike: f64,
    bid: Option<f64>,
    ask: Option<f64>,
}

/// Fetches chains over HTTP, rate limited per minute.
pub struct LiveChainProvider {
    http: Client,
    base_url: String,
    rate_limiter: Arc<DirectLimiter>,
}

impl LiveChainProvider {
    /// Creates a provider against `base_url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("odss/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(
                NonZeroU32::new(DEFAULT_REQUESTS_PER_MINUTE).unwrap_or(NonZeroU32::MIN),
            ))),
        })
    }

    /// Replaces the request budget. Zero keeps the current limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: u32) -> Self {
        if let Some(rpm) = NonZeroU32::new(requests_per_minute) {
            self.rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rpm)));
        }
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_chain(&self, ticker: &str, date: Option<i64>) -> Result<ChainResult, ChainError> {
        self.rate_limiter.until_ready().await;

        let mut url = format!("{}/v7/finance/options/{}", self.base_url, ticker);
        if let Some(date) = date {
            url = format!("{url}?date={date}");
        }
        debug!(%url, "GET option chain");

        let network = |message: String| ChainError::Network {
            ticker: ticker.to_string(),
            message,
        };

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(network(format!("status {status}: {text}")));
        }

        let envelope: ChainEnvelope = response.json().await.map_err(|e| ChainError::Malformed {
            ticker: ticker.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(error) = envelope.option_chain.error.filter(|e| !e.is_null()) {
            return Err(network(error.to_string()));
        }

        envelope
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| ChainError::NotFound {
                ticker: ticker.to_string(),
            })
    }
}

#[async_trait]
impl OptionChainProvider for LiveChainProvider {
    async fn fetch(&self, ticker: &str) -> Result<Vec<OptionContract>, ChainError> {
        let ticker = ticker.trim().to_uppercase();
        info!(ticker = %ticker, "Refreshing option chain");

        let index = self.get_chain(&ticker, None).await?;
        let mut contracts = Vec::new();
        for date in index.expiration_dates {
            let result = self.get_chain(&ticker, Some(date)).await?;
            for slice in &result.options {
                contracts.extend(contracts_from_slice(&ticker, slice));
            }
        }

        debug!(ticker = %ticker, contracts = contracts.len(), "Live chain assembled");
        Ok(contracts)
    }

    fn name(&self) -> &str {
        "live"
    }
}

/// Converts one expiration's quotes, dropping rows without a usable bid or ask.
fn contracts_from_slice(ticker: &str, slice: &ExpirationSlice) -> Vec<OptionContract> {
    let calls = slice.calls.iter().map(|q| (OptionType::Call, q));
    let puts = slice.puts.iter().map(|q| (OptionType::Put, q));

    calls
        .chain(puts)
        .filter_map(|(option_type, quote)| {
            let bid = quote.bid.and_then(to_decimal).filter(|b| *b > Decimal::ZERO)?;
            let ask = quote.ask.and_then(to_decimal)?;
            let strike = to_decimal(quote.strike)?;
            Some(OptionContract {
                contract_name: quote.contract_symbol.clone(),
                expiration: slice.expiration_date,
                ticker: ticker.to_string(),
                option_type,
                strike,
                bid,
                ask,
            })
        })
        .collect()
}

fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn slice_json(date: i64) -> serde_json::Value {
        serde_json::json!({
            "optionChain": {
                "result": [{
                    "expirationDates": [1795204800, 1797624000],
                    "options": [{
                        "expirationDate": date,
                        "calls": [
                            {
                                "contractSymbol": format!("PG{date}C150"),
                                "strike": 150.0,
                                "bid": 2.35,
                                "ask": 2.45
                            },
                            {
                                "contractSymbol": format!("PG{date}C200"),
                                "strike": 200.0,
                                "bid": 0.0,
                                "ask": 0.05
                            }
                        ],
                        "puts": [
                            {
                                "contractSymbol": format!("PG{date}P140"),
                                "strike": 140.0,
                                "bid": 1.1,
                                "ask": null
                            },
                            {
                                "contractSymbol": format!("PG{date}P135"),
                                "strike": 135.5,
                                "bid": 0.85,
                                "ask": 0.9
                            }
                        ]
                    }]
                }],
                "error": null
            }
        })
    }

    #[test]
    fn skips_rows_without_bid_or_ask() {
        let envelope: ChainEnvelope = serde_json::from_value(slice_json(1795204800)).unwrap();
        let result = &envelope.option_chain.result[0];
        let contracts = contracts_from_slice("PG", &result.options[0]);

        let names: Vec<_> = contracts.iter().map(|c| c.contract_name.as_str()).collect();
        assert_eq!(names, vec!["PG1795204800C150", "PG1795204800P135"]);
        assert_eq!(contracts[0].bid, dec!(2.35));
        assert_eq!(contracts[1].strike, dec!(135.5));
        assert_eq!(contracts[1].option_type, OptionType::Put);
        assert_eq!(contracts[1].expiration, 1_795_204_800);
    }

    #[test]
    fn converts_floats_exactly() {
        assert_eq!(to_decimal(0.1), Some(dec!(0.1)));
        assert_eq!(to_decimal(f64::NAN), None);
    }

    #[tokio::test]
    async fn fetches_every_expiration() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v7/finance/options/PG"))
            .and(query_param("date", "1795204800"))
            .respond_with(ResponseTemplate::new(200).set_body_json(slice_json(1795204800)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v7/finance/options/PG"))
            .and(query_param("date", "1797624000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(slice_json(1797624000)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v7/finance/options/PG"))
            .respond_with(ResponseTemplate::new(200).set_body_json(slice_json(1795204800)))
            .mount(&server)
            .await;

        let provider = LiveChainProvider::new(server.uri(), Duration::from_secs(5))
            .unwrap()
            .with_rate_limit(600);
        let contracts = provider.fetch("pg").await.unwrap();

        assert_eq!(contracts.len(), 4);
        assert!(contracts.iter().all(|c| c.ticker == "PG"));
        assert_eq!(contracts[2].expiration, 1_797_624_000);
    }

    #[tokio::test]
    async fn http_error_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let provider = LiveChainProvider::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = provider.fetch("ZZZZ").await.unwrap_err();
        assert!(matches!(err, ChainError::Network { .. }));
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "optionChain": {"result": [], "error": null}
            })))
            .mount(&server)
            .await;

        let provider = LiveChainProvider::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = provider.fetch("ZZZZ").await.unwrap_err();
        assert!(matches!(err, ChainError::NotFound { .. }));
    }
}
