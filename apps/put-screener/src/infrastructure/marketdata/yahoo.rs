//! Yahoo Finance Market Data Adapter
//!
//! HTTP implementation of `MarketDataPort` over the Yahoo Finance v7 options
//! endpoint. One request returns the underlying quote, the expiration list
//! and the chain of one expiration.
//!
//! The endpoint requires a session crumb: the adapter collects the session
//! cookie, fetches a crumb once, appends it to every request and refreshes it
//! when a request is rejected with 401.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::config::{MarketDataConfig, RetrySettings};
use crate::domain::OptionContract;

use super::api_types::{OptionChainResult, OptionsResponse, YahooContract};
use super::retry::{ErrorCategory, ExponentialBackoff, categorize_status};

/// Yahoo Finance market data adapter.
#[derive(Debug, Clone)]
pub struct YahooMarketDataAdapter {
    client: Client,
    base_url: String,
    cookie_url: String,
    retry: RetrySettings,
    crumb: Arc<tokio::sync::Mutex<Option<String>>>,
    /// Expirations returned alongside the last price lookup, keyed by symbol.
    listed: Arc<Mutex<HashMap<String, Vec<NaiveDate>>>>,
}

impl YahooMarketDataAdapter {
    /// Create a new adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(|e| MarketDataError::ConnectionError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_url: config.cookie_url.clone(),
            retry: config.retry.clone(),
            crumb: Arc::new(tokio::sync::Mutex::new(None)),
            listed: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Cached crumb, fetched on first use.
    async fn crumb(&self) -> Option<String> {
        let mut crumb = self.crumb.lock().await;
        if crumb.is_none() {
            *crumb = self.fetch_crumb().await;
        }
        crumb.clone()
    }

    /// Drop the cached crumb and fetch a new one.
    async fn refresh_crumb(&self) -> Option<String> {
        let mut crumb = self.crumb.lock().await;
        *crumb = self.fetch_crumb().await;
        crumb.clone()
    }

    /// Session handshake. Failures are logged and requests go out without
    /// a crumb.
    async fn fetch_crumb(&self) -> Option<String> {
        // The cookie page answers 404 but still sets the session cookie.
        if let Err(e) = self.client.get(&self.cookie_url).send().await {
            tracing::warn!(error = %e, "Failed to obtain market data session cookie");
        }

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "Crumb request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Crumb request rejected");
            return None;
        }

        match response.text().await {
            Ok(text) if is_crumb(text.trim()) => {
                tracing::debug!("Obtained market data crumb");
                Some(text.trim().to_string())
            }
            Ok(_) => {
                tracing::warn!("Crumb response was empty or not a crumb");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read crumb response");
                None
            }
        }
    }

    /// Fetch the chain result for `symbol`, optionally for one expiration.
    async fn fetch(
        &self,
        symbol: &str,
        expiration: Option<NaiveDate>,
    ) -> Result<OptionChainResult, MarketDataError> {
        let symbol = symbol.to_uppercase();
        let url = format!("{}/v7/finance/options/{symbol}", self.base_url);
        let mut backoff = ExponentialBackoff::new(&self.retry);
        let mut crumb = self.crumb().await;
        let mut refreshed = false;

        loop {
            let mut request = self.client.get(&url);
            if let Some(date) = expiration {
                request = request.query(&[("date", expiration_timestamp(date))]);
            }
            if let Some(crumb) = &crumb {
                request = request.query(&[("crumb", crumb.as_str())]);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(MarketDataError::ConnectionError {
                        message: format!("{e} after {} attempts", backoff.attempt),
                    });
                }
            };

            let status = response.status();

            if status.is_success() {
                let body: OptionsResponse =
                    response
                        .json()
                        .await
                        .map_err(|e| MarketDataError::ApiError {
                            message: format!("Invalid options response: {e}"),
                        })?;
                return into_result(&symbol, body);
            }

            // One refresh per request; a second 401 is reported as an API error.
            if status == StatusCode::UNAUTHORIZED && !refreshed {
                refreshed = true;
                tracing::info!(symbol = %symbol, "Crumb rejected, refreshing session");
                crumb = self.refresh_crumb().await;
                continue;
            }

            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();

            match categorize_status(status) {
                ErrorCategory::RateLimited => {
                    let ceiling = Duration::from_millis(self.retry.max_backoff_ms);
                    let delay = backoff.next_backoff().map(|d| {
                        retry_after.map_or(d, |secs| Duration::from_secs(secs).min(ceiling))
                    });
                    if let Some(delay) = delay {
                        tracing::warn!(
                            symbol = %symbol,
                            delay_ms = delay.as_millis(),
                            "Rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(MarketDataError::RateLimited {
                        retry_after_secs: retry_after.unwrap_or(60),
                    });
                }
                ErrorCategory::Retryable => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            symbol = %symbol,
                            status = status.as_u16(),
                            delay_ms = delay.as_millis(),
                            "Retryable error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(MarketDataError::DataUnavailable {
                        message: format!(
                            "HTTP {} after {} attempts",
                            status.as_u16(),
                            backoff.attempt
                        ),
                    });
                }
                ErrorCategory::NonRetryable => {
                    return match status {
                        StatusCode::NOT_FOUND => Err(MarketDataError::SymbolNotFound { symbol }),
                        _ => Err(MarketDataError::ApiError {
                            message: format!("HTTP {}: {error_body}", status.as_u16()),
                        }),
                    };
                }
            }
        }
    }
}

/// Crumbs are short opaque tokens; an HTML or JSON body means the handshake
/// was redirected.
fn is_crumb(text: &str) -> bool {
    !text.is_empty() && text.len() <= 64 && !text.contains(['<', '{', ' '])
}

fn listed_expirations(result: &OptionChainResult) -> Vec<NaiveDate> {
    result
        .expiration_dates
        .iter()
        .copied()
        .filter_map(timestamp_date)
        .collect()
}

/// Yahoo keys expirations by midnight UTC.
fn expiration_timestamp(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

fn timestamp_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

fn into_result(symbol: &str, body: OptionsResponse) -> Result<OptionChainResult, MarketDataError> {
    if let Some(error) = body.option_chain.error {
        return Err(MarketDataError::ApiError {
            message: format!("{}: {}", error.code, error.description),
        });
    }
    body.option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })
}

fn to_decimal(value: Option<f64>) -> Decimal {
    value
        .filter(|v| v.is_finite())
        .and_then(|v| Decimal::try_from(v).ok())
        .unwrap_or(Decimal::ZERO)
}

fn to_contract(symbol: &str, expiration: NaiveDate, raw: &YahooContract) -> Option<OptionContract> {
    let strike = Decimal::try_from(raw.strike).ok()?;
    let expiration_date = raw
        .expiration
        .and_then(timestamp_date)
        .unwrap_or(expiration);

    Some(OptionContract {
        symbol: symbol.to_string(),
        expiration_date,
        strike,
        bid: to_decimal(raw.bid),
        ask: to_decimal(raw.ask),
        last_price: to_decimal(raw.last_price),
        implied_volatility: raw.implied_volatility.filter(|v| v.is_finite()),
    })
}

#[async_trait]
impl MarketDataPort for YahooMarketDataAdapter {
    async fn current_price(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
        let result = self.fetch(symbol, None).await?;
        self.listed
            .lock()
            .insert(symbol.to_uppercase(), listed_expirations(&result));

        let price = result
            .quote
            .and_then(|q| q.regular_market_price)
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| MarketDataError::DataUnavailable {
                message: format!("No market price for {symbol}"),
            })?;

        Decimal::try_from(price).map_err(|e| MarketDataError::ApiError {
            message: format!("Unrepresentable price {price}: {e}"),
        })
    }

    /// Served from the preceding price lookup when there is one.
    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, MarketDataError> {
        let cached = self.listed.lock().remove(&symbol.to_uppercase());
        if let Some(listed) = cached {
            return Ok(listed);
        }
        let result = self.fetch(symbol, None).await?;
        Ok(listed_expirations(&result))
    }

    async fn option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<Vec<OptionContract>, MarketDataError> {
        let result = self.fetch(symbol, Some(expiration)).await?;
        let underlying = if result.underlying_symbol.is_empty() {
            symbol.to_uppercase()
        } else {
            result.underlying_symbol.clone()
        };

        let contracts = result
            .options
            .iter()
            .flat_map(|table| table.puts.iter())
            .filter_map(|raw| to_contract(&underlying, expiration, raw))
            .collect::<Vec<_>>();

        tracing::debug!(
            symbol = %underlying,
            expiration = %expiration,
            puts = contracts.len(),
            "Fetched put chain"
        );
        Ok(contracts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiration_timestamp_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        assert_eq!(expiration_timestamp(date), 1_755_216_000);
        assert_eq!(timestamp_date(1_755_216_000), Some(date));
    }

    #[test]
    fn contract_conversion_defaults_missing_quotes() {
        let raw = YahooContract {
            contract_symbol: "AAPL250815P00195000".to_string(),
            strike: 195.0,
            bid: None,
            ask: Some(1.1),
            last_price: Some(1.05),
            implied_volatility: Some(f64::NAN),
            expiration: None,
        };
        let date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();

        let contract = to_contract("AAPL", date, &raw).unwrap();
        assert_eq!(contract.bid, Decimal::ZERO);
        assert_eq!(contract.ask, Decimal::new(11, 1));
        assert_eq!(contract.expiration_date, date);
        assert!(contract.implied_volatility.is_none());
    }

    #[test]
    fn crumb_shape() {
        assert!(is_crumb("Xq1.bZ/9sPk"));
        assert!(!is_crumb(""));
        assert!(!is_crumb("<html><body>Consent</body></html>"));
        assert!(!is_crumb(r#"{"finance":{"error":"Unauthorized"}}"#));
    }

    #[test]
    fn provider_error_is_api_error() {
        let body: OptionsResponse = serde_json::from_str(
            r#"{"optionChain":{"result":[],"error":{"code":"Bad Request","description":"Invalid date"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            into_result("AAPL", body),
            Err(MarketDataError::ApiError { .. })
        ));
    }

    #[test]
    fn empty_result_is_symbol_not_found() {
        let body: OptionsResponse =
            serde_json::from_str(r#"{"optionChain":{"result":[],"error":null}}"#).unwrap();
        assert!(matches!(
            into_result("ZZZZ", body),
            Err(MarketDataError::SymbolNotFound { .. })
        ));
    }
}
