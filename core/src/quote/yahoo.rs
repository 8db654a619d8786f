//! Yahoo Finance chart endpoint

use super::{LastPrice, QuoteSource};
use crate::error::{QuoteError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

/// Public Yahoo Finance host
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

// Yahoo answers 429 to clients that do not look like a browser.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) stock-agent";

/// Quote source backed by `GET /v8/finance/chart/{symbol}`
#[derive(Debug, Clone)]
pub struct YahooQuoteSource {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    currency: Option<String>,
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

impl YahooQuoteSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(YAHOO_BASE_URL)
    }

    /// Point the source at another host (mirrors, test servers)
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| QuoteError::Network {
            message: format!("invalid quote base URL '{}': {}", self.base_url, e),
        })?;
        url.path_segments_mut()
            .map_err(|_| QuoteError::Network {
                message: format!("quote base URL '{}' cannot hold a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");
        Ok(url)
    }
}

/// Interpret a chart response body for `symbol`
fn parse_chart(symbol: &str, status: StatusCode, body: &str) -> Result<LastPrice> {
    let envelope: Option<ChartEnvelope> = serde_json::from_str(body).ok();

    if let Some(error) = envelope.as_ref().and_then(|e| e.chart.error.as_ref()) {
        let message = error
            .description
            .clone()
            .or_else(|| error.code.clone())
            .unwrap_or_else(|| "unknown provider error".to_string());
        let not_found =
            status == StatusCode::NOT_FOUND || error.code.as_deref() == Some("Not Found");
        return Err(if not_found {
            QuoteError::UnknownSymbol {
                symbol: symbol.to_string(),
                message,
            }
        } else {
            QuoteError::Provider {
                status: status.as_u16(),
                message,
            }
        }
        .into());
    }

    if status == StatusCode::NOT_FOUND {
        return Err(QuoteError::UnknownSymbol {
            symbol: symbol.to_string(),
            message: "not found".to_string(),
        }
        .into());
    }

    if !status.is_success() {
        let message: String = body.chars().take(200).collect();
        return Err(QuoteError::Provider {
            status: status.as_u16(),
            message,
        }
        .into());
    }

    let envelope = envelope.ok_or_else(|| QuoteError::Provider {
        status: status.as_u16(),
        message: format!(
            "unreadable chart response: {}",
            body.chars().take(200).collect::<String>()
        ),
    })?;

    let meta = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|r| r.meta)
        .ok_or_else(|| QuoteError::UnknownSymbol {
            symbol: symbol.to_string(),
            message: "empty chart result".to_string(),
        })?;

    let price = meta
        .regular_market_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| QuoteError::MissingPrice {
            symbol: symbol.to_string(),
        })?;

    Ok(LastPrice {
        symbol: meta.symbol.unwrap_or_else(|| symbol.to_string()),
        price,
        currency: meta.currency,
    })
}

#[async_trait]
impl QuoteSource for YahooQuoteSource {
    async fn last_price(&self, symbol: &str) -> Result<LastPrice> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(QuoteError::UnknownSymbol {
                symbol: String::new(),
                message: "symbol must not be empty".to_string(),
            }
            .into());
        }

        let url = self.chart_url(symbol)?;
        tracing::debug!("Fetching quote for {} from {}", symbol, url);

        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| QuoteError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| QuoteError::Network {
            message: e.to_string(),
        })?;

        let quote = parse_chart(symbol, status, &body)?;
        tracing::info!("{} last traded at {}", quote.symbol, quote.price);
        Ok(quote)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const AAPL_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "exchangeName": "NMS",
                    "regularMarketPrice": 227.5234,
                    "previousClose": 225.0
                },
                "timestamp": [1729000000]
            }],
            "error": null
        }
    }"#;

    const UNKNOWN_BODY: &str = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
        }
    }"#;

    #[test]
    fn test_parses_regular_market_price() {
        let quote = parse_chart("AAPL", StatusCode::OK, AAPL_BODY).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 227.5234);
        assert_eq!(quote.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_unknown_symbol_fails() {
        let err = parse_chart("ZZZZZZ", StatusCode::NOT_FOUND, UNKNOWN_BODY).unwrap_err();
        match err {
            Error::Quote(QuoteError::UnknownSymbol { symbol, message }) => {
                assert_eq!(symbol, "ZZZZZZ");
                assert!(message.contains("delisted"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bare_404_is_unknown_symbol() {
        let err = parse_chart("ZZZZZZ", StatusCode::NOT_FOUND, "Not Found").unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn test_rate_limit_is_provider_error() {
        let err = parse_chart("AAPL", StatusCode::TOO_MANY_REQUESTS, "Too Many Requests")
            .unwrap_err();
        match err {
            Error::Quote(QuoteError::Provider { status, .. }) => assert_eq!(status, 429),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_json_success_is_provider_error() {
        let err = parse_chart("AAPL", StatusCode::OK, "<html>maintenance</html>").unwrap_err();
        match err {
            Error::Quote(QuoteError::Provider { status, message }) => {
                assert_eq!(status, 200);
                assert!(message.contains("maintenance"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_result_is_unknown_symbol() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        let err = parse_chart("ZZZZZZ", StatusCode::OK, body).unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn test_missing_price_is_not_fabricated() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"AAPL","currency":"USD"}}],"error":null}}"#;
        let err = parse_chart("AAPL", StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, Error::Quote(QuoteError::MissingPrice { .. })));
    }

    #[test]
    fn test_chart_url_encodes_symbol() {
        let source = YahooQuoteSource::with_base_url("http://localhost:9000/").unwrap();
        let url = source.chart_url("BRK B").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v8/finance/chart/BRK%20B?range=1d&interval=1d"
        );

        let url = YahooQuoteSource::new().unwrap().chart_url("BRK/B").unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/BRK%2FB");
    }

    #[tokio::test]
    async fn test_empty_symbol_fails_without_request() {
        let source = YahooQuoteSource::with_base_url("http://127.0.0.1:9").unwrap();
        let err = source.last_price("   ").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::UnknownSymbol { .. })
        ));
    }
}
