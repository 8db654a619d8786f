//! Market data sources for the price lookup tool

pub mod yahoo;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use yahoo::YahooQuoteSource;

/// Last traded price as reported by a quote source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastPrice {
    /// Ticker symbol the provider answered for
    pub symbol: String,

    /// Unrounded last traded price
    pub price: f64,

    /// Currency the provider quotes in, if it says
    pub currency: Option<String>,
}

/// A source of live quotes
///
/// Implementations make exactly one outbound request per call and never
/// retry or substitute symbols; failures surface as [`crate::error::QuoteError`].
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the last traded price for `symbol`
    async fn last_price(&self, symbol: &str) -> Result<LastPrice>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}
