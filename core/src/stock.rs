//! Stock price records exchanged between the tool, the model and the front ends

use crate::quote::LastPrice;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// The only currency this deployment reports in
pub const SUPPORTED_CURRENCY: &str = "USD";

fn default_currency() -> String {
    SUPPORTED_CURRENCY.to_string()
}

/// Round to two decimal places, half to even
///
/// Rounds the exact binary value, so 2.675 (stored as 2.67499...) gives 2.67.
/// Non-finite input is returned unchanged.
pub fn round_price(price: f64) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(price) else {
        return price;
    };
    let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.to_string().parse().unwrap_or(price)
}

/// What the price lookup tool hands back to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub price: f64,
    pub currency: String,
}

impl From<&LastPrice> for StockQuote {
    fn from(last: &LastPrice) -> Self {
        // Provider currency is ignored: the deployment only speaks USD.
        Self {
            price: round_price(last.price),
            currency: SUPPORTED_CURRENCY.to_string(),
        }
    }
}

/// Structured answer the agent produces for a stock question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPriceResult {
    /// Ticker symbol, uppercase by convention
    pub symbol: String,

    /// Price reported by the model
    pub price: f64,

    /// Currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Free-text explanation written by the model
    pub message: String,
}

impl StockPriceResult {
    /// JSON schema advertised to the model for the result tool
    pub fn json_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Ticker symbol of the stock, e.g. AAPL"
                },
                "price": {
                    "type": "number",
                    "description": "Current price returned by get_stock_price"
                },
                "currency": {
                    "type": "string",
                    "description": "Currency code of the price",
                    "default": SUPPORTED_CURRENCY
                },
                "message": {
                    "type": "string",
                    "description": "Short explanation for the user"
                }
            },
            "required": ["symbol", "price", "message"]
        })
    }

    /// Check the fields the model is free to get wrong
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.trim().is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(format!("price must be a positive number, got {}", self.price));
        }
        Ok(())
    }

    /// `$<price> <currency>` with two decimals
    pub fn price_display(&self) -> String {
        format!("${:.2} {}", self.price, self.currency)
    }

    /// Text shown in the web form's output box
    pub fn form_text(&self) -> String {
        format!(
            "Stock: {} \n Price: {} \n\n {}",
            self.symbol,
            self.price_display(),
            self.message
        )
    }
}

impl fmt::Display for StockPriceResult {
    /// Console rendering
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stock Price: {}", self.price_display())?;
        write!(f, "Message: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> StockPriceResult {
        StockPriceResult {
            symbol: "AAPL".to_string(),
            price: 227.5,
            currency: "USD".to_string(),
            message: "Apple Inc. (AAPL) is trading at $227.50 USD.".to_string(),
        }
    }

    #[test]
    fn test_round_price_two_decimals() {
        assert_eq!(round_price(227.5234), 227.52);
        assert_eq!(round_price(227.525_000_1), 227.53);
        assert_eq!(round_price(10.0), 10.0);
        let rounded = round_price(0.123456);
        assert_eq!(format!("{}", rounded), "0.12");
    }

    #[test]
    fn test_round_price_ties_and_binary_halves() {
        // exact ties go to the even digit
        assert_eq!(round_price(227.125), 227.12);
        assert_eq!(round_price(0.125), 0.12);
        assert_eq!(round_price(10.125), 10.12);
        assert_eq!(round_price(0.375), 0.38);
        // stored just below the half
        assert_eq!(round_price(2.675), 2.67);
        assert_eq!(round_price(0.615), 0.61);
        assert_eq!(round_price(-2.675), -2.67);
        assert!(round_price(f64::NAN).is_nan());
        assert_eq!(round_price(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_quote_currency_is_fixed() {
        let last = LastPrice {
            symbol: "SHOP.TO".to_string(),
            price: 101.239,
            currency: Some("CAD".to_string()),
        };
        let quote = StockQuote::from(&last);
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.price, 101.24);
    }

    #[test]
    fn test_quote_wire_shape() {
        let quote = StockQuote {
            price: 227.52,
            currency: "USD".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&quote).unwrap(),
            json!({"price": 227.52, "currency": "USD"})
        );
    }

    #[test]
    fn test_currency_defaults_to_usd() {
        let result: StockPriceResult =
            serde_json::from_value(json!({"symbol": "AAPL", "price": 1.5, "message": "ok"}))
                .unwrap();
        assert_eq!(result.currency, "USD");
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let mut result = aapl();
        assert!(result.validate().is_ok());
        result.price = 0.0;
        assert!(result.validate().is_err());
        result.price = f64::NAN;
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_console_rendering() {
        assert_eq!(
            aapl().to_string(),
            "Stock Price: $227.50 USD\nMessage: Apple Inc. (AAPL) is trading at $227.50 USD."
        );
    }

    #[test]
    fn test_form_rendering() {
        let text = aapl().form_text();
        assert!(text.starts_with("Stock: AAPL \n Price: $227.50 USD \n"));
        assert!(text.contains("AAPL"));
        assert!(text.contains("$227.50 USD"));
    }
}
