//! Price formatting and display-time currency conversion.
//!
//! Catalog prices are USD. A single conversion to the display currency
//! may be applied at presentation time; no settlement logic lives here.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default USD to RUB display rate.
pub const DEFAULT_EXCHANGE_RATE: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    #[serde(alias = "usd")]
    Usd,
    #[serde(alias = "rub")]
    Rub,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Rub => "RUB",
        }
    }

    /// `$1,234.56` for USD, `1,234.56 ₽` for RUB.
    pub fn format_price(self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let digits = group_thousands(amount.abs());
        match self {
            Currency::Usd => format!("{sign}${digits}"),
            Currency::Rub => format!("{sign}{digits} ₽"),
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "RUB" => Ok(Currency::Rub),
            _ => Err(format!("unknown currency: {s}")),
        }
    }
}

/// Two-decimal amount with comma thousands separators.
fn group_thousands(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}

/// Secondary display currency for catalog (USD) prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConversion {
    pub currency: Currency,
    /// Units of `currency` per USD.
    pub exchange_rate: f64,
}

impl DisplayConversion {
    pub fn new(currency: Currency, exchange_rate: f64) -> Self {
        Self {
            currency,
            exchange_rate,
        }
    }

    /// RUB at [`DEFAULT_EXCHANGE_RATE`].
    pub fn rub() -> Self {
        Self::new(Currency::Rub, DEFAULT_EXCHANGE_RATE)
    }

    pub fn convert(&self, usd: f64) -> f64 {
        match self.currency {
            Currency::Usd => usd,
            Currency::Rub => usd * self.exchange_rate,
        }
    }

    /// Converted and formatted amount.
    pub fn format(&self, usd: f64) -> String {
        self.currency.format_price(self.convert(usd))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.exchange_rate.is_finite() && self.exchange_rate > 0.0) {
            return Err(format!(
                "exchange rate must be positive, got {}",
                self.exchange_rate
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(Currency::Usd.format_price(0.0), "$0.00");
        assert_eq!(Currency::Usd.format_price(999.999), "$1,000.00");
        assert_eq!(Currency::Usd.format_price(1234.5), "$1,234.50");
        assert_eq!(Currency::Usd.format_price(1234567.891), "$1,234,567.89");
        assert_eq!(Currency::Usd.format_price(-12.0), "-$12.00");
    }

    #[test]
    fn test_format_rub() {
        assert_eq!(Currency::Rub.format_price(75000.0), "75,000.00 ₽");
        assert_eq!(Currency::Rub.format_price(12.3), "12.30 ₽");
    }

    #[test]
    fn test_conversion() {
        let rub = DisplayConversion::rub();
        assert_eq!(rub.convert(10.0), 750.0);
        assert_eq!(rub.format(1000.0), "75,000.00 ₽");
        assert!(DisplayConversion::new(Currency::Rub, 0.0).validate().is_err());
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!("rub".parse::<Currency>().unwrap(), Currency::Rub);
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("EUR".parse::<Currency>().is_err());
    }
}
