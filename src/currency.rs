use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_digits() -> usize {
    2
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Before,
    After,
}

/// Display rules for one currency as configured server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
    #[serde(default)]
    pub position: SymbolPosition,
    #[serde(default = "default_digits")]
    pub digits: usize,
}

impl Currency {
    /// Format a monetary amount: magnitude at the currency's precision with
    /// the symbol prepended or appended.
    pub fn format(&self, value: f64) -> String {
        let magnitude = format!("{value:.prec$}", prec = self.digits);
        match self.position {
            SymbolPosition::Before => format!("{}{}", self.symbol, magnitude),
            SymbolPosition::After => format!("{}{}", magnitude, self.symbol),
        }
    }
}

/// Currency table keyed by server id, supplied with the dashboard options.
/// Unknown ids fall back to the bare magnitude so a missing table entry
/// never blocks rendering.
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    currencies: HashMap<i64, Currency>,
}

impl CurrencyRegistry {
    pub fn new(currencies: HashMap<i64, Currency>) -> Self {
        Self { currencies }
    }

    pub fn get(&self, id: i64) -> Option<&Currency> {
        self.currencies.get(&id)
    }

    pub fn format(&self, id: Option<i64>, value: f64) -> String {
        match id.and_then(|id| self.currencies.get(&id)) {
            Some(currency) => currency.format(value),
            None => format!("{value:.2}"),
        }
    }
}
