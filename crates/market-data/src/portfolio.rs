//! Position valuation against current quotes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::NormalizedQuote;

/// A holding: share count and average purchase price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub shares: f64,
    pub avg_price: f64,
}

impl Position {
    pub fn new(symbol: impl Into<String>, shares: f64, avg_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
            avg_price,
        }
    }

    pub fn cost_basis(&self) -> f64 {
        self.avg_price * self.shares
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub symbol: String,
    pub shares: f64,
    pub avg_price: f64,
    /// Current price, 0 when no quote was available.
    pub price: f64,
    pub market_value: f64,
    pub cost_basis: f64,
    pub gain: f64,
    /// Gain relative to the average price. 0 when the average price is 0.
    pub gain_percent: f64,
    pub quoted: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub positions: Vec<PositionValuation>,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain: f64,
    /// 0 when the total cost is 0.
    pub total_gain_percent: f64,
}

/// Value `positions` at the prices in `quotes`.
///
/// Quotes are matched by symbol, case-insensitively. A position without a
/// quote is valued at price 0 and still counts toward the total cost.
pub fn value_positions(positions: &[Position], quotes: &[NormalizedQuote]) -> PortfolioSummary {
    let prices: HashMap<String, f64> = quotes
        .iter()
        .map(|q| (q.symbol.to_uppercase(), q.price))
        .collect();

    let valued: Vec<PositionValuation> = positions
        .iter()
        .map(|position| {
            let quoted_price = prices.get(&position.symbol.trim().to_uppercase()).copied();
            let price = quoted_price.unwrap_or(0.0);
            let market_value = price * position.shares;
            let cost_basis = position.cost_basis();
            let gain_percent = if position.avg_price == 0.0 {
                0.0
            } else {
                (price - position.avg_price) / position.avg_price * 100.0
            };

            PositionValuation {
                symbol: position.symbol.clone(),
                shares: position.shares,
                avg_price: position.avg_price,
                price,
                market_value,
                cost_basis,
                gain: market_value - cost_basis,
                gain_percent,
                quoted: quoted_price.is_some(),
            }
        })
        .collect();

    let total_value: f64 = valued.iter().map(|v| v.market_value).sum();
    let total_cost: f64 = valued.iter().map(|v| v.cost_basis).sum();
    let total_gain = total_value - total_cost;
    let total_gain_percent = if total_cost != 0.0 {
        total_gain / total_cost * 100.0
    } else {
        0.0
    };

    PortfolioSummary {
        positions: valued,
        total_value,
        total_cost,
        total_gain,
        total_gain_percent,
    }
}
