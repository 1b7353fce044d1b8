//! Splits an investment into per-instrument amounts and share quantities.
use crate::core::instrument::Instrument;
use crate::core::price::Price;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Investment amount must be a positive number")]
pub struct InvalidInvestment;

/// Longest leading decimal literal, e.g. `12` in `12abc` or `1` in `1,000`.
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("Invalid regex pattern")
});

/// Parses the user-supplied investment amount.
///
/// A missing or empty value means no investment was given. Otherwise the
/// leading numeric part of the text is read and trailing characters are
/// ignored; the result must be a finite number greater than zero.
pub fn parse_investment(raw: Option<&str>) -> Result<Option<f64>, InvalidInvestment> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let number = LEADING_NUMBER
        .find(raw)
        .ok_or(InvalidInvestment)?
        .as_str();
    match number.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
        _ => Err(InvalidInvestment),
    }
}

/// Amount and quantity derived for one instrument. Both are `None` together
/// when there is no investment or no usable price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AllocationResult {
    pub allocated_amount: Option<u64>,
    pub allocated_quantity: Option<u64>,
}

/// One line of the allocation report: the instrument, its price and what it
/// was allocated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRow {
    pub stock_name: String,
    pub stock_ticker: String,
    pub last_traded_price: Price,
    pub allocation_percentage: f64,
    pub allocated_quantity: Option<u64>,
    pub allocated_amount: Option<u64>,
}

/// Pairs each instrument with its price and allocation, keeping the
/// instrument order.
pub fn allocation_rows(
    instruments: &[Instrument],
    prices: &HashMap<String, Price>,
    investment: Option<f64>,
) -> Vec<AllocationRow> {
    instruments
        .iter()
        .zip(allocate(instruments, prices, investment))
        .map(|(instrument, result)| AllocationRow {
            stock_name: instrument.label.clone(),
            stock_ticker: instrument.ticker.clone(),
            last_traded_price: price_of(prices, instrument),
            allocation_percentage: instrument.allocation_percentage,
            allocated_quantity: result.allocated_quantity,
            allocated_amount: result.allocated_amount,
        })
        .collect()
}

fn price_of(prices: &HashMap<String, Price>, instrument: &Instrument) -> Price {
    prices
        .get(&instrument.ticker)
        .copied()
        .unwrap_or(Price::Unavailable)
}

/// Computes one allocation per instrument, in the order of `instruments`.
///
/// Each instrument is rounded independently from its own weight; amounts are
/// not normalized, so their sum may differ from `investment`. Tickers missing
/// from `prices` are treated as unavailable.
pub fn allocate(
    instruments: &[Instrument],
    prices: &HashMap<String, Price>,
    investment: Option<f64>,
) -> Vec<AllocationResult> {
    instruments
        .iter()
        .map(|instrument| allocate_one(instrument, price_of(prices, instrument), investment))
        .collect()
}

/// Computes the allocation for a single instrument.
pub fn allocate_one(
    instrument: &Instrument,
    price: Price,
    investment: Option<f64>,
) -> AllocationResult {
    let investment = investment.filter(|v| v.is_finite() && *v > 0.0);
    let result = match (investment, price.usable()) {
        (Some(investment), Some(price)) => {
            allocated_amount(investment, instrument.allocation_percentage)
                .and_then(|amount| {
                    allocated_quantity(amount, price).map(|quantity| AllocationResult {
                        allocated_amount: Some(amount),
                        allocated_quantity: Some(quantity),
                    })
                })
                .unwrap_or_default()
        }
        _ => AllocationResult::default(),
    };

    debug!(
        stock = %instrument.label,
        allocation_percentage = instrument.allocation_percentage,
        ?investment,
        last_traded_price = %price,
        allocated_amount = ?result.allocated_amount,
        allocated_quantity = ?result.allocated_quantity,
        "Computed allocation"
    );
    result
}

/// Whole currency units for `percentage` of `investment`, ties rounded away
/// from zero. `None` when the amount does not fit in a `u64`.
fn allocated_amount(investment: f64, percentage: f64) -> Option<u64> {
    to_u64((investment * (percentage / 100.0)).round())
}

/// Smallest quantity whose cost at `price` is not below `amount`, or `None`
/// when it does not fit in a `u64`.
fn allocated_quantity(amount: u64, price: f64) -> Option<u64> {
    let amount = amount as f64;
    let quantity = to_u64((amount / price).ceil())?;
    // Rounding in the division can leave the product just short of the amount.
    if (quantity as f64) * price < amount {
        return quantity.checked_add(1);
    }
    Some(quantity)
}

/// Converts a non-negative whole `f64` without saturating. `u64::MAX as f64`
/// rounds up to 2^64, which is itself out of range.
fn to_u64(value: f64) -> Option<u64> {
    (value >= 0.0 && value < u64::MAX as f64).then_some(value as u64)
}
