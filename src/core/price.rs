//! Pricing abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Marker rendered in place of a price that could not be resolved.
pub const UNAVAILABLE_MARKER: &str = "N/A";

/// Last traded price of an instrument as seen by a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Known(f64),
    Unavailable,
}

impl Price {
    /// Returns the price only when it can be used for an allocation, i.e. it is
    /// a finite, strictly positive number.
    pub fn usable(&self) -> Option<f64> {
        match self {
            Price::Known(value) if value.is_finite() && *value > 0.0 => Some(*value),
            _ => None,
        }
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Known(value) => write!(f, "{value:.2}"),
            Price::Unavailable => write!(f, "{UNAVAILABLE_MARKER}"),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Known(value) => serializer.serialize_f64(*value),
            Price::Unavailable => serializer.serialize_str(UNAVAILABLE_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceResult {
    pub price: f64,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceResult>;
}
