//! Core business logic abstractions

pub mod allocation;
pub mod config;
pub mod instrument;
pub mod log;
pub mod price;
pub mod quotes;

// Re-export main types for cleaner imports
pub use allocation::{
    AllocationResult, AllocationRow, InvalidInvestment, allocate, allocation_rows, parse_investment,
};
pub use instrument::Instrument;
pub use price::{Price, PriceProvider, PriceResult};
pub use quotes::PriceLookup;
