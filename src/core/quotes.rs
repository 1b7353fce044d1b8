//! Resolves prices for the configured instruments.
//!
//! Provider failures never escape this module: they are logged and turned
//! into [`Price::Unavailable`] for the affected instrument only.
use crate::core::instrument::Instrument;
use crate::core::price::{Price, PriceProvider};
use anyhow::{Result, anyhow};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct PriceLookup {
    provider: Arc<dyn PriceProvider>,
}

impl PriceLookup {
    pub fn new(provider: Arc<dyn PriceProvider>) -> Self {
        PriceLookup { provider }
    }

    /// Looks up the last traded price of a single instrument.
    pub async fn lookup(&self, instrument: &Instrument) -> Price {
        info!(
            "Fetching price for {} ({})...",
            instrument.label, instrument.ticker
        );
        match self.provider.fetch_price(&instrument.ticker).await {
            Ok(result) => {
                let price = Price::Known(result.price);
                if price.usable().is_none() {
                    warn!(
                        ticker = %instrument.ticker,
                        price = result.price,
                        "Provider returned an unusable price"
                    );
                    return Price::Unavailable;
                }
                price
            }
            Err(e) => {
                error!(
                    "Error fetching {} ({}): {}",
                    instrument.label, instrument.ticker, e
                );
                Price::Unavailable
            }
        }
    }

    /// Looks up every instrument concurrently and waits for all of them.
    ///
    /// Each lookup runs as its own task; `on_complete` is invoked once per
    /// finished lookup. An error is returned only when a lookup task itself
    /// could not run to completion.
    pub async fn lookup_all(
        &self,
        instruments: &[Instrument],
        on_complete: &(dyn Fn() + Sync),
    ) -> Result<HashMap<String, Price>> {
        let handles = instruments.iter().cloned().map(|instrument| {
            let lookup = self.clone();
            tokio::spawn(async move {
                let price = lookup.lookup(&instrument).await;
                (instrument.ticker, price)
            })
        });

        let results = join_all(handles.map(|handle| async move {
            let result = handle.await;
            on_complete();
            result
        }))
        .await;

        results
            .into_iter()
            .map(|r| r.map_err(|e| anyhow!("Failed to fetch stock prices: {}", e)))
            .collect()
    }
}
