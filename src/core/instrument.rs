use serde::{Deserialize, Serialize};

/// A tracked ticker together with its display name and target weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub ticker: String,
    pub label: String,
    /// Percentage of the total investment nominally assigned to this
    /// instrument, in `(0, 100]`.
    pub allocation_percentage: f64,
}

impl Instrument {
    pub fn new(ticker: &str, label: &str, allocation_percentage: f64) -> Self {
        Instrument {
            ticker: ticker.to_string(),
            label: label.to_string(),
            allocation_percentage,
        }
    }
}

/// Compiled-in instrument table used when no configuration overrides it.
pub fn default_instruments() -> Vec<Instrument> {
    [
        ("BHARTIARTL.NS", "Bharti Airtel Limited", 4.4),
        ("BIRET.BO", "Brookfield India Real Estate Trust", 7.87),
        ("BRITANNIA.NS", "Britannia Industries Limited", 4.13),
        ("COLPAL.BO", "Colgate-Palmolive (India) Limited", 3.26),
        ("DABUR.NS", "Dabur India Limited", 3.6),
        ("DRREDDY.NS", "Dr. Reddy's Laboratories Limited", 3.12),
        ("EMBASSY-RR.NS", "Embassy Office Parks REIT", 5.25),
        ("HDFCBANK.NS", "HDFC Bank Limited", 4.08),
        ("HINDUNILVR.NS", "HINDUSTAN UNILEVER Limited", 4.4),
        ("ICICIBANK.NS", "ICICI Bank Limited", 3.78),
        ("ICRA.NS", "ICRA Limited", 2.83),
        ("ITC.NS", "ITC Limited", 3.33),
        ("KOTAKBANK.NS", "Kotak Mahindra Bank Limited", 4.81),
        ("MARICO.NS", "Marico Limited", 3.23),
        ("MINDSPACE-RR.NS", "MINDSPACE BUSINESS P REIT", 10.31),
        ("NESTLEIND.NS", "Nestlé India Limited", 4.63),
        ("PFIZER.NS", "Pfizer Limited", 3.16),
        ("PGHL.NS", "Procter & Gamble Health Limited", 3.36),
        ("RELAXO.NS", "Relaxo Footwears Limited", 2.6),
        ("RELIANCE.NS", "Reliance Industries Limited", 3.34),
        ("SBILIFE.NS", "SBI Life Insurance Company Limited", 3.22),
        ("SUNDRMFAST.NS", "Sundram Fasteners Limited", 2.75),
        ("SUNPHARMA.NS", "Sun Pharmaceutical Industries Limited", 3.56),
        ("TCS.NS", "Tata Consultancy Services Limited", 3.08),
        ("TORNTPHARM.NS", "Torrent Pharmaceuticals Limited", 2.97),
    ]
    .into_iter()
    .map(|(ticker, label, pct)| Instrument::new(ticker, label, pct))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_instruments_are_well_formed() {
        let instruments = default_instruments();
        assert_eq!(instruments.len(), 25);

        let tickers: HashSet<_> = instruments.iter().map(|i| i.ticker.as_str()).collect();
        assert_eq!(tickers.len(), instruments.len());

        for instrument in &instruments {
            assert!(instrument.allocation_percentage > 0.0);
            assert!(instrument.allocation_percentage <= 100.0);
        }
        assert_eq!(instruments[0].ticker, "BHARTIARTL.NS");
        assert_eq!(instruments[24].ticker, "TORNTPHARM.NS");
    }
}
