use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use super::error::ApiResult;
use crate::core::allocation::{AllocationRow, allocation_rows, parse_investment};

#[derive(Debug, Deserialize)]
pub struct StocksQuery {
    investment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StocksResponse {
    pub success: bool,
    pub data: Vec<AllocationRow>,
    pub investment_amount: Option<f64>,
    pub timestamp: String,
}

/// Prices every configured instrument and, when an investment is given,
/// splits it across them.
pub async fn get_stocks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<StocksQuery>, QueryRejection>,
) -> ApiResult<Json<StocksResponse>> {
    let Query(query) = query?;
    let investment = parse_investment(query.investment.as_deref())?;
    info!(?investment, "Pricing {} instruments", state.instruments.len());

    let prices = state.lookup.lookup_all(&state.instruments, &|| {}).await?;
    let data = allocation_rows(&state.instruments, &prices, investment);

    Ok(Json(StocksResponse {
        success: true,
        data,
        investment_amount: investment,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

pub async fn health() -> &'static str {
    "Stock API is running"
}
