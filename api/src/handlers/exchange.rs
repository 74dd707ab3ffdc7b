use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::exchange::{AccountState, ExchangeCredentials, OrderRequest, OrderResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub credentials: ExchangeCredentials,
    pub order: OrderRequest,
}

pub async fn account_state(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<ApiResponse<AccountState>>> {
    let account = state.exchange.account_state(&address).await?;
    Ok(Json(ApiResponse::success(account)))
}

pub async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> ApiResult<Json<ApiResponse<OrderResult>>> {
    let result = state
        .exchange
        .place_order(&request.credentials, request.order)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}
