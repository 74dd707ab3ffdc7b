use axum::{
    extract::{Path, State},
    Json,
};
use shared::models::{RegisterUserRequest, UserView};

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> ApiResult<Json<ApiResponse<UserView>>> {
    let user = state.user_service.register(request).await?;
    Ok(Json(ApiResponse::success(UserView::from(user))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(unique_wallet_id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserView>>> {
    let user = state.user_service.get_by_wallet_id(&unique_wallet_id).await?;
    Ok(Json(ApiResponse::success(UserView::from(user))))
}
