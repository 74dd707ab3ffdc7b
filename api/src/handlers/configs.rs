use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use shared::models::{ConfigDetailView, UpdateConfigRequest};

use crate::auth::AuthedUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn get_config(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(config_id): Path<u64>,
) -> ApiResult<Json<ApiResponse<ConfigDetailView>>> {
    let acting_user_id = super::acting_user_id(&state, &user).await?;
    let config = state.config_service.get(config_id, acting_user_id).await?;
    Ok(Json(ApiResponse::success(config)))
}

pub async fn update_config(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(config_id): Path<u64>,
    Json(request): Json<UpdateConfigRequest>,
) -> ApiResult<Json<ApiResponse<ConfigDetailView>>> {
    let acting_user_id = super::acting_user_id(&state, &user).await?;
    let config = state
        .config_service
        .update(config_id, acting_user_id, request)
        .await?;
    Ok(Json(ApiResponse::success(config)))
}

pub async fn delete_config(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(config_id): Path<u64>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let acting_user_id = super::acting_user_id(&state, &user).await?;
    state
        .config_service
        .delete(config_id, acting_user_id)
        .await?;
    Ok(Json(ApiResponse::success(
        json!({ "message": "Configuration deleted" }),
    )))
}
