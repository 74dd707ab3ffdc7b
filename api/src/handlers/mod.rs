pub mod agents;
pub mod configs;
pub mod exchange;
pub mod health;
pub mod strategies;
pub mod users;

use crate::auth::AuthedUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Resolves the internal user id behind the verified wallet, for ownership
/// checks in the services.
async fn acting_user_id(state: &AppState, user: &AuthedUser) -> ApiResult<u64> {
    let record = state
        .user_service
        .find_by_wallet_address(&user.wallet_address)
        .await?
        .ok_or_else(|| {
            ApiError::Unauthorized("No registered user for this wallet".to_string())
        })?;
    Ok(record.id)
}
