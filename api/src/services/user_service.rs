//! User registry: maps an external wallet identity to an internal record.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use shared::entity::users;
use shared::models::RegisterUserRequest;

use crate::error::{ApiError, ApiResult};

pub struct UserService {
    db: Arc<DatabaseConnection>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Idempotent login: an existing wallet id only gets its `last_login_at`
    /// touched, a new one gets a fresh record.
    pub async fn register(&self, request: RegisterUserRequest) -> ApiResult<users::Model> {
        if request.unique_wallet_id.trim().is_empty() {
            return Err(ApiError::Validation("uniqueWalletId is required".to_string()));
        }
        if request.wallet_address.trim().is_empty() {
            return Err(ApiError::Validation("walletAddress is required".to_string()));
        }

        let now = Utc::now();

        if let Some(existing) = users::Entity::find()
            .filter(users::Column::UniqueWalletId.eq(request.unique_wallet_id.clone()))
            .one(self.db.as_ref())
            .await?
        {
            let mut active: users::ActiveModel = existing.into();
            active.last_login_at = Set(now);
            let updated = active.update(self.db.as_ref()).await?;
            return Ok(updated);
        }

        let address_taken = users::Entity::find()
            .filter(users::Column::WalletAddress.eq(request.wallet_address.clone()))
            .one(self.db.as_ref())
            .await?;
        if address_taken.is_some() {
            return Err(ApiError::Conflict(
                "Wallet address is already registered to another user".to_string(),
            ));
        }

        let user = users::ActiveModel {
            unique_wallet_id: Set(request.unique_wallet_id),
            wallet_address: Set(request.wallet_address),
            signature: Set(request.signature),
            is_autonomous_active: Set(false),
            total_pnl: Set(Decimal::ZERO),
            created_at: Set(now),
            last_login_at: Set(now),
            ..Default::default()
        };

        let created = users::Entity::insert(user)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(created)
    }

    pub async fn get_by_wallet_id(&self, unique_wallet_id: &str) -> ApiResult<users::Model> {
        users::Entity::find()
            .filter(users::Column::UniqueWalletId.eq(unique_wallet_id))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Resolves the internal record behind an authenticated wallet, if any.
    pub async fn find_by_wallet_address(
        &self,
        wallet_address: &str,
    ) -> ApiResult<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::WalletAddress.eq(wallet_address))
            .one(self.db.as_ref())
            .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn user_row(id: u64, wallet_id: &str, last_login_at: DateTime<Utc>) -> users::Model {
        users::Model {
            id,
            unique_wallet_id: wallet_id.to_string(),
            wallet_address: format!("0xaddr{id}"),
            signature: None,
            is_autonomous_active: false,
            total_pnl: Decimal::ZERO,
            created_at: last_login_at - Duration::days(30),
            last_login_at,
        }
    }

    fn register_request(wallet_id: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            unique_wallet_id: wallet_id.to_string(),
            wallet_address: "0xaddr1".to_string(),
            signature: None,
        }
    }

    #[tokio::test]
    async fn test_register_requires_wallet_fields() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = UserService::new(Arc::new(db));

        let result = service
            .register(RegisterUserRequest {
                unique_wallet_id: " ".to_string(),
                wallet_address: "0xaddr1".to_string(),
                signature: None,
            })
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_existing_wallet_touches_last_login_only() {
        let stale_login = Utc::now() - Duration::days(7);
        let existing = user_row(1, "wallet-1", stale_login);
        let refreshed = users::Model {
            last_login_at: Utc::now(),
            ..existing.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![existing]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![refreshed.clone()]])
            .into_connection();
        let service = UserService::new(Arc::new(db));

        let user = service.register(register_request("wallet-1")).await.unwrap();
        assert_eq!(user.id, 1);
        assert!(user.last_login_at > stale_login);
        assert_eq!(user.created_at, refreshed.created_at);
    }

    #[tokio::test]
    async fn test_register_new_wallet_creates_user() {
        let created = user_row(2, "wallet-2", Utc::now());
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<users::Model>::new(), Vec::<users::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 2,
                rows_affected: 1,
            }])
            .append_query_results([vec![created]])
            .into_connection();
        let service = UserService::new(Arc::new(db));

        let user = service.register(register_request("wallet-2")).await.unwrap();
        assert_eq!(user.id, 2);
        assert_eq!(user.unique_wallet_id, "wallet-2");
    }

    #[tokio::test]
    async fn test_register_rejects_reused_wallet_address() {
        let other = user_row(3, "wallet-3", Utc::now());
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<users::Model>::new(), vec![other]])
            .into_connection();
        let service = UserService::new(Arc::new(db));

        let result = service.register(register_request("wallet-4")).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_by_wallet_id_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let service = UserService::new(Arc::new(db));

        let result = service.get_by_wallet_id("nobody").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
