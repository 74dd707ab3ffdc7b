use std::sync::Arc;

use sea_orm::DatabaseConnection;
use shared::Config;

use crate::auth::{AdminPolicy, PrivyVerifier, TokenVerifier};
use crate::exchange::{ExchangeClient, HyperliquidClient};
use crate::services::agent_service::AgentService;
use crate::services::config_service::ConfigService;
use crate::services::strategy_service::StrategyService;
use crate::services::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub admin: AdminPolicy,
    pub verifier: Arc<dyn TokenVerifier>,
    pub exchange: Arc<dyn ExchangeClient>,
    pub agent_service: Arc<AgentService>,
    pub strategy_service: Arc<StrategyService>,
    pub config_service: Arc<ConfigService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(config: &Config, db: DatabaseConnection) -> Self {
        let db = Arc::new(db);

        AppState {
            db: db.clone(),
            admin: AdminPolicy::new(config.admin_wallets.clone()),
            verifier: Arc::new(PrivyVerifier::new(
                config.privy_api_url.clone(),
                config.privy_app_id.clone(),
                config.privy_app_secret.clone(),
            )),
            exchange: Arc::new(HyperliquidClient::new(config.hyperliquid_api_url.clone())),
            agent_service: Arc::new(AgentService::new(db.clone())),
            strategy_service: Arc::new(StrategyService::new(db.clone())),
            config_service: Arc::new(ConfigService::new(db.clone())),
            user_service: Arc::new(UserService::new(db)),
        }
    }
}
