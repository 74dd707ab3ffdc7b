use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::handlers::{agents, configs, exchange, health, strategies, users};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(
            "/api/agents",
            post(agents::create_agent).get(agents::list_agents),
        )
        .route(
            "/api/agents/:agent_id",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        .route("/api/strategies", post(strategies::create_strategy))
        .route(
            "/api/strategies/user/:user_id",
            get(strategies::list_user_strategies),
        )
        .route(
            "/api/strategies/strategy/:strategy_id",
            get(strategies::get_strategy)
                .put(strategies::update_strategy)
                .delete(strategies::delete_strategy),
        )
        .route(
            "/api/strategies/user/:user_id/strategy/:strategy_id",
            get(strategies::get_user_strategy),
        )
        .route(
            "/api/user-agent-config/:config_id",
            get(configs::get_config)
                .patch(configs::update_config)
                .delete(configs::delete_config),
        )
        .route("/api/v1/user/register", post(users::register))
        .route("/api/v1/user/:unique_wallet_id", get(users::get_user))
        .route(
            "/api/exchange/account/:address",
            get(exchange::account_state),
        )
        .route("/api/exchange/order", post(exchange::place_order))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(api)
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::health_detailed))
        .route("/health/ready", get(health::health_ready))
        .route("/health/live", get(health::health_live))
        .route("/health/database", get(health::health_database))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
