//! Bearer-token authentication against the external identity provider,
//! plus the admin allow-list policy.

use std::collections::HashSet;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Identity established for the current request.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub subject: String,
    pub wallet_address: String,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> ApiResult<AuthedUser>;
}

/// Delegates token verification to Privy's user endpoint.
pub struct PrivyVerifier {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_secret: String,
}

#[derive(Debug, Deserialize)]
struct PrivyUser {
    id: String,
    linked_accounts: Vec<PrivyLinkedAccount>,
}

#[derive(Debug, Deserialize)]
struct PrivyLinkedAccount {
    #[serde(rename = "type")]
    kind: String,
    address: Option<String>,
}

impl PrivyVerifier {
    pub fn new(base_url: String, app_id: String, app_secret: String) -> Self {
        PrivyVerifier {
            http: reqwest::Client::new(),
            base_url,
            app_id,
            app_secret,
        }
    }
}

#[async_trait]
impl TokenVerifier for PrivyVerifier {
    async fn verify(&self, token: &str) -> ApiResult<AuthedUser> {
        let response = self
            .http
            .get(format!("{}/api/v1/users/me", self.base_url))
            .bearer_auth(token)
            .basic_auth(&self.app_id, Some(&self.app_secret))
            .header("privy-app-id", &self.app_id)
            .send()
            .await
            .map_err(|err| {
                ApiError::ServiceUnavailable(format!("identity provider unreachable: {err}"))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized("Invalid or expired token".to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::ServiceUnavailable(format!(
                "identity provider returned {status}"
            )));
        }

        let user: PrivyUser = response.json().await.map_err(|err| {
            ApiError::ServiceUnavailable(format!("malformed identity response: {err}"))
        })?;

        let wallet_address = user
            .linked_accounts
            .iter()
            .find(|account| account.kind == "wallet")
            .and_then(|account| account.address.clone())
            .ok_or_else(|| ApiError::Unauthorized("Token has no linked wallet".to_string()))?;

        Ok(AuthedUser {
            subject: user.id,
            wallet_address,
        })
    }
}

pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware guarding everything under `/api`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?
        .to_string();

    let user = state.verifier.verify(&token).await.map_err(|err| {
        warn!("token verification failed: {err}");
        err
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Allow-list of admin wallet addresses, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AdminPolicy {
    wallets: HashSet<String>,
}

impl AdminPolicy {
    pub fn new(wallets: Vec<String>) -> Self {
        AdminPolicy {
            wallets: wallets.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn is_admin(&self, wallet_address: &str) -> bool {
        self.wallets.contains(&wallet_address.to_lowercase())
    }

    pub fn require_admin(&self, user: &AuthedUser) -> ApiResult<()> {
        if self.is_admin(&user.wallet_address) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin access required".to_string()))
        }
    }
}
