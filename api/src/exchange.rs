//! Narrow client interface to the external trading venue.
//!
//! The venue owns order semantics and position accounting; this module only
//! forwards requests and maps transport failures to `ExchangeUnavailable`.
//! No retries.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    pub withdrawable: Decimal,
    pub account_value: Decimal,
    pub total_margin_used: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub coin: String,
    pub size: Decimal,
    pub side: OrderSide,
    pub limit_price: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub status: String,
    pub order_id: Option<u64>,
}

/// API-wallet credentials the caller trades with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeCredentials {
    pub wallet_address: String,
    pub api_key: String,
}

#[async_trait]
pub trait ExchangeClient: Send + Sync {
    async fn account_state(&self, address: &str) -> ApiResult<AccountState>;
    async fn place_order(
        &self,
        credentials: &ExchangeCredentials,
        order: OrderRequest,
    ) -> ApiResult<OrderResult>;
}

pub struct HyperliquidClient {
    http: reqwest::Client,
    base_url: String,
}

impl HyperliquidClient {
    pub fn new(base_url: String) -> Self {
        HyperliquidClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

// The venue encodes numeric fields as strings.
#[derive(Debug, Deserialize)]
struct RawClearinghouseState {
    withdrawable: String,
    #[serde(rename = "marginSummary")]
    margin_summary: RawMarginSummary,
}

#[derive(Debug, Deserialize)]
struct RawMarginSummary {
    #[serde(rename = "accountValue")]
    account_value: String,
    #[serde(rename = "totalMarginUsed")]
    total_margin_used: String,
}

fn parse_venue_decimal(raw: &str) -> ApiResult<Decimal> {
    Decimal::from_str(raw)
        .map_err(|err| ApiError::ExchangeUnavailable(format!("malformed balance from venue: {err}")))
}

impl TryFrom<RawClearinghouseState> for AccountState {
    type Error = ApiError;

    fn try_from(raw: RawClearinghouseState) -> Result<Self, Self::Error> {
        Ok(AccountState {
            withdrawable: parse_venue_decimal(&raw.withdrawable)?,
            account_value: parse_venue_decimal(&raw.margin_summary.account_value)?,
            total_margin_used: parse_venue_decimal(&raw.margin_summary.total_margin_used)?,
        })
    }
}

#[async_trait]
impl ExchangeClient for HyperliquidClient {
    async fn account_state(&self, address: &str) -> ApiResult<AccountState> {
        let response = self
            .http
            .post(format!("{}/info", self.base_url))
            .json(&json!({ "type": "clearinghouseState", "user": address }))
            .send()
            .await
            .map_err(|err| ApiError::ExchangeUnavailable(format!("venue unreachable: {err}")))?;

        if !response.status().is_success() {
            return Err(ApiError::ExchangeUnavailable(format!(
                "venue returned {}",
                response.status()
            )));
        }

        let raw: RawClearinghouseState = response.json().await.map_err(|err| {
            ApiError::ExchangeUnavailable(format!("malformed venue response: {err}"))
        })?;

        raw.try_into()
    }

    async fn place_order(
        &self,
        credentials: &ExchangeCredentials,
        order: OrderRequest,
    ) -> ApiResult<OrderResult> {
        let action = json!({
            "type": "order",
            "orders": [{
                "coin": order.coin,
                "isBuy": matches!(order.side, OrderSide::Buy),
                "sz": order.size.to_string(),
                "limitPx": order.limit_price.map(|px| px.to_string()),
                "tp": order.take_profit.map(|px| px.to_string()),
                "sl": order.stop_loss.map(|px| px.to_string()),
            }],
        });

        let response = self
            .http
            .post(format!("{}/exchange", self.base_url))
            .bearer_auth(&credentials.api_key)
            .json(&json!({
                "action": action,
                "account": credentials.wallet_address,
            }))
            .send()
            .await
            .map_err(|err| ApiError::ExchangeUnavailable(format!("venue unreachable: {err}")))?;

        if !response.status().is_success() {
            return Err(ApiError::ExchangeUnavailable(format!(
                "venue rejected order: {}",
                response.status()
            )));
        }

        let result: OrderResult = response.json().await.map_err(|err| {
            ApiError::ExchangeUnavailable(format!("malformed venue response: {err}"))
        })?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clearinghouse_state() {
        let raw: RawClearinghouseState = serde_json::from_str(
            r#"{
                "withdrawable": "1234.5678",
                "marginSummary": {
                    "accountValue": "2000.0",
                    "totalMarginUsed": "765.4322"
                }
            }"#,
        )
        .unwrap();

        let state: AccountState = raw.try_into().unwrap();
        assert_eq!(state.withdrawable, Decimal::from_str("1234.5678").unwrap());
        assert_eq!(state.account_value, Decimal::from_str("2000.0").unwrap());
        assert_eq!(
            state.total_margin_used,
            Decimal::from_str("765.4322").unwrap()
        );
    }

    #[test]
    fn test_malformed_balance_is_exchange_error() {
        let raw = RawClearinghouseState {
            withdrawable: "not-a-number".to_string(),
            margin_summary: RawMarginSummary {
                account_value: "0".to_string(),
                total_margin_used: "0".to_string(),
            },
        };

        let result: Result<AccountState, _> = raw.try_into();
        assert!(matches!(result, Err(ApiError::ExchangeUnavailable(_))));
    }
}
