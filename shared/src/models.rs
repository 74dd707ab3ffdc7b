use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity::{agents, strategies, user_agent_configs, users};

/// Risk label carried by every strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(RiskLevel::High),
            "medium" => Ok(RiskLevel::Medium),
            "low" => Ok(RiskLevel::Low),
            other => Err(format!(
                "Invalid risk level '{other}', expected High, Medium or Low"
            )),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role tag of a prompt template in the agent registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Sentiment,
    Technical,
    Fundamental,
    Supervisor,
    Executor,
    Websearch,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Sentiment => "sentiment",
            AgentKind::Technical => "technical",
            AgentKind::Fundamental => "fundamental",
            AgentKind::Supervisor => "supervisor",
            AgentKind::Executor => "executor",
            AgentKind::Websearch => "websearch",
        }
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sentiment" => Ok(AgentKind::Sentiment),
            "technical" => Ok(AgentKind::Technical),
            "fundamental" => Ok(AgentKind::Fundamental),
            "supervisor" => Ok(AgentKind::Supervisor),
            "executor" => Ok(AgentKind::Executor),
            "websearch" => Ok(AgentKind::Websearch),
            other => Err(format!("Invalid agent type '{other}'")),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn voting_power_in_bounds(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub prompt: Option<String>,
}

/// One entry of a strategy's `agents` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentEntry {
    pub agent_id: u64,
    pub voting_power: f64,
    pub custom_prompt: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStrategyRequest {
    pub user_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub risk: String,
    pub agents: Vec<AgentEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStrategyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub risk: Option<String>,
    pub agents: Option<Vec<AgentEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    pub voting_power: Option<f64>,
    pub custom_prompt: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub unique_wallet_id: String,
    pub wallet_address: String,
    pub signature: Option<String>,
}

// ---------------------------------------------------------------------------
// Response views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<agents::Model> for AgentView {
    fn from(model: agents::Model) -> Self {
        AgentView {
            id: model.id,
            name: model.name,
            kind: model.kind,
            prompt: model.prompt,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: u64,
    pub unique_wallet_id: String,
    pub wallet_address: String,
    pub signature: Option<String>,
    pub is_autonomous_active: bool,
    pub total_pnl: Decimal,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl From<users::Model> for UserView {
    fn from(model: users::Model) -> Self {
        UserView {
            id: model.id,
            unique_wallet_id: model.unique_wallet_id,
            wallet_address: model.wallet_address,
            signature: model.signature,
            is_autonomous_active: model.is_autonomous_active,
            total_pnl: model.total_pnl,
            created_at: model.created_at,
            last_login_at: model.last_login_at,
        }
    }
}

/// Strategy as returned from creation: config references by id, in list order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyView {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub risk: String,
    pub agent_configs: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StrategyView {
    pub fn new(model: strategies::Model, agent_configs: Vec<u64>) -> Self {
        StrategyView {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            risk: model.risk,
            agent_configs,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Config with its agent reference expanded to the full agent record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedConfigView {
    pub id: u64,
    #[serde(rename = "agentId")]
    pub agent: AgentView,
    pub voting_power: f64,
    pub custom_prompt: Option<String>,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopulatedConfigView {
    pub fn new(config: user_agent_configs::Model, agent: AgentView) -> Self {
        PopulatedConfigView {
            id: config.id,
            agent,
            voting_power: config.voting_power,
            custom_prompt: config.custom_prompt,
            code: config.code,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedStrategyView {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub risk: String,
    pub agent_configs: Vec<PopulatedConfigView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopulatedStrategyView {
    pub fn new(model: strategies::Model, agent_configs: Vec<PopulatedConfigView>) -> Self {
        PopulatedStrategyView {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            risk: model.risk,
            agent_configs,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Standalone config view with agent summary and owning strategy name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDetailView {
    pub id: u64,
    pub user_id: u64,
    pub strategy_id: u64,
    pub strategy_name: String,
    #[serde(rename = "agentId")]
    pub agent: AgentView,
    pub voting_power: f64,
    pub custom_prompt: Option<String>,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConfigDetailView {
    pub fn new(
        config: user_agent_configs::Model,
        strategy_name: String,
        agent: AgentView,
    ) -> Self {
        ConfigDetailView {
            id: config.id,
            user_id: config.user_id,
            strategy_id: config.strategy_id,
            strategy_name,
            agent,
            voting_power: config.voting_power,
            custom_prompt: config.custom_prompt,
            code: config.code,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_parse() {
        assert_eq!("High".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!("medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert_eq!("LOW".parse::<RiskLevel>().unwrap(), RiskLevel::Low);
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_agent_kind_parse() {
        assert_eq!(
            "sentiment".parse::<AgentKind>().unwrap(),
            AgentKind::Sentiment
        );
        assert_eq!(
            "Websearch".parse::<AgentKind>().unwrap(),
            AgentKind::Websearch
        );
        assert!("oracle".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_voting_power_bounds() {
        assert!(voting_power_in_bounds(0.0));
        assert!(voting_power_in_bounds(0.5));
        assert!(voting_power_in_bounds(1.0));
        assert!(!voting_power_in_bounds(1.1));
        assert!(!voting_power_in_bounds(-0.01));
    }

    #[test]
    fn test_populated_config_wire_format() {
        let now = Utc::now();
        let agent = AgentView {
            id: 3,
            name: "Sentiment Agent".to_string(),
            kind: "sentiment".to_string(),
            prompt: "Assess market mood".to_string(),
            created_at: now,
            updated_at: now,
        };
        let config = user_agent_configs::Model {
            id: 9,
            user_id: 1,
            strategy_id: 4,
            agent_id: 3,
            voting_power: 0.5,
            custom_prompt: None,
            code: None,
            position: 0,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(PopulatedConfigView::new(config, agent)).unwrap();
        assert_eq!(json["votingPower"], 0.5);
        assert_eq!(json["agentId"]["name"], "Sentiment Agent");
        assert_eq!(json["agentId"]["type"], "sentiment");
    }

    #[test]
    fn test_strategy_view_carries_config_ids() {
        let now = Utc::now();
        let strategy = strategies::Model {
            id: 4,
            user_id: 1,
            name: "BTC EMA".to_string(),
            description: None,
            risk: "Medium".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(StrategyView::new(strategy, vec![9, 10])).unwrap();
        assert_eq!(json["agentConfigs"], serde_json::json!([9, 10]));
        assert_eq!(json["risk"], "Medium");
        assert_eq!(json["userId"], 1);
    }
}
