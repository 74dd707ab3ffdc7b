pub mod agents;
pub mod strategies;
pub mod user_agent_configs;
pub mod users;
