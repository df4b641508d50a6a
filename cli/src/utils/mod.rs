pub mod fixtures;
pub mod policy_config;
