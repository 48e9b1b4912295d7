//! Integration tests for pvelist

mod cli_binary;
mod config_integration;
mod inventory_scenarios;

pub use test_utils::{with_xdg_env, ScriptedProvider};
