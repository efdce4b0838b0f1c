//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_executor;
pub mod classifier;
pub mod composite_progress;
pub mod learning_store;
pub mod llm_gateway;
pub mod persistence;
pub mod progress;
