//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: model identifiers used for agents and judges
//! - [`task::Task`]: one race: a prompt evaluated by several agents
//! - [`category::TaskCategory`]: the fixed set of task categories
//! - [`error::DomainError`]: domain-level errors

pub mod category;
pub mod error;
pub mod model;
pub mod string;
pub mod task;
