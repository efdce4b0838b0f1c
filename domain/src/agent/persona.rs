//! Personas and agent slots

use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed behavioral profile assigned to an agent slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Analytical,
    Lateral,
    Adversarial,
    Pragmatic,
}

impl Persona {
    /// The persona line-up used when nothing is configured
    pub fn default_lineup() -> Vec<Persona> {
        vec![Persona::Analytical, Persona::Lateral, Persona::Adversarial]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Analytical => "analytical",
            Persona::Lateral => "lateral",
            Persona::Adversarial => "adversarial",
            Persona::Pragmatic => "pragmatic",
        }
    }

    /// How this persona should approach a task
    pub fn stance(&self) -> &'static str {
        match self {
            Persona::Analytical => {
                "Decompose the problem methodically. Verify each intermediate claim before building on it."
            }
            Persona::Lateral => {
                "Look for an unconventional angle or a simpler reframing before committing to an approach."
            }
            Persona::Adversarial => {
                "Actively hunt for edge cases, failure modes and hidden assumptions, then address them."
            }
            Persona::Pragmatic => {
                "Prefer the most direct working solution and state its limits plainly."
            }
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Persona {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analytical" => Ok(Persona::Analytical),
            "lateral" => Ok(Persona::Lateral),
            "adversarial" => Ok(Persona::Adversarial),
            "pragmatic" => Ok(Persona::Pragmatic),
            other => Err(DomainError::UnknownPersona(other.to_string())),
        }
    }
}

/// One seat in a race: who runs, with which persona, on which model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSlot {
    pub agent_id: String,
    pub persona: Persona,
    pub model: Model,
}

impl AgentSlot {
    pub fn new(agent_id: impl Into<String>, persona: Persona, model: Model) -> Self {
        Self {
            agent_id: agent_id.into(),
            persona,
            model,
        }
    }

    /// Build one slot per persona, ids `agent-1..N`
    pub fn lineup(personas: &[Persona], model: &Model) -> Vec<AgentSlot> {
        personas
            .iter()
            .enumerate()
            .map(|(i, persona)| AgentSlot::new(format!("agent-{}", i + 1), *persona, model.clone()))
            .collect()
    }
}
