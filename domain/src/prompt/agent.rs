//! Prompt templates for racing agents

use crate::agent::Persona;

/// Line prefix agents use for each reasoning step
pub const STEP_PREFIX: &str = "Step";
/// Heading that separates the reasoning trace from the answer
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt for an agent playing `persona`
    pub fn agent_system(persona: Persona, tools: &[String]) -> String {
        let tools = if tools.is_empty() {
            "No tools are available; answer from reasoning alone.".to_string()
        } else {
            format!("Tools you may use: {}.", tools.join(", "))
        };

        format!(
            r#"You are one of several independent agents answering the same task. Your answers will be compared and scored for accuracy, completeness, clarity and insight.

Persona: {persona}
{stance}

{tools}

Format your reply exactly as follows:
{step} 1: <first reasoning step>
{step} 2: <next reasoning step>
...
{final_marker}
<your complete answer>

Keep each step to one or two sentences. Only claim results you actually observed."#,
            persona = persona,
            stance = persona.stance(),
            tools = tools,
            step = STEP_PREFIX,
            final_marker = FINAL_ANSWER_MARKER,
        )
    }

    /// Task prompt: the original prompt, then guidance and learned patterns
    pub fn task_prompt(prompt: &str, hints: &[String], patterns: &[String]) -> String {
        let mut out = prompt.trim().to_string();

        if !hints.is_empty() {
            out.push_str("\n\nGuidance:");
            for hint in hints {
                out.push_str("\n- ");
                out.push_str(hint);
            }
        }

        if !patterns.is_empty() {
            out.push_str("\n\nApproaches that scored well on similar tasks:");
            for pattern in patterns {
                out.push_str("\n- ");
                out.push_str(pattern);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_prompt_plain() {
        assert_eq!(AgentPromptTemplate::task_prompt("  Sort it ", &[], &[]), "Sort it");
    }

    #[test]
    fn test_task_prompt_with_guidance_and_patterns() {
        let prompt = AgentPromptTemplate::task_prompt(
            "Sort it",
            &["Show each step.".to_string()],
            &["[persona:analytical] split | merge".to_string()],
        );
        assert_eq!(
            prompt,
            "Sort it\n\nGuidance:\n- Show each step.\n\nApproaches that scored well on similar tasks:\n- [persona:analytical] split | merge"
        );
    }

    #[test]
    fn test_agent_system_mentions_persona_and_tools() {
        let system =
            AgentPromptTemplate::agent_system(Persona::Adversarial, &["shell".to_string()]);
        assert!(system.contains("Persona: adversarial"));
        assert!(system.contains("Tools you may use: shell."));
        assert!(system.contains(FINAL_ANSWER_MARKER));

        let bare = AgentPromptTemplate::agent_system(Persona::Lateral, &[]);
        assert!(bare.contains("No tools are available"));
    }
}
