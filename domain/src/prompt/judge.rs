//! Prompt templates for the judge

use crate::agent::AgentRunResult;
use crate::core::category::TaskCategory;

/// Templates for generating judge prompts
pub struct JudgePromptTemplate;

impl JudgePromptTemplate {
    pub fn judge_system() -> &'static str {
        r#"You are an impartial judge comparing independent answers to the same task.
Score every answer on four metrics from 0 to 10: accuracy, completeness, clarity, insight.
Back every metric with a short verbatim quote from the answer and a one-sentence rationale.
Do not reward length or confidence for its own sake. Respond with JSON only."#
    }

    /// User prompt for one judge pass
    pub fn judge_prompt(task: &str, category: TaskCategory, results: &[AgentRunResult]) -> String {
        let mut prompt = format!(
            "Task category: {}\n\nTask:\n{}\n\nAnswers to score:\n",
            category,
            task.trim()
        );

        for result in results {
            prompt.push_str(&format!(
                "\n--- {} ({}) ---\n{}\n",
                result.agent_id,
                result.persona,
                result.response.trim()
            ));
        }

        let ids: Vec<&str> = results.iter().map(|r| r.agent_id.as_str()).collect();
        prompt.push_str(&format!(
            r#"
Return exactly one JSON object, one entry per answer ({ids}):
{{
  "summary": "<one sentence naming the best answer and why>",
  "scores": [
    {{
      "agent_id": "<id>",
      "accuracy": <0-10>, "completeness": <0-10>, "clarity": <0-10>, "insight": <0-10>,
      "reasoning": "<two sentences>",
      "evidence": {{
        "accuracy": {{"quote": "<verbatim>", "rationale": "<why>"}},
        "completeness": {{"quote": "<verbatim>", "rationale": "<why>"}},
        "clarity": {{"quote": "<verbatim>", "rationale": "<why>"}},
        "insight": {{"quote": "<verbatim>", "rationale": "<why>"}}
      }}
    }}
  ]
}}"#,
            ids = ids.join(", ")
        ));

        prompt
    }
}
