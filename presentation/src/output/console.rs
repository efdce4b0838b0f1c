//! Console output formatter for race outcomes

use crate::output::formatter::OutputFormatter;
use arena_application::{LearningOutcome, RaceOutcome};
use arena_domain::{AgentRunResult, JudgeResult, JudgeScore, Metric};
use colored::Colorize;

/// Formats race outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete outcome
    pub fn format(outcome: &RaceOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Agent Arena Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Task:".cyan().bold(),
            outcome.task.prompt()
        ));
        output.push_str(&format!(
            "{} {}  {} {}  {} {}\n",
            "Category:".cyan().bold(),
            outcome.plan.category,
            "Judge:".cyan().bold(),
            outcome.plan.judge_mode,
            "Weights:".cyan().bold(),
            outcome.plan.weights
        ));
        if !outcome.plan.tools.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Tools:".cyan().bold(),
                outcome.plan.tools.join(", ")
            ));
        }

        output.push_str(&Self::section_header("Agents"));
        for result in &outcome.agent_results {
            output.push_str(&Self::agent_block(result, &outcome.winner_id));
        }

        output.push_str(&Self::section_header("Scores"));
        for score in &outcome.judge.scores {
            output.push_str(&Self::score_block(score));
        }
        if !outcome.judge.panels.is_empty() {
            output.push_str(&Self::panel_block(&outcome.judge));
        }

        output.push_str(&Self::section_header("Verdict"));
        output.push_str(&Self::verdict_block(outcome));

        output.push_str(&Self::section_header("Learning"));
        output.push_str(&Self::learning_block(&outcome.learning));

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &RaceOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the winning answer only (concise output)
    pub fn format_winner_only(outcome: &RaceOutcome) -> String {
        let mut output = String::new();

        let total = outcome.judge.winner().map(|w| w.total).unwrap_or(0);
        output.push_str(&format!(
            "{}\n\n",
            format!("=== Winner: {} ({}/40) ===", outcome.winner_id, total)
                .cyan()
                .bold()
        ));

        match outcome.winner_result() {
            Some(result) => output.push_str(&result.response),
            None => output.push_str(&format!("{}", "(winner answer unavailable)".dimmed())),
        }
        output.push('\n');

        if !outcome.gate.passed {
            output.push_str(&format!(
                "\n{} {}\n",
                "Low confidence:".yellow().bold(),
                outcome.gate.reason
            ));
        }

        output
    }

    fn agent_block(result: &AgentRunResult, winner_id: &str) -> String {
        let title = format!("── {} ({}) ──", result.agent_id, result.persona);
        let title = if result.agent_id == winner_id {
            format!("{} {}", title.green().bold(), "winner".green())
        } else if result.is_usable() {
            format!("{}", title.yellow().bold())
        } else {
            format!("{}", title.red().bold())
        };

        if !result.is_usable() {
            return format!(
                "\n{}\nError: {}\n",
                title,
                result.error.as_deref().unwrap_or("no answer")
            );
        }

        let mut block = format!("\n{}\n{}\n", title, result.response);
        block.push_str(&format!(
            "{}\n",
            format!(
                "{} steps, {} tokens, {} ms",
                result.reasoning.len(),
                result.cost.tokens,
                result.cost.duration_ms
            )
            .dimmed()
        ));
        let tools = result.telemetry.sequence();
        if !tools.is_empty() {
            block.push_str(&format!("{}\n", format!("tools: {}", tools.join(" -> ")).dimmed()));
        }
        block
    }

    fn score_block(score: &JudgeScore) -> String {
        let mut flags = Vec::new();
        if score.penalized {
            flags.push(format!("penalized, similarity {:.2}", score.max_similarity));
        }
        if score.fallback {
            flags.push("fallback".to_string());
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join("; ")).yellow().to_string()
        };

        let mut block = format!(
            "\n{} {}/40 (base {}){}\n",
            score.agent_id.bold(),
            score.total,
            score.base_total,
            flags
        );
        for metric in Metric::ALL {
            let evidence = score.evidence.get(metric);
            block.push_str(&format!(
                "  {:<13} {:>4.1}  {}\n",
                metric.as_str(),
                score.metrics.get(metric),
                Self::evidence_line(&evidence.quote, &evidence.rationale).dimmed()
            ));
        }
        if let Some(adj) = &score.objective_adjustment {
            block.push_str(&format!(
                "  {} {} score {:.1} (accuracy {:+.1}, completeness {:+.1})\n",
                "objective:".cyan(),
                adj.scheme,
                adj.objective_score,
                adj.accuracy_delta,
                adj.completeness_delta
            ));
            for note in &adj.notes {
                block.push_str(&format!("    * {}\n", note));
            }
        }
        if !score.reasoning.is_empty() {
            block.push_str(&Self::indent(&score.reasoning, "  "));
            block.push('\n');
        }
        block
    }

    fn evidence_line(quote: &str, rationale: &str) -> String {
        match (quote.is_empty(), rationale.is_empty()) {
            (true, true) => "(no evidence)".to_string(),
            (true, false) => rationale.to_string(),
            (false, true) => format!("\"{}\"", quote),
            (false, false) => format!("\"{}\": {}", quote, rationale),
        }
    }

    fn panel_block(judge: &JudgeResult) -> String {
        let mut block = format!(
            "\n{} {} panels, agreement {:.0}%, disagreement {:.2}\n",
            "Consensus:".cyan().bold(),
            judge.panels.len(),
            judge.panel_agreement * 100.0,
            judge.disagreement_index
        );
        for panel in &judge.panels {
            let totals: Vec<String> = panel
                .scores
                .iter()
                .map(|s| format!("{} {}", s.agent_id, s.total))
                .collect();
            block.push_str(&format!(
                "  panel {}: winner {}{} ({})\n",
                panel.panel,
                panel.winner_id,
                if panel.fallback { " [fallback]" } else { "" },
                totals.join(", ")
            ));
        }
        block
    }

    fn verdict_block(outcome: &RaceOutcome) -> String {
        let judge = &outcome.judge;
        let gate = &outcome.gate;
        let mut block = format!(
            "\n{} {}\n{} {}\n{} {} (evidence coverage {:.0}%)\n",
            "Winner:".green().bold(),
            outcome.winner_id.bold(),
            "Summary:".cyan().bold(),
            judge.summary,
            "Confidence:".cyan().bold(),
            judge.confidence_level,
            judge.evidence_coverage * 100.0
        );

        let status = if !gate.enabled {
            "disabled".dimmed().to_string()
        } else if gate.passed {
            "passed".green().bold().to_string()
        } else {
            "failed".red().bold().to_string()
        };
        block.push_str(&format!(
            "{} {} (total {}/{}, margin {}/{}, accuracy {:.1}/{:.1})\n",
            "Gate:".cyan().bold(),
            status,
            gate.winner_total,
            gate.thresholds.min_total,
            gate.margin,
            gate.thresholds.min_margin,
            gate.winner_accuracy,
            gate.thresholds.min_accuracy
        ));
        if gate.enabled && !gate.passed {
            block.push_str(&format!("  {}\n", gate.reason.yellow()));
        }

        block.push_str(&format!(
            "{} {:+.1} over a {} baseline of {:.1}\n",
            "Lift:".cyan().bold(),
            outcome.lift,
            outcome.plan.category,
            outcome.baseline
        ));
        block
    }

    fn learning_block(learning: &LearningOutcome) -> String {
        match learning {
            LearningOutcome::Applied { pattern, records } => {
                let mut block = format!(
                    "\n{} pattern shared with {} agent(s)\n",
                    "Applied:".green().bold(),
                    records.len()
                );
                block.push_str(&Self::indent(pattern, "  "));
                block.push('\n');
                for record in records {
                    block.push_str(&format!(
                        "  {} success {:.2} over {} application(s), avg lift {:+.1}\n",
                        record.key.target_agent,
                        record.success_rate,
                        record.applications,
                        record.avg_lift
                    ));
                }
                block
            }
            LearningOutcome::Skipped { reason } => {
                format!("\n{} {}\n", "Skipped:".yellow().bold(), reason)
            }
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, outcome: &RaceOutcome) -> String {
        Self::format(outcome)
    }

    fn format_json(&self, outcome: &RaceOutcome) -> String {
        Self::format_json(outcome)
    }

    fn format_winner_only(&self, outcome: &RaceOutcome) -> String {
        Self::format_winner_only(outcome)
    }
}
