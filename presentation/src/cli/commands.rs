//! CLI command definitions

use arena_domain::{JudgeMode, Persona, PlanOverrides, TaskCategory, WeightVector};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for race outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every agent, score, evidence, the gate and learning
    Full,
    /// Only the winning answer
    Winner,
    /// JSON output
    Json,
}

/// CLI arguments for agent-arena
#[derive(Parser, Debug)]
#[command(name = "agent-arena")]
#[command(author, version, about = "Race several agents on one task and learn from the winner")]
#[command(long_about = r#"
Agent Arena runs several agents with different personas on the same task,
has a judge score every answer with evidence, and feeds the winning approach
back to the other agents when the verdict is trustworthy.

The race has four steps:
1. Race: every agent answers the task concurrently
2. Judge: answers are scored on accuracy, completeness, clarity and insight
3. Gate: the verdict must clear total, margin and accuracy thresholds
4. Learn: a high-quality trusted winner becomes a pattern for the others

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./arena.toml        Project-level config
3. ~/.config/agent-arena/config.toml   Global config

Example:
  agent-arena "Write a function that reverses a linked list"
  agent-arena --category math --mode consensus "Prove there are infinitely many primes"
  agent-arena -p analytical -p adversarial -m gpt-4o -m gpt-4o-mini "Review this SQL"
"#)]
pub struct Cli {
    /// The task prompt
    pub prompt: Option<String>,

    /// Task category (classified from the prompt when omitted)
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: Option<TaskCategory>,

    /// Personas in the line-up, one agent each (can be specified multiple times)
    #[arg(short, long, value_name = "PERSONA")]
    pub persona: Vec<Persona>,

    /// Models assigned to agents in turn (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Model used by the judge
    #[arg(long, value_name = "MODEL")]
    pub judge_model: Option<String>,

    /// Judge mode: single or consensus
    #[arg(long, value_name = "MODE")]
    pub mode: Option<JudgeMode>,

    /// Metric weights as accuracy,completeness,clarity,insight
    #[arg(long, value_name = "A,B,C,D")]
    pub weights: Option<WeightVector>,

    /// Tools advertised to the agents, replacing the category default
    #[arg(long, value_name = "TOOL")]
    pub tool: Vec<String>,

    /// Do not learn from this race
    #[arg(long)]
    pub no_learning: bool,

    /// Disable the confidence gate
    #[arg(long)]
    pub no_gate: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Plan overrides requested on the command line
    pub fn plan_overrides(&self) -> PlanOverrides {
        PlanOverrides {
            tools: (!self.tool.is_empty()).then(|| self.tool.clone()),
            judge_mode: self.mode,
            weights: self.weights,
        }
    }

    /// The prompt, trimmed, if one was given
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["agent-arena", "What is 2+2?"]).unwrap();
        assert_eq!(cli.prompt_text(), Some("What is 2+2?"));
        assert_eq!(cli.output, OutputFormat::Full);
        assert!(cli.category.is_none());
        assert!(cli.persona.is_empty());
        assert_eq!(cli.plan_overrides(), PlanOverrides::default());
    }

    #[test]
    fn test_typed_arguments() {
        let cli = Cli::try_parse_from([
            "agent-arena",
            "--category",
            "math",
            "-p",
            "analytical",
            "-p",
            "adversarial",
            "--mode",
            "consensus",
            "--weights",
            "2,1,1,0",
            "--tool",
            "calculator",
            "-o",
            "json",
            "-vv",
            "solve x^2 = 4",
        ])
        .unwrap();

        assert_eq!(cli.category, Some(TaskCategory::Math));
        assert_eq!(cli.persona, vec![Persona::Analytical, Persona::Adversarial]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);

        let overrides = cli.plan_overrides();
        assert_eq!(overrides.judge_mode, Some(JudgeMode::Consensus));
        assert_eq!(overrides.tools, Some(vec!["calculator".to_string()]));
        let weights = overrides.weights.unwrap();
        assert!((weights.accuracy - 0.5).abs() < 1e-9);
        assert!((weights.insight - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_unknown_persona() {
        assert!(Cli::try_parse_from(["agent-arena", "-p", "wizard", "hi"]).is_err());
    }

    #[test]
    fn test_blank_prompt_is_none() {
        let cli = Cli::try_parse_from(["agent-arena", "   "]).unwrap();
        assert!(cli.prompt_text().is_none());
    }
}
