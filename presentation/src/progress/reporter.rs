//! Progress reporting for races

use arena_application::ports::progress::ProgressNotifier;
use arena_domain::{AgentRunResult, AgentSlot, JudgeMode, JudgeResult, ReasoningStep, TaskId};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// Reports race progress with one spinner per agent
pub struct ProgressReporter {
    multi: MultiProgress,
    /// Keyed by `task_id/agent_id`
    bars: Mutex<HashMap<String, ProgressBar>>,
    judge_bar: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_multi(MultiProgress::new(), false)
    }

    /// Create with verbose output (prints every reasoning step)
    pub fn verbose() -> Self {
        Self::with_multi(MultiProgress::new(), true)
    }

    fn with_multi(multi: MultiProgress, verbose: bool) -> Self {
        Self {
            multi,
            bars: Mutex::new(HashMap::new()),
            judge_bar: Mutex::new(None),
            verbose,
        }
    }

    fn agent_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn judge_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {prefix:.bold.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn key(task_id: &TaskId, agent_id: &str) -> String {
        format!("{}/{}", task_id, agent_id)
    }

    fn with_bar(&self, task_id: &TaskId, agent_id: &str, f: impl FnOnce(&ProgressBar)) {
        if let Ok(bars) = self.bars.lock()
            && let Some(pb) = bars.get(&Self::key(task_id, agent_id))
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_started(&self, task_id: &TaskId, slots: &[AgentSlot]) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        for slot in slots {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::agent_style());
            pb.set_prefix(format!("{} ({})", slot.agent_id, slot.persona));
            pb.set_message(format!("{}", slot.model.to_string().dimmed()));
            pb.enable_steady_tick(Duration::from_millis(100));
            bars.insert(Self::key(task_id, &slot.agent_id), pb);
        }
    }

    fn on_reasoning_step(&self, task_id: &TaskId, agent_id: &str, step: &ReasoningStep) {
        self.with_bar(task_id, agent_id, |pb| {
            pb.set_message(format!("step {}: {}", step.index, truncate(&step.thought, 50)));
            if self.verbose {
                pb.println(format!(
                    "  {} {} {}",
                    agent_id.cyan(),
                    format!("#{}", step.index).dimmed(),
                    step.thought.dimmed()
                ));
            }
        });
    }

    fn on_agent_complete(&self, task_id: &TaskId, result: &AgentRunResult) {
        let Some(pb) = self
            .bars
            .lock()
            .ok()
            .and_then(|mut bars| bars.remove(&Self::key(task_id, &result.agent_id)))
        else {
            return;
        };

        if result.is_usable() {
            pb.finish_with_message(format!(
                "{} {} steps, {} tokens",
                "done".green(),
                result.reasoning.len(),
                result.cost.tokens
            ));
        } else {
            pb.finish_with_message(format!(
                "{} {}",
                "failed".red(),
                truncate(result.error.as_deref().unwrap_or("no answer"), 60)
            ));
        }
    }

    fn on_judging_started(&self, _task_id: &TaskId, mode: JudgeMode, candidates: usize) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::judge_style());
        pb.set_prefix("Judge");
        pb.set_message(format!("{} judging of {} answers", mode, candidates));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.judge_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_complete(&self, task_id: &TaskId, judge: Option<&JudgeResult>) {
        if let Ok(mut bars) = self.bars.lock() {
            let prefix = format!("{}/", task_id);
            bars.retain(|key, pb| {
                let ours = key.starts_with(&prefix);
                if ours {
                    pb.finish_and_clear();
                }
                !ours
            });
        }

        if let Some(pb) = self.judge_bar.lock().ok().and_then(|mut b| b.take()) {
            match judge.and_then(|j| j.winner()) {
                Some(winner) => pb.finish_with_message(format!(
                    "{} {} ({}/40)",
                    "winner".green(),
                    winner.agent_id.bold(),
                    winner.total
                )),
                None => pb.finish_with_message(format!("{}", "no verdict".red())),
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress {
    verbose: bool,
}

impl SimpleProgress {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_started(&self, task_id: &TaskId, slots: &[AgentSlot]) {
        println!(
            "{} {} ({} agents)",
            "->".cyan(),
            format!("Race {}", task_id).bold(),
            slots.len()
        );
    }

    fn on_reasoning_step(&self, _task_id: &TaskId, agent_id: &str, step: &ReasoningStep) {
        if self.verbose {
            println!("  {} #{} {}", agent_id, step.index, step.thought);
        }
    }

    fn on_agent_complete(&self, _task_id: &TaskId, result: &AgentRunResult) {
        if result.is_usable() {
            println!("  {} {} ({})", "v".green(), result.agent_id, result.persona);
        } else {
            println!(
                "  {} {} (failed: {})",
                "x".red(),
                result.agent_id,
                result.error.as_deref().unwrap_or("no answer")
            );
        }
    }

    fn on_judging_started(&self, _task_id: &TaskId, mode: JudgeMode, candidates: usize) {
        println!("{} Judging {} answers ({})", "->".cyan(), candidates, mode);
    }

    fn on_complete(&self, _task_id: &TaskId, judge: Option<&JudgeResult>) {
        if let Some(winner) = judge.and_then(|j| j.winner()) {
            println!("  Winner: {} ({}/40)", winner.agent_id, winner.total);
        }
        println!();
    }
}

/// Progress observer that only writes log events
pub struct LogProgress;

impl ProgressNotifier for LogProgress {
    fn on_started(&self, task_id: &TaskId, slots: &[AgentSlot]) {
        let agents: Vec<&str> = slots.iter().map(|s| s.agent_id.as_str()).collect();
        info!(task = %task_id, agents = ?agents, "Race started");
    }

    fn on_reasoning_step(&self, task_id: &TaskId, agent_id: &str, step: &ReasoningStep) {
        info!(
            task = %task_id,
            agent = agent_id,
            step = step.index,
            confidence = step.confidence,
            "{}",
            step.thought
        );
    }

    fn on_agent_complete(&self, task_id: &TaskId, result: &AgentRunResult) {
        info!(
            task = %task_id,
            agent = %result.agent_id,
            success = result.success,
            tokens = result.cost.tokens,
            duration_ms = result.cost.duration_ms,
            "Agent settled"
        );
    }

    fn on_judging_started(&self, task_id: &TaskId, mode: JudgeMode, candidates: usize) {
        info!(task = %task_id, mode = %mode, candidates, "Judging started");
    }

    fn on_complete(&self, task_id: &TaskId, judge: Option<&JudgeResult>) {
        match judge.and_then(|j| j.winner()) {
            Some(w) => info!(task = %task_id, winner = %w.agent_id, total = w.total, "Race complete"),
            None => info!(task = %task_id, "Race ended without a verdict"),
        }
    }
}

/// Truncate to at most `max_chars` characters, marking the cut
fn truncate(s: &str, max_chars: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    if first_line.chars().count() <= max_chars && first_line.len() == s.trim_end().len() {
        return first_line.to_string();
    }
    let kept: String = first_line
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect();
    format!("{}...", kept)
}
