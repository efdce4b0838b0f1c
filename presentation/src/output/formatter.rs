//! Output formatter trait

use arena_application::RaceOutcome;

/// Trait for formatting race outcomes
pub trait OutputFormatter {
    /// Format the complete outcome
    fn format(&self, outcome: &RaceOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &RaceOutcome) -> String;

    /// Format the winning answer only (concise output)
    fn format_winner_only(&self, outcome: &RaceOutcome) -> String;
}
