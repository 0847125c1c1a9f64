//! Output formatting utilities for CLI.

// Score statistics are reported as floats
#![allow(clippy::cast_precision_loss, clippy::format_push_string)]

use gridbots::arena::{AgentId, Effect, TurnReport};
use gridbots::tournament::RoundResult;
use gridbots::RoundReport;
use serde::Serialize;

/// JSON-serializable round result.
#[derive(Debug, Serialize)]
pub(super) struct JsonRoundResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Number of parse trees the program has.
    pub(super) candidates: usize,
    /// Index of the tree the arena picked.
    pub(super) selected: usize,
    /// The picked tree.
    pub(super) program: String,
    /// The player's final score.
    pub(super) score: i64,
    /// Turns played.
    pub(super) turns_played: u32,
    /// Whether the player died.
    pub(super) died: bool,
    /// Whether the player was eaten.
    pub(super) eaten: bool,
    /// Per-turn effects (empty when quiet).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) turns: Vec<JsonTurn>,
}

/// JSON-serializable turn.
#[derive(Debug, Serialize)]
pub(super) struct JsonTurn {
    /// Turn index.
    turn: u32,
    /// Effects in acting order.
    effects: Vec<JsonEffect>,
    /// Agents whose program failed to evaluate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<JsonFailure>,
}

#[derive(Debug, Serialize)]
struct JsonEffect {
    agent: AgentId,
    #[serde(flatten)]
    effect: Effect,
}

#[derive(Debug, Serialize)]
struct JsonFailure {
    agent: AgentId,
    error: String,
}

impl JsonTurn {
    /// Create from a turn report.
    pub(super) fn from_report(report: &TurnReport) -> Self {
        Self {
            turn: report.turn,
            effects: report
                .effects
                .iter()
                .map(|&(agent, effect)| JsonEffect { agent, effect })
                .collect(),
            failures: report
                .failures
                .iter()
                .map(|(agent, error)| JsonFailure {
                    agent: *agent,
                    error: error.to_string(),
                })
                .collect(),
        }
    }
}

impl JsonRoundResult {
    /// Create from a finished round.
    pub(super) fn new(
        seed: u64,
        candidates: usize,
        selected: usize,
        program: String,
        report: &RoundReport,
        turns: Vec<JsonTurn>,
    ) -> Self {
        Self {
            seed,
            candidates,
            selected,
            program,
            score: report.score,
            turns_played: report.turns_played,
            died: report.died,
            eaten: report.eaten,
            turns,
        }
    }
}

/// Describe one effect in words.
pub(super) fn describe_effect(agent: AgentId, effect: &Effect) -> String {
    match effect {
        Effect::Idle => format!("{agent} idles"),
        Effect::Moved { to } => format!("{agent} moves to {to}"),
        Effect::Blocked => format!("{agent} is blocked"),
        Effect::FellOff => format!("{agent} walks off the edge and dies"),
        Effect::Hit { target } => format!("{agent} shoots {target}"),
        Effect::Missed => format!("{agent} shoots and misses"),
        Effect::HeldFire => format!("{agent} holds fire"),
        Effect::Ate { corpses } => format!("{agent} eats {corpses} corpse(s)"),
        Effect::Choked { on, corpses } => {
            format!("{agent} eats {corpses} corpse(s) and chokes on {on}")
        }
        Effect::Duplicated { child } => format!("{agent} duplicates into {child}"),
        Effect::NoRoom => format!("{agent} has no room to duplicate"),
    }
}

/// Format a round result as human-readable text.
pub(super) fn format_text(result: &JsonRoundResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Round Result (seed: {})\n", result.seed));
    output.push_str(&format!(
        "  Program: {} (reading {} of {})\n",
        result.program,
        result.selected + 1,
        result.candidates
    ));
    output.push_str(&format!("  Turns: {}\n", result.turns_played));
    output.push_str(&format!("  Score: {}", result.score));
    if result.eaten {
        output.push_str(" [eaten]");
    } else if result.died {
        output.push_str(" [dead]");
    }
    output.push('\n');

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct TournamentStats {
    /// Rounds played to the end.
    pub(super) games_played: u64,
    /// Rounds where no reading of the program survived the dry run.
    pub(super) rejected: u64,
    /// Rounds where the player died.
    pub(super) deaths: u64,
    /// Rounds where the player was eaten.
    pub(super) eaten: u64,
    /// Rounds where a reading other than the first was picked.
    pub(super) reinterpreted: u64,
    /// Lowest score seen.
    pub(super) min_score: Option<i64>,
    /// Highest score seen.
    pub(super) max_score: Option<i64>,
    total_score: i64,
    score_sq_sum: f64,
    total_turns: u64,
}

impl TournamentStats {
    /// Create empty stats.
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Add a round result to the stats.
    pub(super) fn add_result(&mut self, result: &RoundResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);
        self.deaths += u64::from(result.died);
        self.eaten += u64::from(result.eaten);
        self.reinterpreted += u64::from(result.selected != 0);
        self.total_score += result.score;
        self.score_sq_sum += (result.score as f64) * (result.score as f64);
        self.min_score = Some(self.min_score.map_or(result.score, |m| m.min(result.score)));
        self.max_score = Some(self.max_score.map_or(result.score, |m| m.max(result.score)));
    }

    /// Count a round the program was rejected in.
    pub(super) fn add_rejection(&mut self) {
        self.rejected += 1;
    }

    /// Fold another thread's stats into these.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.rejected += other.rejected;
        self.deaths += other.deaths;
        self.eaten += other.eaten;
        self.reinterpreted += other.reinterpreted;
        self.total_score += other.total_score;
        self.score_sq_sum += other.score_sq_sum;
        self.total_turns += other.total_turns;
        self.min_score = match (self.min_score, other.min_score) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_score = match (self.max_score, other.max_score) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Rounds attempted, rejected ones included.
    pub(super) fn attempted(&self) -> u64 {
        self.games_played + self.rejected
    }

    /// Get average score.
    pub(super) fn avg_score(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.games_played as f64
    }

    /// Get score standard deviation.
    pub(super) fn score_std_dev(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_score();
        let variance = (self.score_sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Fraction of played rounds the player survived (0.0-1.0).
    pub(super) fn survival_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        (self.games_played - self.deaths) as f64 / self.games_played as f64
    }

    /// Get average round length.
    pub(super) fn avg_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    program: String,
    games_played: u64,
    rejected: u64,
    avg_score: f64,
    score_std_dev: f64,
    min_score: Option<i64>,
    max_score: Option<i64>,
    survival_rate: f64,
    eaten: u64,
    reinterpreted: u64,
    avg_turns: f64,
}

impl JsonTournamentResult {
    /// Create from stats and the program's file name.
    pub(super) fn from_stats(stats: &TournamentStats, program: &str) -> Self {
        Self {
            program: program.to_string(),
            games_played: stats.games_played,
            rejected: stats.rejected,
            avg_score: stats.avg_score(),
            score_std_dev: stats.score_std_dev(),
            min_score: stats.min_score,
            max_score: stats.max_score,
            survival_rate: stats.survival_rate(),
            eaten: stats.eaten,
            reinterpreted: stats.reinterpreted,
            avg_turns: stats.avg_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, program: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Tournament Results: {program} ({} rounds)\n",
        stats.attempted()
    ));
    output.push_str("========================================\n\n");

    if stats.rejected > 0 {
        output.push_str(&format!("  Rejected: {} rounds\n", stats.rejected));
    }
    output.push_str(&format!(
        "  Score: {:.1} (+/- {:.1})",
        stats.avg_score(),
        stats.score_std_dev()
    ));
    if let (Some(min), Some(max)) = (stats.min_score, stats.max_score) {
        output.push_str(&format!(" [min {min}, max {max}]"));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Survival: {:.1}% ({} eaten)\n",
        stats.survival_rate() * 100.0,
        stats.eaten
    ));
    output.push_str(&format!(
        "  Other readings picked: {} rounds\n",
        stats.reinterpreted
    ));
    output.push_str(&format!("\nAverage Round Length: {:.1} turns\n", stats.avg_turns()));

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, program: &str) -> String {
    let mut output = String::new();

    output.push_str(
        "program,games,rejected,avg_score,score_std_dev,min_score,max_score,survival_rate,eaten,avg_turns\n",
    );
    let bound = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
    output.push_str(&format!(
        "{},{},{},{:.2},{:.2},{},{},{:.4},{},{:.2}\n",
        program,
        stats.games_played,
        stats.rejected,
        stats.avg_score(),
        stats.score_std_dev(),
        bound(stats.min_score),
        bound(stats.max_score),
        stats.survival_rate(),
        stats.eaten,
        stats.avg_turns()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: i64, died: bool) -> RoundResult {
        RoundResult {
            seed: 0,
            score,
            turns_played: 10,
            died,
            eaten: false,
            selected: 0,
            enemies_alive: 3,
        }
    }

    #[test]
    fn test_stats_merge_matches_sequential() {
        let results = [result(2, false), result(-1, true), result(6, false), result(0, false)];

        let mut all = TournamentStats::new();
        for r in &results {
            all.add_result(r);
        }

        let mut left = TournamentStats::new();
        let mut right = TournamentStats::new();
        for r in &results[..1] {
            left.add_result(r);
        }
        for r in &results[1..] {
            right.add_result(r);
        }
        right.add_rejection();
        left.merge(&right);

        assert_eq!(left.games_played, 4);
        assert_eq!(left.rejected, 1);
        assert_eq!(left.attempted(), 5);
        assert_eq!(left.min_score, Some(-1));
        assert_eq!(left.max_score, Some(6));
        assert_eq!(left.deaths, 1);
        assert!((left.avg_score() - all.avg_score()).abs() < 1e-9);
        assert!((left.survival_rate() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = TournamentStats::new();
        assert!(stats.avg_score().abs() < f64::EPSILON);
        assert!(format_tournament_csv(&stats, "bot.gb").contains("bot.gb,0,0,"));
    }
}
