//! Text reports for the start screen

use crate::stats::{LeaderboardEntry, MatchStats, Tally};

/// One line per leaderboard entry, fewest moves first, at most `top` lines.
///
/// Entries named `ai_name` are games the AI won against an anonymous human.
pub fn leaderboard_lines(entries: &[LeaderboardEntry], ai_name: &str, top: usize) -> Vec<String> {
    let mut sorted: Vec<&LeaderboardEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.moves);
    sorted
        .into_iter()
        .take(top)
        .enumerate()
        .map(|(i, e)| {
            if e.name == ai_name {
                format!("{}. {} beat someone in {} moves", i + 1, ai_name, e.moves)
            } else {
                format!("{}. {} beat {} in {} moves", i + 1, e.name, ai_name, e.moves)
            }
        })
        .collect()
}

/// Generate the statistics block
pub fn stats_report(stats: &MatchStats, ai_name: &str) -> String {
    let mut report = String::new();
    report.push_str("=== Statistics ===\n");
    report.push_str(&format!(
        "{:<12} {:>6} wins ({:.1}%)\n",
        "Humans:",
        stats.human_wins,
        stats.percent(Tally::HumanWin)
    ));
    report.push_str(&format!(
        "{:<12} {:>6} wins ({:.1}%)\n",
        format!("{ai_name}:"),
        stats.ai_wins,
        stats.percent(Tally::AiWin)
    ));
    report.push_str(&format!(
        "{:<12} {:>6}      ({:.1}%)\n",
        "Draws:",
        stats.draws,
        stats.percent(Tally::Draw)
    ));
    report
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
