//! Output formatting utilities for CLI.

// Averages over game counts are intentionally lossy
#![allow(clippy::cast_precision_loss)]

use std::fmt::Write as _;

use serde::Serialize;
use units::game::NUM_PLAYERS;
use units::tournament::GameResult;

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Winner player ID (null if the time limit was reached).
    pub(super) winner: Option<u8>,
    /// Winner, or highest scorer on timeout.
    pub(super) leader: Option<u8>,
    /// Simulated seconds played.
    pub(super) game_time: f64,
    /// Per-player results.
    pub(super) players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Player ID (0 is the human seat).
    pub(super) id: u8,
    /// Display name.
    pub(super) name: String,
    /// Final score.
    pub(super) score: f64,
    /// Planets held at the end.
    pub(super) planets: u32,
    /// Most planets held at once.
    pub(super) peak_planets: u32,
    /// Planets captured.
    pub(super) captures: u32,
    /// Attacks launched.
    pub(super) attacks: u32,
    /// Game time eliminated (null if survived).
    pub(super) eliminated_at: Option<f64>,
}

impl JsonGameResult {
    /// Create from a `GameResult`.
    pub(super) fn from_game_result(result: &GameResult, names: &[String]) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner,
            leader: result.leader(),
            game_time: result.game_time,
            players: result
                .player_stats
                .iter()
                .map(|ps| JsonPlayerResult {
                    id: ps.player_id,
                    name: player_name(names, ps.player_id).to_string(),
                    score: ps.final_score,
                    planets: ps.planets,
                    peak_planets: ps.peak_planets,
                    captures: ps.captures,
                    attacks: ps.attacks_launched,
                    eliminated_at: ps.eliminated_at,
                })
                .collect(),
        }
    }
}

fn player_name(names: &[String], id: u8) -> &str {
    names.get(usize::from(id)).map_or("Unknown", String::as_str)
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult, names: &[String]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    match (result.winner, result.leader()) {
        (Some(winner), _) => {
            let _ = writeln!(
                output,
                "  Winner: Player {winner} ({})",
                player_name(names, winner)
            );
        }
        (None, Some(leader)) => {
            let _ = writeln!(
                output,
                "  Time limit reached, leader: Player {leader} ({})",
                player_name(names, leader)
            );
        }
        (None, None) => output.push_str("  Winner: Draw\n"),
    }
    let _ = writeln!(output, "  Game time: {:.1}s\n", result.game_time);

    for stats in &result.player_stats {
        let _ = write!(
            output,
            "  Player {}: {:.0} points, {} planets ({} peak, {} captures) ({})",
            stats.player_id,
            stats.final_score,
            stats.planets,
            stats.peak_planets,
            stats.captures,
            player_name(names, stats.player_id)
        );
        if let Some(time) = stats.eliminated_at {
            let _ = write!(output, " [eliminated at {time:.1}s]");
        }
        output.push('\n');
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct TournamentStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Games that could not be run.
    pub(super) failures: u64,
    /// Outright win count per player.
    pub(super) wins: Vec<u64>,
    /// Timeout lead count per player.
    pub(super) leads: Vec<u64>,
    /// Games that hit the time limit.
    pub(super) timeouts: u64,
    /// Total score per player.
    total_scores: Vec<f64>,
    /// Score sum of squares for std dev calculation.
    score_sq_sums: Vec<f64>,
    /// Total simulated seconds across all games.
    total_game_time: f64,
}

impl TournamentStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            games_played: 0,
            failures: 0,
            wins: vec![0; num_players],
            leads: vec![0; num_players],
            timeouts: 0,
            total_scores: vec![0.0; num_players],
            score_sq_sums: vec![0.0; num_players],
            total_game_time: 0.0,
        }
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_game_time += result.game_time;

        if let Some(winner) = result.winner {
            if let Some(w) = self.wins.get_mut(usize::from(winner)) {
                *w += 1;
            }
        } else {
            self.timeouts += 1;
            if let Some(l) = result
                .leader()
                .and_then(|leader| self.leads.get_mut(usize::from(leader)))
            {
                *l += 1;
            }
        }

        for (i, stats) in result.player_stats.iter().enumerate() {
            if i < self.total_scores.len() {
                self.total_scores[i] += stats.final_score;
                self.score_sq_sums[i] += stats.final_score * stats.final_score;
            }
        }
    }

    /// Record a game that failed to run.
    pub(super) fn add_failure(&mut self) {
        self.failures += 1;
    }

    /// Merge another set of stats into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.failures += other.failures;
        self.timeouts += other.timeouts;
        self.total_game_time += other.total_game_time;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.leads.iter_mut().zip(&other.leads) {
            *a += b;
        }
        for (a, b) in self.total_scores.iter_mut().zip(&other.total_scores) {
            *a += b;
        }
        for (a, b) in self.score_sq_sums.iter_mut().zip(&other.score_sq_sums) {
            *a += b;
        }
    }

    /// Get win rate for a player (0.0-1.0).
    pub(super) fn win_rate(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get average score for a player.
    pub(super) fn avg_score(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_scores.get(player_idx).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Get score standard deviation for a player.
    pub(super) fn score_std_dev(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_score(player_idx);
        let sq_sum = self.score_sq_sums.get(player_idx).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Get average game length in simulated seconds.
    pub(super) fn avg_game_time(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_game_time / self.games_played as f64
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Games that could not be run.
    failures: u64,
    /// Per-player statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Games that hit the time limit.
    timeouts: u64,
    /// Average game length in simulated seconds.
    avg_game_time: f64,
}

/// JSON-serializable per-player tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Player ID.
    player: usize,
    /// Display name.
    name: String,
    /// Number of outright wins.
    wins: u64,
    /// Number of timeout leads.
    leads: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average score.
    avg_score: f64,
    /// Score standard deviation.
    score_std_dev: f64,
}

impl JsonTournamentResult {
    /// Create from stats and player names.
    pub(super) fn from_stats(stats: &TournamentStats, names: &[String]) -> Self {
        let players = (0..NUM_PLAYERS)
            .map(|i| JsonTournamentPlayer {
                player: i,
                name: names.get(i).cloned().unwrap_or_default(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                leads: stats.leads.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_score: stats.avg_score(i),
                score_std_dev: stats.score_std_dev(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            failures: stats.failures,
            players,
            timeouts: stats.timeouts,
            avg_game_time: stats.avg_game_time(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let leads = stats.leads.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        let _ = writeln!(
            output,
            "  Player {i} ({name}): {rate:.1}% ({wins} wins, {leads} timeout leads)"
        );
    }
    let timeout_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.timeouts as f64 / stats.games_played as f64 * 100.0
    };
    let _ = writeln!(output, "  Timeouts: {} ({timeout_rate:.1}%)\n", stats.timeouts);

    output.push_str("Average Scores:\n");
    for (i, name) in names.iter().enumerate() {
        let avg = stats.avg_score(i);
        let std = stats.score_std_dev(i);
        let _ = writeln!(output, "  Player {i} ({name}): {avg:.1} (+/- {std:.1})");
    }

    let _ = writeln!(
        output,
        "\nAverage Game Length: {:.1}s",
        stats.avg_game_time()
    );
    if stats.failures > 0 {
        let _ = writeln!(output, "Failed games: {}", stats.failures);
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str("player,name,wins,leads,win_rate,avg_score,score_std_dev\n");

    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{},{},{},{},{:.4},{:.2},{:.2}",
            i,
            name,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.leads.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_score(i),
            stats.score_std_dev(i)
        );
    }

    output
}
