//! Output formatting utilities for CLI.

// Allow format! with push_str and lossy float stats - this is report text
#![allow(clippy::format_push_string, clippy::cast_precision_loss)]

use camelrace::sim::RaceResult;
use camelrace::{CamelColor, PlayerId};
use serde::Serialize;

/// JSON-serializable race result.
#[derive(Debug, Serialize)]
pub(super) struct JsonRaceResult<'a> {
    /// Random seed used.
    seed: u64,
    /// Winning camel.
    winner_camel: CamelColor,
    /// Last camel.
    loser_camel: CamelColor,
    /// Richest seats (several on a tie).
    winners: &'a [PlayerId],
    /// Legs played.
    legs: u32,
    /// Accepted actions.
    actions: u32,
    /// Refused policy choices.
    refused: u32,
    /// Per-seat results.
    players: Vec<JsonPlayerResult<'a>>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult<'a> {
    /// Seat (1-8).
    id: PlayerId,
    /// Policy name.
    policy: &'a str,
    /// Final balance.
    money: u32,
}

impl<'a> JsonRaceResult<'a> {
    /// Create from a `RaceResult`.
    pub(super) fn from_race_result(result: &'a RaceResult) -> Self {
        Self {
            seed: result.seed,
            winner_camel: result.standing.winner,
            loser_camel: result.standing.loser,
            winners: &result.winners,
            legs: result.legs,
            actions: result.actions,
            refused: result.refused,
            players: result
                .policies
                .iter()
                .zip(&result.balances)
                .zip(1..)
                .map(|((policy, &money), id)| JsonPlayerResult { id, policy, money })
                .collect(),
        }
    }
}

/// Format a race result as human-readable text.
pub(super) fn format_text(result: &RaceResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Race Result (seed: {})\n", result.seed));
    output.push_str(&format!(
        "  Camels: {} won, {} last\n",
        result.standing.winner, result.standing.loser
    ));
    output.push_str(&format!(
        "  Legs: {}, actions: {} ({} refused)\n\n",
        result.legs, result.actions, result.refused
    ));

    for ((policy, money), id) in result.policies.iter().zip(&result.balances).zip(1u8..) {
        output.push_str(&format!("  Player {id} ({policy}): {money} coins"));
        if result.winners.contains(&id) {
            output.push_str(" [winner]");
        }
        output.push('\n');
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default, Clone)]
pub(super) struct TournamentStats {
    /// Total races played.
    pub(super) games_played: u64,
    /// Races that failed to finish.
    pub(super) failures: u64,
    /// Win count per seat (ties credit every richest seat).
    pub(super) wins: Vec<u64>,
    /// Races won by more than one seat.
    pub(super) shared: u64,
    /// Total balance per seat.
    total_money: Vec<f64>,
    /// Balance sum of squares for std dev calculation.
    money_sq_sums: Vec<f64>,
    /// Total legs across all races.
    total_legs: u64,
    /// Race wins per camel, in `CamelColor::RACING` order.
    camel_wins: [u64; CamelColor::RACING.len()],
}

impl TournamentStats {
    /// Create new stats for n seats.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            total_money: vec![0.0; num_players],
            money_sq_sums: vec![0.0; num_players],
            ..Self::default()
        }
    }

    /// Add a race result to the stats.
    pub(super) fn add_result(&mut self, result: &RaceResult) {
        self.games_played += 1;
        self.total_legs += u64::from(result.legs);

        for &winner in &result.winners {
            if let Some(wins) = self.wins.get_mut(usize::from(winner) - 1) {
                *wins += 1;
            }
        }
        if result.winners.len() > 1 {
            self.shared += 1;
        }

        for (i, &money) in result.balances.iter().enumerate() {
            if i < self.total_money.len() {
                let money = f64::from(money);
                self.total_money[i] += money;
                self.money_sq_sums[i] += money * money;
            }
        }

        if let Some(idx) = CamelColor::RACING.iter().position(|&c| c == result.standing.winner) {
            self.camel_wins[idx] += 1;
        }
    }

    /// Count a race that did not finish.
    pub(super) fn add_failure(&mut self) {
        self.failures += 1;
    }

    /// Fold another thread's stats into these.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.failures += other.failures;
        self.shared += other.shared;
        self.total_legs += other.total_legs;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_money.iter_mut().zip(&other.total_money) {
            *a += b;
        }
        for (a, b) in self.money_sq_sums.iter_mut().zip(&other.money_sq_sums) {
            *a += b;
        }
        for (a, b) in self.camel_wins.iter_mut().zip(&other.camel_wins) {
            *a += b;
        }
    }

    /// Get win rate for a seat (0.0-1.0).
    pub(super) fn win_rate(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get average final balance for a seat.
    pub(super) fn avg_money(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_money.get(player_idx).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Get final balance standard deviation for a seat.
    pub(super) fn money_std_dev(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_money(player_idx);
        let sq_sum = self.money_sq_sums.get(player_idx).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Get average race length in legs.
    pub(super) fn avg_legs(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_legs as f64 / self.games_played as f64
    }

    /// Camels that won at least one race, with their win counts.
    pub(super) fn camel_wins(&self) -> impl Iterator<Item = (CamelColor, u64)> + '_ {
        CamelColor::RACING
            .iter()
            .zip(&self.camel_wins)
            .filter(|&(_, &n)| n > 0)
            .map(|(&c, &n)| (c, n))
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total races played.
    games_played: u64,
    /// Races that failed to finish.
    failures: u64,
    /// Races with a shared win.
    shared_wins: u64,
    /// Average race length in legs.
    avg_legs: f64,
    /// Per-seat statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Race wins per camel.
    camel_wins: Vec<(CamelColor, u64)>,
}

/// JSON-serializable per-seat tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Seat (1-based).
    player: usize,
    /// Policy name.
    bot: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average final balance.
    avg_money: f64,
    /// Final balance standard deviation.
    money_std_dev: f64,
}

impl JsonTournamentResult {
    /// Create from stats and policy names.
    pub(super) fn from_stats(stats: &TournamentStats, bot_names: &[String]) -> Self {
        let players = bot_names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonTournamentPlayer {
                player: i + 1,
                bot: name.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_money: stats.avg_money(i),
                money_std_dev: stats.money_std_dev(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            failures: stats.failures,
            shared_wins: stats.shared,
            avg_legs: stats.avg_legs(),
            players,
            camel_wins: stats.camel_wins().collect(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, bot_names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} races)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in bot_names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        output.push_str(&format!("  Player {} ({name}): {rate:.1}% ({wins} wins)\n", i + 1));
    }
    output.push_str(&format!("  Shared wins: {}\n\n", stats.shared));

    output.push_str("Average Final Balance:\n");
    for (i, name) in bot_names.iter().enumerate() {
        output.push_str(&format!(
            "  Player {} ({name}): {:.1} (+/- {:.1})\n",
            i + 1,
            stats.avg_money(i),
            stats.money_std_dev(i)
        ));
    }

    output.push_str("\nRace Winners:\n");
    for (camel, wins) in stats.camel_wins() {
        output.push_str(&format!("  {camel}: {wins}\n"));
    }

    output.push_str(&format!("\nAverage Race Length: {:.1} legs\n", stats.avg_legs()));
    if stats.failures > 0 {
        output.push_str(&format!("Failed races: {}\n", stats.failures));
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, bot_names: &[String]) -> String {
    let mut output = String::new();

    output.push_str("player,bot,wins,win_rate,avg_money,money_std_dev\n");
    for (i, name) in bot_names.iter().enumerate() {
        output.push_str(&format!(
            "{},{},{},{:.4},{:.2},{:.2}\n",
            i + 1,
            name,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_money(i),
            stats.money_std_dev(i)
        ));
    }

    output
}
