//! Structured plain-text rendering of a race.
//!
//! Meant to be diffed, grepped or pasted into a bug report. No colors.

// Allow format! with push_str for readability - the allocation overhead is negligible for text rendering
#![allow(clippy::format_push_string)]

use crate::game::{Die, Phase, Player, RaceState};

/// Render race state to structured text.
///
/// Output format:
/// ```text
/// === LEG 2, PLAYER 1 TO ACT ===
///
/// TRACK (finish line 16):
///   3: red, blue
///   5: [oasis of P2]
///   7: green, yellow, purple
///
/// STANDINGS: purple, yellow, green, blue, red
/// DICE LEFT: blue, green, yellow
/// NEXT TICKETS: red 5, blue 3, green 2, yellow -, purple 5
///
/// PLAYER 1 (alice): 7 coins
/// - tickets: purple 5
/// - pyramid credits: 1
/// ```
#[must_use]
pub fn render_text(state: &RaceState) -> String {
    let mut output = String::new();

    render_header(&mut output, state);
    render_track(&mut output, state);
    render_market(&mut output, state);
    for player in state.players() {
        render_player(&mut output, player);
    }

    output
}

fn render_header(output: &mut String, state: &RaceState) {
    match (state.phase(), state.standing()) {
        (Phase::RaceComplete, Some(standing)) => output.push_str(&format!(
            "=== RACE OVER AFTER LEG {}: {} WINS, {} LAST ===\n\n",
            state.leg(),
            standing.winner,
            standing.loser
        )),
        _ => output.push_str(&format!(
            "=== LEG {}, PLAYER {} TO ACT ===\n\n",
            state.leg(),
            state.current_player()
        )),
    }
}

fn render_track(output: &mut String, state: &RaceState) {
    let board = state.board();
    output.push_str(&format!("TRACK (finish line {}):\n", board.finish_line()));

    for position in 0..=board.max_position() {
        let camels: Vec<String> = board
            .occupants(position)
            .iter()
            .map(|c| c.color.to_string())
            .collect();
        let tile = board.tile_at(position);
        if camels.is_empty() && tile.is_none() {
            continue;
        }

        output.push_str(&format!("  {position}: "));
        if let Some(tile) = tile {
            let kind = match tile.kind {
                crate::game::TileKind::Oasis => "oasis",
                crate::game::TileKind::Mirage => "mirage",
            };
            output.push_str(&format!("[{kind} of P{}]", tile.owner));
            if !camels.is_empty() {
                output.push(' ');
            }
        }
        output.push_str(&camels.join(", "));
        output.push('\n');
    }
    output.push('\n');
}

fn render_market(output: &mut String, state: &RaceState) {
    let standings: Vec<String> = state
        .board()
        .leaderboard()
        .iter()
        .map(|c| c.color.to_string())
        .collect();
    output.push_str(&format!("STANDINGS: {}\n", standings.join(", ")));

    let dice: Vec<String> = state
        .dice()
        .remaining()
        .iter()
        .map(|d| match d {
            Die::Camel(color) => color.to_string(),
            Die::Wildcard => "wildcard".to_string(),
        })
        .collect();
    output.push_str(&format!("DICE LEFT: {}\n", dice.join(", ")));

    let tickets: Vec<String> = state
        .tickets()
        .colors()
        .map(|c| match state.tickets().peek_next_value(c) {
            Some(value) => format!("{c} {value}"),
            None => format!("{c} -"),
        })
        .collect();
    output.push_str(&format!("NEXT TICKETS: {}\n\n", tickets.join(", ")));
}

fn render_player(output: &mut String, player: &Player) {
    output.push_str(&format!(
        "PLAYER {} ({}): {} coins\n",
        player.id, player.name, player.money
    ));
    if !player.tickets.is_empty() {
        let tickets: Vec<String> = player
            .tickets
            .iter()
            .map(|t| format!("{} {}", t.camel, t.value))
            .collect();
        output.push_str(&format!("- tickets: {}\n", tickets.join(", ")));
    }
    if player.pyramid_credits > 0 {
        output.push_str(&format!("- pyramid credits: {}\n", player.pyramid_credits));
    }
    if player.placed_tile {
        output.push_str("- tile placed this leg\n");
    }
    if let Some(partner) = player.partner {
        output.push_str(&format!("- partnered with P{partner}\n"));
    }
    output.push('\n');
}
