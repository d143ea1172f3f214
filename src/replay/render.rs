//! ASCII renderer for terminal viewing with ANSI colors.

use crate::game::{Board, CamelColor, TileKind};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GRAY: &str = "\x1b[90m";

/// ANSI color and letter for a camel.
const fn camel_style(color: CamelColor) -> (&'static str, char) {
    match color {
        CamelColor::Red => ("\x1b[31m", 'R'),
        CamelColor::Blue => ("\x1b[34m", 'B'),
        CamelColor::Green => ("\x1b[32m", 'G'),
        CamelColor::Yellow => ("\x1b[33m", 'Y'),
        CamelColor::Purple => ("\x1b[35m", 'P'),
        CamelColor::White => ("\x1b[97m", 'W'),
        CamelColor::Black => ("\x1b[90m", 'K'),
    }
}

/// Render the track with ANSI colors, stacks growing upwards.
///
/// Output format:
/// ```text
///  P
///  Y     G
///  B  .  R  .  .  |  .  .  .
/// ---+--+--+--+--+--+--+--+--
///  0  1  2  3  4  5  6  7  8
///        +           -
/// ```
///
/// `|` marks the finish line; `+` and `-` under a square mark an oasis or a
/// mirage.
#[must_use]
pub fn render_ascii(board: &Board) -> String {
    let squares: Vec<i32> = (0..=board.max_position()).collect();
    let height = squares
        .iter()
        .map(|&p| board.occupants(p).len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut output = String::new();
    for level in (0..height).rev() {
        for &position in &squares {
            let cell = if position == board.finish_line() { '|' } else { ' ' };
            output.push(cell);
            match board.occupants(position).get(level) {
                Some(camel) => {
                    let (color, letter) = camel_style(camel.color);
                    output.push_str(&format!("{BOLD}{color}{letter}{RESET} "));
                }
                None if level == 0 => output.push_str(&format!("{GRAY}.{RESET} ")),
                None => output.push_str("  "),
            }
        }
        output.push('\n');
    }

    for _ in &squares {
        output.push_str("--+");
    }
    output.push('\n');
    for &position in &squares {
        output.push_str(&format!("{position:>2} "));
    }
    output.push('\n');
    for &position in &squares {
        let mark = match board.tile_at(position).map(|t| t.kind) {
            Some(TileKind::Oasis) => '+',
            Some(TileKind::Mirage) => '-',
            None => ' ',
        };
        output.push_str(&format!(" {mark} "));
    }
    output.push('\n');

    output
}
