#![no_main]

//! Movement resolver fuzzer.
//!
//! Builds an arbitrary board (positions, stacks, tiles) and resolves one
//! roll, checking the board stays well formed and outside camels stay put.

use arbitrary::Arbitrary;
use camelrace::game::{check_board, resolve, Board, Camel, CamelColor, Tile, TileKind};
use libfuzzer_sys::fuzz_target;

const COLORS: [CamelColor; 7] = [
    CamelColor::Red,
    CamelColor::Blue,
    CamelColor::Green,
    CamelColor::Yellow,
    CamelColor::Purple,
    CamelColor::White,
    CamelColor::Black,
];

/// Structured input for one roll.
#[derive(Arbitrary, Debug)]
struct MovementInput {
    /// Track length, folded into 4..=24.
    finish_line: u8,
    /// Square per camel, folded onto the track.
    positions: [u8; 7],
    /// Tiles as (square, oasis?).
    tiles: Vec<(u8, bool)>,
    /// Camel to roll (index into the seven colors).
    camel: u8,
    /// Steps, folded into 1..=3.
    steps: u8,
}

fuzz_target!(|input: MovementInput| {
    let finish = i32::from(input.finish_line % 21) + 4;

    let mut heights = [0u32; 32];
    let camels: Vec<Camel> = COLORS
        .iter()
        .zip(input.positions)
        .map(|(&color, p)| {
            let position = i32::from(p) % finish;
            let slot = &mut heights[position as usize];
            let camel = Camel::new(color, position, *slot);
            *slot += 1;
            camel
        })
        .collect();

    let mut board = Board::new(finish, camels);
    for (owner, (square, oasis)) in (1u8..=8).zip(input.tiles) {
        let position = i32::from(square) % (finish - 1) + 1;
        if board.tile_at(position).is_none() {
            let kind = if oasis { TileKind::Oasis } else { TileKind::Mirage };
            board.place_tile(Tile::new(position, kind, owner));
        }
    }
    assert!(check_board(&board).is_empty());

    let camel = COLORS[usize::from(input.camel) % COLORS.len()];
    let steps = input.steps % 3 + 1;
    let moved = resolve(&board, camel, steps);

    let violations = check_board(&moved.board);
    assert!(violations.is_empty(), "after {camel} {steps}: {violations:?}");
    assert!(moved.group.contains(&camel));
    for c in board.camels() {
        if !moved.group.contains(&c.color) {
            assert_eq!(moved.board.camel(c.color), Some(c));
        }
    }
    assert_eq!(moved, resolve(&board, camel, steps));
});
