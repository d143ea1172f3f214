//! Movement resolution: one die result applied to the board.
//!
//! A roll moves the rolled camel together with every camel stacked on top of
//! it. The group lands on top of whatever already stands on the destination,
//! keeping its internal order. A desert tile on the landing square pushes the
//! group one more square; the pushed-to square is not checked for another tile.
//!
//! Resolution is a pure function of `(board, camel, steps)`.

use crate::game::{Board, Camel, CamelColor, Tile};

/// Result of resolving one roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Board after the move.
    pub board: Board,
    /// Camel the die was rolled for.
    pub camel: CamelColor,
    /// Steps shown on the die.
    pub steps: u8,
    /// Square the group left.
    pub from: i32,
    /// Square the group ended on (after tile push and clamping).
    pub to: i32,
    /// Moving group, bottom first. Empty if the camel was not on the board.
    pub group: Vec<CamelColor>,
    /// Tile the group landed on, if any.
    pub tile: Option<Tile>,
}

/// Resolve a roll of `steps` for `camel` against `board`.
///
/// An unknown camel is a caller bug: it trips a debug assertion and otherwise
/// leaves the board unchanged.
#[must_use]
pub fn resolve(board: &Board, camel: CamelColor, steps: u8) -> Move {
    debug_assert!(
        board.camel(camel).is_some(),
        "rolled camel {camel} is not on the board"
    );
    let Some(rolled) = board.camel(camel).copied() else {
        return Move {
            board: board.clone(),
            camel,
            steps,
            from: 0,
            to: 0,
            group: Vec::new(),
            tile: None,
        };
    };

    let in_group = |c: &Camel| c.position == rolled.position && c.stack_order >= rolled.stack_order;

    let raw = rolled.position + i32::from(steps) * rolled.direction().sign();
    let tile = board.tile_at(raw).copied();
    let pushed = tile.map_or(raw, |t| raw + t.kind.displacement());
    let to = pushed.clamp(0, board.max_position().max(0));

    let base = board
        .camels()
        .iter()
        .filter(|c| c.position == to && !in_group(c))
        .map(|c| c.stack_order)
        .max()
        .map_or(0, |top| top + 1);

    let camels: Vec<Camel> = board
        .camels()
        .iter()
        .map(|c| {
            if in_group(c) {
                Camel {
                    position: to,
                    stack_order: base + (c.stack_order - rolled.stack_order),
                    ..*c
                }
            } else {
                *c
            }
        })
        .collect();

    let mut group: Vec<&Camel> = board.camels().iter().filter(|c| in_group(c)).collect();
    group.sort_by_key(|c| c.stack_order);

    Move {
        board: board.with_camels(camels),
        camel,
        steps,
        from: rolled.position,
        to,
        group: group.iter().map(|c| c.color).collect(),
        tile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TileKind;

    fn stack_at(board: &Board, position: i32) -> Vec<CamelColor> {
        board.occupants(position).iter().map(|c| c.color).collect()
    }

    #[test]
    fn test_lone_camel_moves() {
        let board = Board::new(16, vec![Camel::new(CamelColor::Red, 3, 0)]);
        let mv = resolve(&board, CamelColor::Red, 2);
        let red = mv.board.camel(CamelColor::Red).unwrap();
        assert_eq!((red.position, red.stack_order), (5, 0));
        assert_eq!((mv.from, mv.to), (3, 5));
        assert_eq!(mv.group, vec![CamelColor::Red]);
        assert_eq!(mv.tile, None);
    }

    #[test]
    fn test_stack_moves_together_in_order() {
        let board = Board::new(
            16,
            vec![
                Camel::new(CamelColor::Red, 3, 0),
                Camel::new(CamelColor::Blue, 3, 1),
                Camel::new(CamelColor::Green, 5, 0),
            ],
        );
        let mv = resolve(&board, CamelColor::Red, 2);
        assert_eq!(
            stack_at(&mv.board, 5),
            vec![CamelColor::Green, CamelColor::Red, CamelColor::Blue]
        );
        assert!(stack_at(&mv.board, 3).is_empty());
    }

    #[test]
    fn test_camels_below_stay_behind() {
        let board = Board::new(
            16,
            vec![
                Camel::new(CamelColor::Red, 3, 0),
                Camel::new(CamelColor::Blue, 3, 1),
                Camel::new(CamelColor::Green, 3, 2),
            ],
        );
        let mv = resolve(&board, CamelColor::Blue, 1);
        assert_eq!(stack_at(&mv.board, 3), vec![CamelColor::Red]);
        assert_eq!(stack_at(&mv.board, 4), vec![CamelColor::Blue, CamelColor::Green]);
        let blue = mv.board.camel(CamelColor::Blue).unwrap();
        assert_eq!(blue.stack_order, 0);
    }

    #[test]
    fn test_oasis_pushes_forward_once() {
        let mut board = Board::new(16, vec![Camel::new(CamelColor::Red, 3, 0)]);
        board.place_tile(Tile::new(5, TileKind::Oasis, 1));
        board.place_tile(Tile::new(6, TileKind::Oasis, 2));
        let mv = resolve(&board, CamelColor::Red, 2);
        assert_eq!(mv.to, 6);
        assert_eq!(mv.tile.map(|t| t.owner), Some(1));
    }

    #[test]
    fn test_mirage_pushes_back() {
        let mut board = Board::new(16, vec![Camel::new(CamelColor::Red, 3, 0)]);
        board.place_tile(Tile::new(6, TileKind::Mirage, 1));
        let mv = resolve(&board, CamelColor::Red, 3);
        assert_eq!(mv.to, 5);
    }

    #[test]
    fn test_mirage_back_onto_own_square_restacks_on_top() {
        let mut board = Board::new(
            16,
            vec![
                Camel::new(CamelColor::Red, 3, 0),
                Camel::new(CamelColor::Blue, 3, 1),
            ],
        );
        board.place_tile(Tile::new(4, TileKind::Mirage, 1));
        let mv = resolve(&board, CamelColor::Blue, 1);
        assert_eq!(mv.to, 3);
        assert_eq!(stack_at(&mv.board, 3), vec![CamelColor::Red, CamelColor::Blue]);
    }

    #[test]
    fn test_reversed_camel_moves_backward_and_carries() {
        let board = Board::new(
            16,
            vec![
                Camel::new(CamelColor::White, 10, 0),
                Camel::new(CamelColor::Red, 10, 1),
            ],
        );
        let mv = resolve(&board, CamelColor::White, 3);
        assert_eq!(mv.to, 7);
        assert_eq!(stack_at(&mv.board, 7), vec![CamelColor::White, CamelColor::Red]);
    }

    #[test]
    fn test_clamps_to_track() {
        let board = Board::new(
            16,
            vec![
                Camel::new(CamelColor::Red, 15, 0),
                Camel::new(CamelColor::White, 1, 0),
            ],
        );
        let forward = resolve(&board, CamelColor::Red, 3);
        assert_eq!(forward.to, 18);
        assert!(forward.board.has_finished());

        let backward = resolve(&board, CamelColor::White, 3);
        assert_eq!(backward.to, 0);
    }

    #[test]
    fn test_upper_clamp() {
        let board = Board::new(4, vec![Camel::new(CamelColor::Red, 6, 0)]);
        let mv = resolve(&board, CamelColor::Red, 3);
        assert_eq!(mv.to, board.max_position());
    }

    #[test]
    fn test_resolve_is_pure() {
        let board = Board::new(
            16,
            vec![
                Camel::new(CamelColor::Red, 2, 0),
                Camel::new(CamelColor::Blue, 2, 1),
            ],
        );
        let before = board.clone();
        let first = resolve(&board, CamelColor::Red, 3);
        let second = resolve(&board, CamelColor::Red, 3);
        assert_eq!(board, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_track_does_not_panic() {
        let board = Board::new(-5, vec![Camel::new(CamelColor::Red, 0, 0)]);
        let mv = resolve(&board, CamelColor::Red, 2);
        assert_eq!(mv.to, 0);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_unknown_camel_leaves_board_unchanged() {
        let board = Board::new(16, vec![Camel::new(CamelColor::Red, 2, 0)]);
        let mv = resolve(&board, CamelColor::Black, 1);
        assert_eq!(mv.board, board);
        assert!(mv.group.is_empty());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "not on the board")]
    fn test_unknown_camel_asserts_in_debug() {
        let board = Board::new(16, vec![Camel::new(CamelColor::Red, 2, 0)]);
        let _ = resolve(&board, CamelColor::Black, 1);
    }
}
