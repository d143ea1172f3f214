//! Leg and race settlement.
//!
//! # Leg settlement
//!
//! Each betting ticket pays its face value if its camel leads the leg, 1 if
//! the camel is second, and costs 1 otherwise. Every pyramid credit pays 1.
//! Partners also earn the best single winning ticket the other holds.
//! Balances are clamped at zero afterwards and all leg holdings are cleared.
//!
//! # Race settlement
//!
//! The winner and loser piles are scored separately, in placement order. The
//! n-th correct card on a pile earns the n-th payout (the last payout repeats
//! once the schedule runs out); each wrong card costs 1.

use serde::Serialize;

use crate::game::{BettingTicket, Board, CamelColor, FinalWagers, Player, PlayerId, WagerKind};

/// What one player earned at a leg settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegPayout {
    /// Player settled.
    pub player: PlayerId,
    /// Net from betting tickets.
    pub tickets: i64,
    /// From pyramid credits.
    pub pyramid: i64,
    /// From the partner's best winning ticket.
    pub partner_bonus: i64,
    /// Sum of the above, before clamping.
    pub total: i64,
    /// Balance after settlement.
    pub balance: u32,
}

/// Outcome of one leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegSettlement {
    /// Leg number, from 1.
    pub leg: u32,
    /// Leading racing camel.
    pub first: Option<CamelColor>,
    /// Runner-up.
    pub second: Option<CamelColor>,
    /// One entry per player, in seating order.
    pub payouts: Vec<LegPayout>,
}

/// What one player earned from final wagers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RacePayout {
    /// Player settled.
    pub player: PlayerId,
    /// Net from the winner pile.
    pub winner_wagers: i64,
    /// Net from the loser pile.
    pub loser_wagers: i64,
    /// Sum of the above, before clamping.
    pub total: i64,
    /// Balance after settlement.
    pub balance: u32,
}

/// Outcome of the race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceSettlement {
    /// Race winner.
    pub winner: CamelColor,
    /// Last-placed racing camel.
    pub loser: CamelColor,
    /// One entry per player, in seating order.
    pub payouts: Vec<RacePayout>,
}

/// Value of one betting ticket given the leg's top two.
#[must_use]
pub fn ticket_payout(
    ticket: BettingTicket,
    first: Option<CamelColor>,
    second: Option<CamelColor>,
) -> i64 {
    if Some(ticket.camel) == first {
        i64::from(ticket.value)
    } else if Some(ticket.camel) == second {
        1
    } else {
        -1
    }
}

/// Payout for the `nth` (0-based) correct final wager on a pile.
#[must_use]
pub fn schedule_value(schedule: &[u32], nth: usize) -> u32 {
    schedule
        .get(nth)
        .or_else(|| schedule.last())
        .copied()
        .unwrap_or(0)
}

/// Settle a leg against the board's current standings.
///
/// Mutates balances and clears tickets, credits, tile flags and partnerships.
pub fn settle_leg(leg: u32, board: &Board, players: &mut [Player]) -> LegSettlement {
    let standings = board.leaderboard();
    let first = standings.first().map(|c| c.color);
    let second = standings.get(1).map(|c| c.color);

    let ticket_totals: Vec<i64> = players
        .iter()
        .map(|p| {
            p.tickets
                .iter()
                .map(|t| ticket_payout(*t, first, second))
                .sum()
        })
        .collect();
    let best_wins: Vec<(PlayerId, i64)> = players
        .iter()
        .map(|p| {
            let best = p
                .tickets
                .iter()
                .map(|t| ticket_payout(*t, first, second))
                .max()
                .unwrap_or(0)
                .max(0);
            (p.id, best)
        })
        .collect();

    let payouts = players
        .iter_mut()
        .zip(ticket_totals)
        .map(|(player, tickets)| {
            let pyramid = i64::from(player.pyramid_credits);
            let partner_bonus = player
                .partner
                .and_then(|partner| best_wins.iter().find(|(id, _)| *id == partner))
                .map_or(0, |(_, best)| *best);
            let total = tickets + pyramid + partner_bonus;

            player.apply_earnings(total);
            player.clear_leg();

            LegPayout {
                player: player.id,
                tickets,
                pyramid,
                partner_bonus,
                total,
                balance: player.money,
            }
        })
        .collect();

    LegSettlement {
        leg,
        first,
        second,
        payouts,
    }
}

/// Net result of one wager pile for every player, in seating order.
fn score_pile(
    wagers: &FinalWagers,
    kind: WagerKind,
    actual: CamelColor,
    schedule: &[u32],
    players: &[Player],
) -> Vec<i64> {
    let mut totals = vec![0i64; players.len()];
    let mut correct = 0usize;
    for wager in wagers.pile(kind) {
        let Some(idx) = players.iter().position(|p| p.id == wager.player) else {
            continue;
        };
        if wager.camel == actual {
            totals[idx] += i64::from(schedule_value(schedule, correct));
            correct += 1;
        } else {
            totals[idx] -= 1;
        }
    }
    totals
}

/// Settle final wagers once the race is decided.
pub fn settle_race(
    winner: CamelColor,
    loser: CamelColor,
    wagers: &FinalWagers,
    schedule: &[u32],
    players: &mut [Player],
) -> RaceSettlement {
    let winner_totals = score_pile(wagers, WagerKind::Winner, winner, schedule, players);
    let loser_totals = score_pile(wagers, WagerKind::Loser, loser, schedule, players);

    let payouts = players
        .iter_mut()
        .zip(winner_totals.into_iter().zip(loser_totals))
        .map(|(player, (winner_wagers, loser_wagers))| {
            let total = winner_wagers + loser_wagers;
            player.apply_earnings(total);
            RacePayout {
                player: player.id,
                winner_wagers,
                loser_wagers,
                total,
                balance: player.money,
            }
        })
        .collect();

    RaceSettlement {
        winner,
        loser,
        payouts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Camel;

    fn ticket(camel: CamelColor, value: u32) -> BettingTicket {
        BettingTicket { camel, value }
    }

    /// Green leads, yellow second, purple last.
    fn standings_board() -> Board {
        Board::new(
            16,
            vec![
                Camel::new(CamelColor::Green, 9, 0),
                Camel::new(CamelColor::Yellow, 8, 1),
                Camel::new(CamelColor::Red, 8, 0),
                Camel::new(CamelColor::Purple, 2, 0),
            ],
        )
    }

    fn players(n: u8) -> Vec<Player> {
        (1..=n)
            .map(|id| Player::new(id, format!("Player {id}"), 3, CamelColor::RACING))
            .collect()
    }

    #[test]
    fn test_ticket_payout_rules() {
        let first = Some(CamelColor::Green);
        let second = Some(CamelColor::Yellow);
        assert_eq!(ticket_payout(ticket(CamelColor::Green, 5), first, second), 5);
        assert_eq!(ticket_payout(ticket(CamelColor::Yellow, 5), first, second), 1);
        assert_eq!(ticket_payout(ticket(CamelColor::Red, 5), first, second), -1);
    }

    #[test]
    fn test_leg_settlement_scenario() {
        let board = standings_board();
        let mut players = players(2);
        players[0].tickets.push(ticket(CamelColor::Green, 5));
        players[0].tickets.push(ticket(CamelColor::Purple, 3));

        let settlement = settle_leg(1, &board, &mut players);
        assert_eq!(settlement.first, Some(CamelColor::Green));
        assert_eq!(settlement.second, Some(CamelColor::Yellow));
        assert_eq!(settlement.payouts[0].tickets, 4);
        assert_eq!(players[0].money, 7);
        assert!(players[0].tickets.is_empty());
        assert_eq!(players[1].money, 3);
    }

    #[test]
    fn test_leg_settlement_pays_pyramid_credits() {
        let board = standings_board();
        let mut players = players(2);
        players[1].pyramid_credits = 3;
        players[1].placed_tile = true;

        let settlement = settle_leg(2, &board, &mut players);
        assert_eq!(settlement.payouts[1].pyramid, 3);
        assert_eq!(players[1].money, 6);
        assert_eq!(players[1].pyramid_credits, 0);
        assert!(!players[1].placed_tile);
    }

    #[test]
    fn test_leg_settlement_clamps_at_zero() {
        let board = standings_board();
        let mut players = players(1);
        for _ in 0..6 {
            players[0].tickets.push(ticket(CamelColor::Red, 2));
        }

        let settlement = settle_leg(1, &board, &mut players);
        assert_eq!(settlement.payouts[0].total, -6);
        assert_eq!(settlement.payouts[0].balance, 0);
        assert_eq!(players[0].money, 0);
    }

    #[test]
    fn test_partner_bonus() {
        let board = standings_board();
        let mut players = players(3);
        players[0].partner = Some(2);
        players[1].partner = Some(1);
        players[0].tickets.push(ticket(CamelColor::Green, 5));
        players[0].tickets.push(ticket(CamelColor::Yellow, 3));
        players[1].tickets.push(ticket(CamelColor::Red, 5));

        let settlement = settle_leg(1, &board, &mut players);
        // Player 2 gets player 1's best ticket (5); player 1 gets nothing back.
        assert_eq!(settlement.payouts[1].partner_bonus, 5);
        assert_eq!(settlement.payouts[0].partner_bonus, 0);
        assert_eq!(players[1].money, 3 - 1 + 5);
        assert_eq!(players[0].money, 3 + 5 + 1);
        assert!(players.iter().all(|p| p.partner.is_none()));
    }

    #[test]
    fn test_schedule_value_clamps_to_last() {
        let schedule = [8, 5, 3, 2, 1];
        assert_eq!(schedule_value(&schedule, 0), 8);
        assert_eq!(schedule_value(&schedule, 4), 1);
        assert_eq!(schedule_value(&schedule, 10), 1);
        assert_eq!(schedule_value(&[], 0), 0);
    }

    #[test]
    fn test_race_settlement() {
        let mut players = players(3);
        let mut wagers = FinalWagers::default();
        wagers.place(WagerKind::Winner, 2, CamelColor::Green);
        wagers.place(WagerKind::Winner, 1, CamelColor::Red);
        wagers.place(WagerKind::Winner, 3, CamelColor::Green);
        wagers.place(WagerKind::Loser, 1, CamelColor::Purple);
        wagers.place(WagerKind::Loser, 3, CamelColor::Yellow);

        let settlement = settle_race(
            CamelColor::Green,
            CamelColor::Purple,
            &wagers,
            &[8, 5, 3, 2, 1],
            &mut players,
        );

        let p1 = settlement.payouts[0];
        assert_eq!((p1.winner_wagers, p1.loser_wagers), (-1, 8));
        let p2 = settlement.payouts[1];
        assert_eq!((p2.winner_wagers, p2.loser_wagers), (8, 0));
        let p3 = settlement.payouts[2];
        assert_eq!((p3.winner_wagers, p3.loser_wagers), (5, -1));

        assert_eq!(players[0].money, 3 + 7);
        assert_eq!(players[1].money, 3 + 8);
        assert_eq!(players[2].money, 3 + 4);
    }

    #[test]
    fn test_race_settlement_clamps_at_zero() {
        let mut players = players(1);
        players[0].money = 0;
        let mut wagers = FinalWagers::default();
        wagers.place(WagerKind::Winner, 1, CamelColor::Red);
        wagers.place(WagerKind::Loser, 1, CamelColor::Blue);

        let settlement = settle_race(
            CamelColor::Green,
            CamelColor::Purple,
            &wagers,
            &[8],
            &mut players,
        );
        assert_eq!(settlement.payouts[0].total, -2);
        assert_eq!(players[0].money, 0);
    }
}
