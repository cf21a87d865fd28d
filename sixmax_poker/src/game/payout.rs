//! Pot resolution.
//!
//! Side pots are never materialized during betting; each player only
//! accumulates a total contribution. At resolution time the distinct
//! contribution levels define the pot layers, and each layer is split
//! among its best-ranked eligible contenders. Odd chips go one at a time
//! to the tied winners closest to the dealer's left.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entities::{Card, Chips, PlayerId};
use super::eval::HandRank;

/// One payout line of a resolved pot, largest first in the snapshot.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRow {
    pub player_id: PlayerId,
    pub name: String,
    pub amount: Chips,
}

/// A revealed hand at showdown.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowdownHand {
    pub player_id: PlayerId,
    pub name: String,
    pub cards: Vec<Card>,
    pub description: String,
}

/// Snapshot of the most recent showdown, kept for the view projection.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowdownSummary {
    pub board: Vec<Card>,
    pub hands: Vec<ShowdownHand>,
    pub payouts: Vec<PayoutRow>,
}

/// Split the pot implied by `contributions` among `contenders`.
///
/// * `contributions` - every seat's total contribution this hand, folded
///   players included; their chips still fund layers they cannot win.
/// * `contenders` - the seats evaluated at showdown, with their ranks.
/// * `seat_order` - all contributing seats in ring order starting at the
///   seat left of the dealer; this order decides odd-chip remainders.
///
/// Layers with no eligible contender are skipped; that cannot happen in
/// normal play since folding requires a live opponent.
pub fn distribute_pot(
    contributions: &BTreeMap<usize, Chips>,
    contenders: &BTreeMap<usize, HandRank>,
    seat_order: &[usize],
) -> BTreeMap<usize, Chips> {
    let mut payouts: BTreeMap<usize, Chips> = BTreeMap::new();

    let mut levels: Vec<Chips> = contributions
        .values()
        .copied()
        .filter(|&c| c > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut prev_level: Chips = 0;
    for &level in &levels {
        let slice = level - prev_level;
        let funders = contributions.values().filter(|&&c| c >= level).count() as Chips;
        let pot = slice * funders;
        prev_level = level;

        let eligible: Vec<usize> = contenders
            .keys()
            .copied()
            .filter(|seat| contributions.get(seat).copied().unwrap_or(0) >= level)
            .collect();
        if eligible.is_empty() {
            continue;
        }

        let best = eligible
            .iter()
            .map(|seat| &contenders[seat])
            .max()
            .expect("eligible is non-empty");
        let mut winners: Vec<usize> = eligible
            .into_iter()
            .filter(|seat| contenders[seat] == *best)
            .collect();
        winners.sort_by_key(|seat| {
            seat_order
                .iter()
                .position(|s| s == seat)
                .unwrap_or(usize::MAX)
        });

        let share = pot / winners.len() as Chips;
        let remainder = pot % winners.len() as Chips;
        for (i, seat) in winners.iter().enumerate() {
            let extra = if (i as Chips) < remainder { 1 } else { 0 };
            *payouts.entry(*seat).or_default() += share + extra;
        }
    }

    payouts
}
