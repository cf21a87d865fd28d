//! 5-to-7 card hand evaluation.
//!
//! A hand is ranked as a category plus an ordered list of tiebreak ranks,
//! compared lexicographically. Six and seven card inputs are scored as the
//! best of their 5-card subsets (21 combinations at most, enumerated
//! directly).

use std::cmp::Ordering;
use std::fmt;

use super::entities::{Card, EngineError};

/// Hand categories in ascending strength. The discriminant order is the
/// comparison order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "High Card",
            Self::OnePair => "One Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
        };
        write!(f, "{repr}")
    }
}

/// A ranked hand: category first, then tiebreak ranks in decreasing order
/// of importance. Missing tiebreak positions compare as zero. Equality is
/// legal and signals a split pot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandRank {
    pub category: HandCategory,
    pub tiebreaks: Vec<u8>,
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category.cmp(&other.category).then_with(|| {
            let len = self.tiebreaks.len().max(other.tiebreaks.len());
            for i in 0..len {
                let a = self.tiebreaks.get(i).copied().unwrap_or(0);
                let b = other.tiebreaks.get(i).copied().unwrap_or(0);
                match a.cmp(&b) {
                    Ordering::Equal => {}
                    ord => return ord,
                }
            }
            Ordering::Equal
        })
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rank the best 5-card hand available in 5, 6, or 7 cards.
pub fn evaluate(cards: &[Card]) -> Result<HandRank, EngineError> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return Err(EngineError::EvalCardCount(n));
    }
    let mut best: Option<HandRank> = None;
    for a in 0..n - 4 {
        for b in a + 1..n - 3 {
            for c in b + 1..n - 2 {
                for d in c + 1..n - 1 {
                    for e in d + 1..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let rank = eval_five(&five);
                        if best.as_ref().is_none_or(|current| rank > *current) {
                            best = Some(rank);
                        }
                    }
                }
            }
        }
    }
    Ok(best.expect("at least one 5-card subset"))
}

/// If the five distinct ranks form a run, the straight's high card. The
/// wheel (A-5-4-3-2) scores high card 5, not 14.
fn straight_high(distinct_desc: &[u8]) -> Option<u8> {
    if distinct_desc.len() != 5 {
        return None;
    }
    let hi = distinct_desc[0];
    let lo = distinct_desc[4];
    if hi - lo == 4 {
        Some(hi)
    } else if distinct_desc == [14, 5, 4, 3, 2] {
        Some(5)
    } else {
        None
    }
}

fn eval_five(cards: &[Card; 5]) -> HandRank {
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);

    let mut counts = [0u8; 15];
    for card in cards {
        counts[card.rank as usize] += 1;
    }

    // (count, rank) groups sorted by count then rank, both descending.
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&r| counts[r as usize] > 0)
        .map(|r| (counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let distinct_desc: Vec<u8> = {
        let mut ranks: Vec<u8> = groups.iter().map(|&(_, r)| r).collect();
        ranks.sort_by(|a, b| b.cmp(a));
        ranks
    };
    let run_high = straight_high(&distinct_desc);

    if flush {
        if let Some(high) = run_high {
            return HandRank {
                category: HandCategory::StraightFlush,
                tiebreaks: vec![high],
            };
        }
    }

    let pattern: Vec<u8> = groups.iter().map(|&(count, _)| count).collect();
    match pattern.as_slice() {
        [4, 1] => HandRank {
            category: HandCategory::FourOfAKind,
            tiebreaks: vec![groups[0].1, groups[1].1],
        },
        [3, 2] => HandRank {
            category: HandCategory::FullHouse,
            tiebreaks: vec![groups[0].1, groups[1].1],
        },
        _ if flush => {
            let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank).collect();
            ranks.sort_by(|a, b| b.cmp(a));
            HandRank {
                category: HandCategory::Flush,
                tiebreaks: ranks,
            }
        }
        _ if run_high.is_some() => HandRank {
            category: HandCategory::Straight,
            tiebreaks: vec![run_high.unwrap()],
        },
        [3, 1, 1] => HandRank {
            category: HandCategory::ThreeOfAKind,
            tiebreaks: vec![groups[0].1, groups[1].1, groups[2].1],
        },
        [2, 2, 1] => HandRank {
            category: HandCategory::TwoPair,
            tiebreaks: vec![groups[0].1, groups[1].1, groups[2].1],
        },
        [2, 1, 1, 1] => HandRank {
            category: HandCategory::OnePair,
            tiebreaks: vec![groups[0].1, groups[1].1, groups[2].1, groups[3].1],
        },
        _ => HandRank {
            category: HandCategory::HighCard,
            tiebreaks: distinct_desc,
        },
    }
}

fn rank_name(rank: u8) -> &'static str {
    match rank {
        2 => "Two",
        3 => "Three",
        4 => "Four",
        5 => "Five",
        6 => "Six",
        7 => "Seven",
        8 => "Eight",
        9 => "Nine",
        10 => "Ten",
        11 => "Jack",
        12 => "Queen",
        13 => "King",
        14 => "Ace",
        _ => "?",
    }
}

fn rank_plural(rank: u8) -> String {
    match rank {
        6 => "Sixes".to_string(),
        r => format!("{}s", rank_name(r)),
    }
}

/// Human description of a ranked hand, e.g. `Flush (Ace high)`.
pub fn describe(rank: &HandRank) -> String {
    let tb = |i: usize| rank.tiebreaks.get(i).copied().unwrap_or(0);
    match rank.category {
        HandCategory::StraightFlush => format!("Straight Flush ({} high)", rank_name(tb(0))),
        HandCategory::FourOfAKind => format!("Four of a Kind ({})", rank_plural(tb(0))),
        HandCategory::FullHouse => format!(
            "Full House ({} over {})",
            rank_plural(tb(0)),
            rank_plural(tb(1))
        ),
        HandCategory::Flush => format!("Flush ({} high)", rank_name(tb(0))),
        HandCategory::Straight => format!("Straight ({} high)", rank_name(tb(0))),
        HandCategory::ThreeOfAKind => format!("Three of a Kind ({})", rank_plural(tb(0))),
        HandCategory::TwoPair => format!(
            "Two Pair ({} and {})",
            rank_plural(tb(0)),
            rank_plural(tb(1))
        ),
        HandCategory::OnePair => format!("One Pair ({})", rank_plural(tb(0))),
        HandCategory::HighCard => format!("High Card ({})", rank_name(tb(0))),
    }
}
