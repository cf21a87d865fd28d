//! Best-effort strength hint for the acting player.
//!
//! The score is UX metadata only and never feeds back into the rules. It
//! is monotone in the made-hand category, bounded to 1..=100, and reports
//! four-to-a-flush and four-to-a-straight draws.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::entities::{Card, Chips, Suit};
use super::eval::{self, HandCategory};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandInsight {
    pub current_hand: String,
    pub strength_score: u8,
    pub strength_label: String,
    pub draws: Vec<String>,
    pub recommendation: String,
}

/// Banding per score, highest first.
fn label(score: u8) -> &'static str {
    match score {
        90..=100 => "Monster",
        78..=89 => "Very Strong",
        64..=77 => "Strong",
        50..=63 => "Playable",
        36..=49 => "Marginal",
        _ => "Weak",
    }
}

fn recommendation(score: u8, to_call: Chips) -> &'static str {
    if score >= 78 {
        "raise"
    } else if score >= 50 {
        if to_call == 0 { "bet" } else { "call" }
    } else if score >= 36 {
        if to_call == 0 { "check" } else { "call" }
    } else if to_call == 0 {
        "check"
    } else {
        "fold"
    }
}

fn rank_word(rank: u8) -> &'static str {
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

/// Chen-style preflop score over (high, low, suited, gap, pair), scaled
/// to 1..=100.
fn preflop_score(high: Card, low: Card) -> u8 {
    let base: f64 = match high.rank {
        14 => 10.0,
        13 => 8.0,
        12 => 7.0,
        11 => 6.0,
        r => r as f64 / 2.0,
    };
    let mut score = base;
    if high.rank == low.rank {
        score = (base * 2.0).max(5.0);
    } else {
        if high.suit == low.suit {
            score += 2.0;
        }
        let gap = (high.rank - low.rank - 1) as u32;
        score -= match gap {
            0 => 0.0,
            1 => 1.0,
            2 => 2.0,
            3 => 4.0,
            _ => 5.0,
        };
        if gap <= 1 && high.rank < 12 {
            score += 1.0;
        }
    }
    (score * 5.0).round().clamp(1.0, 100.0) as u8
}

fn preflop_hand_name(high: Card, low: Card) -> String {
    if high.rank == low.rank {
        format!("Pocket {}s", rank_word(high.rank))
    } else if high.suit == low.suit {
        format!("{}-{} suited", rank_word(high.rank), rank_word(low.rank))
    } else {
        format!("{}-{} offsuit", rank_word(high.rank), rank_word(low.rank))
    }
}

/// Postflop base score per made-hand category. The per-category bonus
/// from the primary tiebreak is at most 6, which keeps the bands of
/// adjacent categories disjoint.
fn made_hand_score(category: HandCategory, primary: u8) -> u8 {
    let base: u8 = match category {
        HandCategory::HighCard => 10,
        HandCategory::OnePair => 30,
        HandCategory::TwoPair => 44,
        HandCategory::ThreeOfAKind => 56,
        HandCategory::Straight => 66,
        HandCategory::Flush => 74,
        HandCategory::FullHouse => 84,
        HandCategory::FourOfAKind => 92,
        HandCategory::StraightFlush => 99,
    };
    let bonus = (primary as u32 * 6 / 14) as u8;
    (base + bonus).clamp(1, 100)
}

/// Four cards of one suit among the known cards.
fn has_flush_draw(cards: &[Card]) -> bool {
    Suit::ALL
        .iter()
        .any(|&suit| cards.iter().filter(|c| c.suit == suit).count() == 4)
}

/// Scan the five-rank windows for four-to-a-straight; a run of four with
/// both ends open counts as open-ended, anything else as a gutshot.
fn straight_draw(cards: &[Card]) -> Option<&'static str> {
    let ranks: HashSet<u8> = cards.iter().map(|c| c.rank).collect();
    let has = |r: u8| ranks.contains(&r) || (r == 1 && ranks.contains(&14));

    // Open-ended: ranks r..r+3 all present and completable on either
    // side. The low side always completes (the ace plays low under 2-5);
    // the high side rules out J-Q-K-A.
    for run_low in 2..=10u8 {
        if (run_low..run_low + 4).all(|r| has(r)) {
            return Some("Open-ended straight draw");
        }
    }
    // Any five-window holding exactly four distinct ranks is a gutshot
    // (this also catches edge runs like A-2-3-4 and J-Q-K-A).
    for window_low in 1..=10u8 {
        let present = (window_low..window_low + 5).filter(|&r| has(r)).count();
        if present == 4 {
            return Some("Gutshot straight draw");
        }
    }
    None
}

/// Build the insight for a viewer holding `hole` against `community`.
/// Returns `None` unless the viewer holds exactly two cards.
pub fn advise(hole: &[Card], community: &[Card], to_call: Chips) -> Option<HandInsight> {
    if hole.len() != 2 {
        return None;
    }
    let (high, low) = if hole[0].rank >= hole[1].rank {
        (hole[0], hole[1])
    } else {
        (hole[1], hole[0])
    };

    if community.is_empty() {
        let score = preflop_score(high, low);
        return Some(HandInsight {
            current_hand: preflop_hand_name(high, low),
            strength_score: score,
            strength_label: label(score).to_string(),
            draws: Vec::new(),
            recommendation: recommendation(score, to_call).to_string(),
        });
    }

    let known: Vec<Card> = hole.iter().chain(community.iter()).copied().collect();
    let rank = eval::evaluate(&known).ok()?;
    let score = made_hand_score(rank.category, rank.tiebreaks.first().copied().unwrap_or(0));

    let mut draws = Vec::new();
    if rank.category < HandCategory::Flush && has_flush_draw(&known) {
        draws.push("Flush draw".to_string());
    }
    if rank.category < HandCategory::Straight {
        if let Some(draw) = straight_draw(&known) {
            draws.push(draw.to_string());
        }
    }

    Some(HandInsight {
        current_hand: eval::describe(&rank),
        strength_score: score,
        strength_label: label(score).to_string(),
        draws,
        recommendation: recommendation(score, to_call).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn test_no_insight_without_hole_cards() {
        assert!(advise(&[], &[], 0).is_none());
        assert!(advise(&cards(&["AS"]), &[], 0).is_none());
    }

    #[test]
    fn test_pocket_aces_are_a_monster() {
        let insight = advise(&cards(&["AS", "AH"]), &[], 0).unwrap();
        assert_eq!(insight.current_hand, "Pocket Aces");
        assert_eq!(insight.strength_score, 100);
        assert_eq!(insight.strength_label, "Monster");
    }

    #[test]
    fn test_seven_deuce_is_weak() {
        let insight = advise(&cards(&["7S", "2H"]), &[], 20).unwrap();
        assert!(insight.strength_score < 36, "{}", insight.strength_score);
        assert_eq!(insight.strength_label, "Weak");
        assert_eq!(insight.recommendation, "fold");
    }

    #[test]
    fn test_suited_beats_offsuit_preflop() {
        let suited = advise(&cards(&["AS", "KS"]), &[], 0).unwrap();
        let offsuit = advise(&cards(&["AS", "KH"]), &[], 0).unwrap();
        assert!(suited.strength_score > offsuit.strength_score);
        assert_eq!(suited.current_hand, "Ace-King suited");
        assert_eq!(offsuit.current_hand, "Ace-King offsuit");
    }

    #[test]
    fn test_score_monotone_in_made_hand_category() {
        let witnesses: Vec<(HandCategory, u8)> = vec![
            (HandCategory::HighCard, 14),
            (HandCategory::OnePair, 14),
            (HandCategory::TwoPair, 14),
            (HandCategory::ThreeOfAKind, 14),
            (HandCategory::Straight, 14),
            (HandCategory::Flush, 14),
            (HandCategory::FullHouse, 14),
            (HandCategory::FourOfAKind, 14),
            (HandCategory::StraightFlush, 9),
        ];
        for pair in witnesses.windows(2) {
            let weaker = made_hand_score(pair[0].0, pair[0].1);
            let stronger = made_hand_score(pair[1].0, 2);
            assert!(
                stronger > weaker,
                "{:?} ({weaker}) should score below {:?} ({stronger})",
                pair[0].0,
                pair[1].0,
            );
        }
    }

    #[test]
    fn test_flush_draw_detected() {
        let insight = advise(&cards(&["AS", "KS"]), &cards(&["2S", "7S", "9H"]), 0).unwrap();
        assert!(insight.draws.iter().any(|d| d == "Flush draw"));
    }

    #[test]
    fn test_open_ended_straight_draw() {
        let insight = advise(&cards(&["8S", "7H"]), &cards(&["6D", "5C", "KS"]), 0).unwrap();
        assert!(
            insight
                .draws
                .iter()
                .any(|d| d == "Open-ended straight draw"),
            "{:?}",
            insight.draws
        );
    }

    #[test]
    fn test_gutshot_straight_draw() {
        let insight = advise(&cards(&["9S", "8H"]), &cards(&["6D", "5C", "KS"]), 0).unwrap();
        assert!(
            insight.draws.iter().any(|d| d == "Gutshot straight draw"),
            "{:?}",
            insight.draws
        );
    }

    #[test]
    fn test_made_flush_reports_no_flush_draw() {
        let insight =
            advise(&cards(&["AS", "KS"]), &cards(&["2S", "7S", "9S", "2D"]), 0).unwrap();
        assert_eq!(insight.current_hand, "Flush (Ace high)");
        assert!(insight.draws.is_empty());
        assert_eq!(insight.strength_label, "Very Strong");
    }

    #[test]
    fn test_score_bounds() {
        let insight = advise(&cards(&["2S", "7H"]), &cards(&["9D", "JC", "KS"]), 0).unwrap();
        assert!((1..=100).contains(&insight.strength_score));
    }
}
