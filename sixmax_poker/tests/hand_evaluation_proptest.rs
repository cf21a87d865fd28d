//! Evaluator laws: permutation invariance, category ordering on fixed
//! witnesses, and the wheel.

use proptest::prelude::*;
use sixmax_poker::{eval, Card, HandCategory};

fn cards(codes: &[&str]) -> Vec<Card> {
    codes.iter().map(|c| c.parse().unwrap()).collect()
}

/// Strategy: a random 5-7 card subset of the full deck.
fn hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    (5usize..=7).prop_flat_map(|n| {
        Just(sixmax_poker::Deck::build())
            .prop_shuffle()
            .prop_map(move |deck| deck[..n].to_vec())
    })
}

proptest! {
    #[test]
    fn prop_permutation_invariance(hand in hand_strategy()) {
        let baseline = eval::evaluate(&hand).unwrap();
        let mut shuffled = hand.clone();
        shuffled.reverse();
        prop_assert_eq!(eval::evaluate(&shuffled).unwrap(), baseline.clone());
        shuffled.rotate_left(2);
        prop_assert_eq!(eval::evaluate(&shuffled).unwrap(), baseline);
    }

    #[test]
    fn prop_seven_card_hand_at_least_matches_any_five(hand in hand_strategy()) {
        // The best-of-subsets result never ranks below the first five
        // cards alone.
        let five = eval::evaluate(&hand[..5]).unwrap();
        let full = eval::evaluate(&hand).unwrap();
        prop_assert!(full >= five);
    }

    #[test]
    fn prop_tiebreaks_are_valid_ranks(hand in hand_strategy()) {
        let rank = eval::evaluate(&hand).unwrap();
        prop_assert!(!rank.tiebreaks.is_empty());
        for &value in &rank.tiebreaks {
            prop_assert!((2..=14).contains(&value));
        }
    }
}

#[test]
fn test_category_ladder_on_witnesses() {
    // One witness per category, each beating every witness below it.
    let witnesses = [
        (HandCategory::HighCard, cards(&["AS", "KH", "9D", "5C", "2S"])),
        (HandCategory::OnePair, cards(&["2S", "2H", "9D", "5C", "3S"])),
        (HandCategory::TwoPair, cards(&["2S", "2H", "3D", "3C", "4S"])),
        (
            HandCategory::ThreeOfAKind,
            cards(&["2S", "2H", "2D", "5C", "3S"]),
        ),
        (HandCategory::Straight, cards(&["AS", "2H", "3D", "4C", "5S"])),
        (HandCategory::Flush, cards(&["2S", "3S", "4S", "5S", "7S"])),
        (
            HandCategory::FullHouse,
            cards(&["2S", "2H", "2D", "3C", "3S"]),
        ),
        (
            HandCategory::FourOfAKind,
            cards(&["2S", "2H", "2D", "2C", "3S"]),
        ),
        (
            HandCategory::StraightFlush,
            cards(&["AS", "2S", "3S", "4S", "5S"]),
        ),
    ];

    for (category, hand) in &witnesses {
        assert_eq!(eval::evaluate(hand).unwrap().category, *category);
    }
    for weaker in 0..witnesses.len() {
        for stronger in weaker + 1..witnesses.len() {
            let lo = eval::evaluate(&witnesses[weaker].1).unwrap();
            let hi = eval::evaluate(&witnesses[stronger].1).unwrap();
            assert!(
                hi > lo,
                "{:?} should beat {:?}",
                witnesses[stronger].0,
                witnesses[weaker].0
            );
        }
    }
}

#[test]
fn test_wheel_loses_to_six_high_straight() {
    let wheel = eval::evaluate(&cards(&["AS", "2H", "3D", "4C", "5S"])).unwrap();
    assert_eq!(wheel.category, HandCategory::Straight);
    assert_eq!(wheel.tiebreaks, vec![5]);
    let six_high = eval::evaluate(&cards(&["2S", "3H", "4D", "5C", "6S"])).unwrap();
    assert!(wheel < six_high);
}

#[test]
fn test_heads_up_showdown_scenario() {
    // Dealer holds AS KS, the big blind QH QC, on board 2S 7S 9S 2D 3C:
    // the flush beats queens and twos.
    let board = cards(&["2S", "7S", "9S", "2D", "3C"]);
    let mut p1 = cards(&["AS", "KS"]);
    p1.extend_from_slice(&board);
    let mut p2 = cards(&["QH", "QC"]);
    p2.extend_from_slice(&board);

    let r1 = eval::evaluate(&p1).unwrap();
    let r2 = eval::evaluate(&p2).unwrap();
    assert_eq!(r1.category, HandCategory::Flush);
    assert_eq!(eval::describe(&r1), "Flush (Ace high)");
    assert_eq!(r2.category, HandCategory::TwoPair);
    assert_eq!(eval::describe(&r2), "Two Pair (Queens and Twos)");
    assert!(r1 > r2);
}

#[test]
fn test_wheel_vs_seven_high_straight_scenario() {
    // P1 holds A-2, P2 holds 6-2, board 3 4 5 7 K: the five-high
    // straight loses to the seven-high straight.
    let board = cards(&["3S", "4H", "5D", "7C", "KS"]);
    let mut p1 = cards(&["AS", "2H"]);
    p1.extend_from_slice(&board);
    let mut p2 = cards(&["6S", "2D"]);
    p2.extend_from_slice(&board);

    let r1 = eval::evaluate(&p1).unwrap();
    let r2 = eval::evaluate(&p2).unwrap();
    assert_eq!(r1.category, HandCategory::Straight);
    assert_eq!(r1.tiebreaks, vec![5]);
    assert_eq!(r2.category, HandCategory::Straight);
    assert_eq!(r2.tiebreaks, vec![7]);
    assert!(r2 > r1);
}

#[test]
fn test_kicker_decides_between_equal_pairs() {
    let better = eval::evaluate(&cards(&["8S", "8H", "AD", "7C", "2S"])).unwrap();
    let worse = eval::evaluate(&cards(&["8D", "8C", "KD", "7H", "2D"])).unwrap();
    assert!(better > worse);
}

#[test]
fn test_identical_ranks_split() {
    let a = eval::evaluate(&cards(&["8S", "8H", "AD", "7C", "2S"])).unwrap();
    let b = eval::evaluate(&cards(&["8D", "8C", "AH", "7S", "2D"])).unwrap();
    assert_eq!(a, b);
}
