use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::HashSet, fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

use super::constants;

/// Type alias for chip amounts. Stacks are capped at a million chips, so
/// the total money on a six-seat table always fits comfortably.
pub type Chips = u32;

/// Stable per-connection identity, assigned by the transport.
pub type PlayerId = Uuid;

/// Violated engine invariants. These are programmer errors, not client
/// faults; the lifecycle converts them into a table reset.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EngineError {
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("duplicate draw of {0}")]
    DuplicateDraw(Card),
    #[error("corrupt deck: {0}")]
    CorruptDeck(String),
    #[error("evaluator needs 5-7 cards, got {0}")]
    EvalCardCount(usize),
    #[error("blinds could not be assigned")]
    BlindAssignment,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    fn letter(self) -> char {
        match self {
            Self::Spade => 'S',
            Self::Heart => 'H',
            Self::Diamond => 'D',
            Self::Club => 'C',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'S' => Some(Self::Spade),
            'H' => Some(Self::Heart),
            'D' => Some(Self::Diamond),
            'C' => Some(Self::Club),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A card as it appears on the wire: rank character followed by suit
/// character, e.g. `AS` or `TD`. Ranks run 2..=14 with the ace high.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Card {
    pub rank: u8,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: u8, suit: Suit) -> Self {
        debug_assert!((2..=14).contains(&rank));
        Self { rank, suit }
    }

    pub fn rank_char(self) -> char {
        match self.rank {
            14 => 'A',
            13 => 'K',
            12 => 'Q',
            11 => 'J',
            10 => 'T',
            r => (b'0' + r) as char,
        }
    }

    fn rank_from_char(c: char) -> Option<u8> {
        match c {
            'A' => Some(14),
            'K' => Some(13),
            'Q' => Some(12),
            'J' => Some(11),
            'T' => Some(10),
            '2'..='9' => Some(c as u8 - b'0'),
            _ => None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit)
    }
}

impl FromStr for Card {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (rank_char, suit_char) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => (r, su),
            _ => return Err(EngineError::CorruptDeck(format!("bad card code {s:?}"))),
        };
        let rank = Card::rank_from_char(rank_char)
            .ok_or_else(|| EngineError::CorruptDeck(format!("bad rank in {s:?}")))?;
        let suit = Suit::from_letter(suit_char)
            .ok_or_else(|| EngineError::CorruptDeck(format!("bad suit in {s:?}")))?;
        Ok(Card::new(rank, suit))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The 52-card deck plus the bookkeeping that guards it: every card that
/// leaves the deck lands in `seen`, and drawing a card that is already
/// there is an invariant violation.
#[derive(Debug, Default)]
pub struct Deck {
    cards: Vec<Card>,
    seen: HashSet<Card>,
    burned: Vec<Card>,
}

impl Deck {
    /// The full deck in canonical order: ranks low to high, suits per
    /// [`Suit::ALL`]. The top of the deck is the last element.
    pub fn build() -> Vec<Card> {
        let mut cards = Vec::with_capacity(52);
        for rank in 2..=14 {
            for suit in Suit::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        cards
    }

    /// Build and uniformly shuffle a fresh deck, verifying the 52-card
    /// uniqueness invariant first.
    pub fn new_shuffled() -> Result<Self, EngineError> {
        let mut cards = Self::build();
        Self::verify(&cards)?;
        cards.shuffle(&mut rand::rng());
        Ok(Self {
            cards,
            seen: HashSet::with_capacity(52),
            burned: Vec::new(),
        })
    }

    fn verify(cards: &[Card]) -> Result<(), EngineError> {
        if cards.len() != 52 {
            return Err(EngineError::CorruptDeck(format!(
                "{} cards instead of 52",
                cards.len()
            )));
        }
        let distinct: HashSet<_> = cards.iter().collect();
        if distinct.len() != 52 {
            return Err(EngineError::CorruptDeck("duplicate cards".into()));
        }
        for card in cards {
            if !(2..=14).contains(&card.rank) {
                return Err(EngineError::CorruptDeck(format!("bad rank in {card}")));
            }
        }
        Ok(())
    }

    /// Remove and return the top card. `reason` only feeds the debug log.
    pub fn draw(&mut self, reason: &str) -> Result<Card, EngineError> {
        let card = self.cards.pop().ok_or(EngineError::DeckExhausted)?;
        if !self.seen.insert(card) {
            return Err(EngineError::DuplicateDraw(card));
        }
        log::debug!("drew {card} ({reason})");
        Ok(card)
    }

    /// Draw one card face down onto the burn pile.
    pub fn burn(&mut self, reason: &str) -> Result<(), EngineError> {
        let card = self.draw(reason)?;
        self.burned.push(card);
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn burn_count(&self) -> usize {
        self.burned.len()
    }

    pub fn seen(&self) -> &HashSet<Card> {
        &self.seen
    }
}

/// Where the current hand stands.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandPhase {
    Lobby,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl fmt::Display for HandPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

/// A betting decision from the player on turn. Raises are always "raise
/// to": the amount is the total bet the street should stand at.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Raise { to: Chips },
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fold => write!(f, "folds"),
            Self::Check => write!(f, "checks"),
            Self::Call => write!(f, "calls"),
            Self::Raise { to } => write!(f, "raises to {to}"),
        }
    }
}

/// One seat at the table. A player is created on join and persists across
/// hands until cleanup removes them while disconnected.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub is_admin: bool,
    pub disconnected: bool,
    pub in_hand: bool,
    pub folded: bool,
    pub all_in: bool,
    pub acted: bool,
    pub hole_cards: Vec<Card>,
    pub bet_this_round: Chips,
    pub total_contribution: Chips,
}

impl Player {
    pub fn new(id: PlayerId, name: String, chips: Chips) -> Self {
        Self {
            id,
            name,
            chips,
            is_admin: false,
            disconnected: false,
            in_hand: false,
            folded: false,
            all_in: false,
            acted: false,
            hole_cards: Vec::with_capacity(2),
            bet_this_round: 0,
            total_contribution: 0,
        }
    }

    /// In the hand, not folded, not all-in: still has decisions to make.
    pub fn is_actionable(&self) -> bool {
        self.in_hand && !self.folded && !self.all_in
    }

    /// Folding also leaves the hand (`folded` implies not `in_hand`).
    pub fn fold(&mut self) {
        self.folded = true;
        self.in_hand = false;
        self.acted = true;
    }

    /// Move chips from the stack into the current bet, capped at the
    /// stack. Returns the amount actually paid.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.bet_this_round += paid;
        self.total_contribution += paid;
        if self.chips == 0 {
            self.all_in = true;
        }
        paid
    }

    /// Clear all per-hand state.
    pub fn reset_hand_state(&mut self) {
        self.in_hand = false;
        self.folded = false;
        self.all_in = false;
        self.acted = false;
        self.hole_cards.clear();
        self.bet_this_round = 0;
        self.total_contribution = 0;
    }
}

/// One entry in the bounded table log.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
}

impl LogEntry {
    pub fn now(message: String) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            message,
        }
    }
}

/// Trim, collapse internal whitespace, and bounds-check a display name.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let len = name.chars().count();
    if (constants::MIN_NAME_LEN..=constants::MAX_NAME_LEN).contains(&len) {
        Some(name)
    } else {
        None
    }
}
