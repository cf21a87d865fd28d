//! The table engine.
//!
//! A single [`Table`] owns every player record, the deck, and the pot.
//! All mutation goes through the handful of event entry points (`join`,
//! `set_starting_stack`, `start_game`, `take_action`, `disconnect`,
//! `start_next_hand`); the table actor serializes calls to them. Client
//! mistakes surface as [`TableError`]; violated engine invariants abort
//! the hand and reset the table to the lobby.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;

use super::{
    advisor::{self, HandInsight},
    constants,
    entities::{
        sanitize_name, Card, Chips, Deck, EngineError, HandPhase, LogEntry, Player, PlayerAction,
        PlayerId,
    },
    eval,
    payout::{self, PayoutRow, ShowdownHand, ShowdownSummary},
};

/// Client-protocol errors. Each is reported back to the offending socket
/// as a single `errorMessage`; table state is unchanged.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    #[error("you already joined the table")]
    AlreadyJoined,
    #[error("game already started")]
    GameAlreadyStarted,
    #[error("name must be {min} to {max} characters", min = constants::MIN_NAME_LEN, max = constants::MAX_NAME_LEN)]
    InvalidName,
    #[error("table is full")]
    TableFull,
    #[error("only the admin can do that")]
    NotAdmin,
    #[error("starting stack must be between {min} and {max}", min = constants::MIN_STARTING_STACK, max = constants::MAX_STARTING_STACK)]
    InvalidStartingStack,
    #[error("need at least 2 connected players")]
    NotEnoughPlayers,
    #[error("you are not seated at the table")]
    NotSeated,
    #[error("no hand in progress")]
    NoHandInProgress,
    #[error("not your turn")]
    OutOfTurn,
    #[error("you cannot act right now")]
    NotActionable,
    #[error("cannot check facing a bet")]
    CheckNotAllowed,
    #[error("nothing to call")]
    NothingToCall,
    #[error("raise must exceed the current bet")]
    RaiseNotAboveBet,
    #[error("cannot raise above {max}")]
    RaiseAboveMax { max: Chips },
    #[error("raise must be to at least {min} unless all-in")]
    RaiseBelowMin { min: Chips },
    #[error("action not reopened; you can only call or fold")]
    ActionNotReopened,
    #[error("raise requires an amount")]
    RaiseAmountMissing,
}

/// Per-viewer legal-action summary, sent with every state projection.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableActions {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    pub can_raise: bool,
    pub call_amount: Chips,
    pub min_raise_to: Chips,
    pub max_raise_to: Chips,
}

/// Public view of one seat. Hole cards never appear here; a viewer's own
/// cards travel in `yourCards`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub is_admin: bool,
    pub in_hand: bool,
    pub folded: bool,
    pub all_in: bool,
    pub bet_this_round: Chips,
    pub has_cards: bool,
}

/// The full per-viewer state projection.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub joined: bool,
    pub you_id: PlayerId,
    pub game_started: bool,
    pub hand_in_progress: bool,
    pub hand_number: u64,
    pub phase: HandPhase,
    pub starting_stack: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub pot: Chips,
    pub current_bet: Chips,
    pub dealer_id: Option<PlayerId>,
    pub small_blind_id: Option<PlayerId>,
    pub big_blind_id: Option<PlayerId>,
    pub current_turn_id: Option<PlayerId>,
    pub community_cards: Vec<Card>,
    pub your_cards: Vec<Card>,
    pub hand_insight: Option<HandInsight>,
    pub available_actions: AvailableActions,
    pub can_act: bool,
    pub deck_remaining: usize,
    pub burn_count: usize,
    pub players: Vec<SeatView>,
    pub logs: Vec<LogEntry>,
    pub last_showdown: Option<ShowdownSummary>,
}

/// The single authoritative table. Seat order is join order and doubles
/// as the ring order.
#[derive(Debug)]
pub struct Table {
    pub starting_stack: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub seats: Vec<Player>,
    pub phase: HandPhase,
    pub game_started: bool,
    pub hand_in_progress: bool,
    pub hand_number: u64,
    pub deck: Deck,
    pub community: Vec<Card>,
    pub pot: Chips,
    pub current_bet: Chips,
    pub last_raise_size: Chips,
    pub current_turn: Option<PlayerId>,
    pub dealer_id: Option<PlayerId>,
    pub small_blind_id: Option<PlayerId>,
    pub big_blind_id: Option<PlayerId>,
    pub last_showdown: Option<ShowdownSummary>,
    pub logs: VecDeque<LogEntry>,
    schedule_next_hand: bool,
}

impl Table {
    pub fn new(starting_stack: Chips, small_blind: Chips, big_blind: Chips) -> Self {
        Self {
            starting_stack,
            small_blind,
            big_blind,
            seats: Vec::with_capacity(constants::MAX_SEATS),
            phase: HandPhase::Lobby,
            game_started: false,
            hand_in_progress: false,
            hand_number: 0,
            deck: Deck::default(),
            community: Vec::with_capacity(5),
            pot: 0,
            current_bet: 0,
            last_raise_size: big_blind,
            current_turn: None,
            dealer_id: None,
            small_blind_id: None,
            big_blind_id: None,
            last_showdown: None,
            logs: VecDeque::with_capacity(constants::LOG_CAPACITY),
            schedule_next_hand: false,
        }
    }

    /// True once per finished hand that left enough players for another;
    /// the actor consumes this to arm the next-hand timer.
    pub fn take_schedule_flag(&mut self) -> bool {
        std::mem::take(&mut self.schedule_next_hand)
    }

    fn push_log(&mut self, message: String) {
        info!("table: {message}");
        if self.logs.len() == constants::LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry::now(message));
    }

    pub fn seat_index(&self, id: PlayerId) -> Option<usize> {
        self.seats.iter().position(|p| p.id == id)
    }

    /// Next seat after `from` in ring order satisfying `pred`, wrapping.
    /// `from` itself is only reconsidered after a full lap.
    fn next_seat_where<F>(&self, from: usize, pred: F) -> Option<usize>
    where
        F: Fn(&Player) -> bool,
    {
        let len = self.seats.len();
        (1..=len)
            .map(|step| (from + step) % len)
            .find(|&i| pred(&self.seats[i]))
    }

    fn next_actionable_after(&self, from: usize) -> Option<usize> {
        self.next_seat_where(from, Player::is_actionable)
    }

    fn actionable_count(&self) -> usize {
        self.seats.iter().filter(|p| p.is_actionable()).count()
    }

    fn contender_count(&self) -> usize {
        self.seats.iter().filter(|p| p.in_hand).count()
    }

    fn is_eligible(player: &Player) -> bool {
        !player.disconnected && player.chips > 0
    }

    fn dealer_seat(&self) -> Option<usize> {
        self.dealer_id.and_then(|id| self.seat_index(id))
    }

    /// The first connected player holds the admin role.
    fn ensure_admin(&mut self) {
        if self
            .seats
            .iter()
            .any(|p| p.is_admin && !p.disconnected)
        {
            return;
        }
        for p in &mut self.seats {
            p.is_admin = false;
        }
        if let Some(seat) = self.seats.iter().position(|p| !p.disconnected) {
            self.seats[seat].is_admin = true;
            let name = self.seats[seat].name.clone();
            self.push_log(format!("{name} is now the admin"));
        }
    }

    fn remove_disconnected(&mut self) {
        let gone: Vec<String> = self
            .seats
            .iter()
            .filter(|p| p.disconnected)
            .map(|p| p.name.clone())
            .collect();
        self.seats.retain(|p| !p.disconnected);
        for name in gone {
            self.push_log(format!("{name} left the table"));
        }
    }

    // ---- lobby events -----------------------------------------------------

    pub fn join(&mut self, id: PlayerId, raw_name: &str) -> Result<(), TableError> {
        if self.seat_index(id).is_some() {
            return Err(TableError::AlreadyJoined);
        }
        if self.game_started {
            return Err(TableError::GameAlreadyStarted);
        }
        let name = sanitize_name(raw_name).ok_or(TableError::InvalidName)?;
        if self.seats.len() >= constants::MAX_SEATS {
            return Err(TableError::TableFull);
        }
        self.seats.push(Player::new(id, name.clone(), self.starting_stack));
        self.ensure_admin();
        self.push_log(format!("{name} joined the table"));
        Ok(())
    }

    pub fn set_starting_stack(&mut self, id: PlayerId, amount: Chips) -> Result<(), TableError> {
        let seat = self.seat_index(id).ok_or(TableError::NotSeated)?;
        if !self.seats[seat].is_admin {
            return Err(TableError::NotAdmin);
        }
        if self.game_started {
            return Err(TableError::GameAlreadyStarted);
        }
        if !(constants::MIN_STARTING_STACK..=constants::MAX_STARTING_STACK).contains(&amount) {
            return Err(TableError::InvalidStartingStack);
        }
        self.starting_stack = amount;
        for p in &mut self.seats {
            p.chips = amount;
        }
        self.push_log(format!("Starting stack set to {amount}"));
        Ok(())
    }

    pub fn start_game(&mut self, id: PlayerId) -> Result<(), TableError> {
        let seat = self.seat_index(id).ok_or(TableError::NotSeated)?;
        if !self.seats[seat].is_admin {
            return Err(TableError::NotAdmin);
        }
        if self.game_started {
            return Err(TableError::GameAlreadyStarted);
        }
        if self.seats.iter().filter(|p| !p.disconnected).count() < 2 {
            return Err(TableError::NotEnoughPlayers);
        }
        self.game_started = true;
        self.push_log("Game started".to_string());
        if let Err(err) = self.start_hand() {
            self.abort_hand(&err);
        }
        Ok(())
    }

    /// Timer callback between hands. Guards make it idempotent: a stale
    /// timer firing after the game ended is a no-op.
    pub fn start_next_hand(&mut self) {
        if !self.game_started || self.hand_in_progress {
            return;
        }
        if let Err(err) = self.start_hand() {
            self.abort_hand(&err);
        }
    }

    // ---- hand lifecycle ---------------------------------------------------

    fn start_hand(&mut self) -> Result<(), EngineError> {
        self.remove_disconnected();
        self.ensure_admin();
        self.last_showdown = None;
        self.community.clear();
        self.current_turn = None;

        let eligible: Vec<usize> = (0..self.seats.len())
            .filter(|&i| Self::is_eligible(&self.seats[i]))
            .collect();
        if eligible.len() < 2 {
            self.hand_in_progress = false;
            self.phase = HandPhase::Lobby;
            if self.game_started {
                if let [sole] = eligible[..] {
                    let name = self.seats[sole].name.clone();
                    let chips = self.seats[sole].chips;
                    self.push_log(format!("{name} wins the game with {chips} chips"));
                }
                self.game_started = false;
                self.push_log("Returning to lobby".to_string());
            }
            return Ok(());
        }

        self.deck = Deck::new_shuffled()?;
        self.pot = 0;
        self.current_bet = 0;
        self.last_raise_size = self.big_blind;
        for p in &mut self.seats {
            p.reset_hand_state();
        }
        for &i in &eligible {
            self.seats[i].in_hand = true;
        }

        self.hand_number += 1;
        self.hand_in_progress = true;
        self.phase = HandPhase::Preflop;

        // Button and blinds. Heads-up: the dealer posts the small blind.
        let dealer_seat = match self.dealer_seat() {
            Some(prev) => self
                .next_seat_where(prev, |p| p.in_hand)
                .ok_or(EngineError::BlindAssignment)?,
            None => eligible[0],
        };
        let (sb_seat, bb_seat) = if eligible.len() == 2 {
            let other = self
                .next_seat_where(dealer_seat, |p| p.in_hand)
                .ok_or(EngineError::BlindAssignment)?;
            (dealer_seat, other)
        } else {
            let sb = self
                .next_seat_where(dealer_seat, |p| p.in_hand)
                .ok_or(EngineError::BlindAssignment)?;
            let bb = self
                .next_seat_where(sb, |p| p.in_hand)
                .ok_or(EngineError::BlindAssignment)?;
            (sb, bb)
        };
        self.dealer_id = Some(self.seats[dealer_seat].id);
        self.small_blind_id = Some(self.seats[sb_seat].id);
        self.big_blind_id = Some(self.seats[bb_seat].id);

        let hand_number = self.hand_number;
        let dealer_name = self.seats[dealer_seat].name.clone();
        let (sb, bb) = (self.small_blind, self.big_blind);
        self.push_log(format!(
            "Hand #{hand_number}: dealer {dealer_name}, blinds {sb}/{bb}"
        ));

        // Two rounds of hole cards, one at a time, starting left of the
        // dealer.
        let order: Vec<usize> = {
            let len = self.seats.len();
            (1..=len)
                .map(|step| (dealer_seat + step) % len)
                .filter(|&i| self.seats[i].in_hand)
                .collect()
        };
        for _ in 0..2 {
            for &i in &order {
                let card = self.deck.draw("hole card")?;
                self.seats[i].hole_cards.push(card);
            }
        }

        // Forced blinds, capped by stack. A short blind goes all-in but
        // the table bet still stands at the full big blind.
        let sb_paid = self.seats[sb_seat].commit(self.small_blind);
        self.pot += sb_paid;
        let sb_name = self.seats[sb_seat].name.clone();
        if self.seats[sb_seat].all_in {
            self.push_log(format!("{sb_name} posts small blind {sb_paid} and is all-in"));
        } else {
            self.push_log(format!("{sb_name} posts small blind {sb_paid}"));
        }
        let bb_paid = self.seats[bb_seat].commit(self.big_blind);
        self.pot += bb_paid;
        let bb_name = self.seats[bb_seat].name.clone();
        if self.seats[bb_seat].all_in {
            self.push_log(format!("{bb_name} posts big blind {bb_paid} and is all-in"));
        } else {
            self.push_log(format!("{bb_name} posts big blind {bb_paid}"));
        }
        self.current_bet = self.big_blind.max(sb_paid).max(bb_paid);
        self.last_raise_size = self.big_blind;

        for p in &mut self.seats {
            p.acted = !p.is_actionable();
        }

        self.current_turn = self
            .next_actionable_after(bb_seat)
            .map(|i| self.seats[i].id);
        if self.current_turn.is_none() {
            // Everyone is all-in from the blinds.
            return self.advance_street();
        }
        Ok(())
    }

    /// Deal the next street, or run out the board when nobody can act.
    fn advance_street(&mut self) -> Result<(), EngineError> {
        loop {
            match self.phase {
                HandPhase::Preflop => {
                    self.deck.burn("before flop")?;
                    for _ in 0..3 {
                        let card = self.deck.draw("flop")?;
                        self.community.push(card);
                    }
                    self.phase = HandPhase::Flop;
                    let board = self.board_string();
                    self.push_log(format!("Flop: {board}"));
                }
                HandPhase::Flop => {
                    self.deck.burn("before turn")?;
                    let card = self.deck.draw("turn")?;
                    self.community.push(card);
                    self.phase = HandPhase::Turn;
                    self.push_log(format!("Turn: {card}"));
                }
                HandPhase::Turn => {
                    self.deck.burn("before river")?;
                    let card = self.deck.draw("river")?;
                    self.community.push(card);
                    self.phase = HandPhase::River;
                    self.push_log(format!("River: {card}"));
                }
                HandPhase::River => return self.showdown(),
                HandPhase::Lobby | HandPhase::Showdown => return Ok(()),
            }

            self.current_bet = 0;
            self.last_raise_size = self.big_blind;
            for p in &mut self.seats {
                p.bet_this_round = 0;
                p.acted = !p.is_actionable();
            }

            if self.actionable_count() > 0 {
                let dealer_seat = self.dealer_seat().unwrap_or(0);
                self.current_turn = self
                    .next_actionable_after(dealer_seat)
                    .map(|i| self.seats[i].id);
                return Ok(());
            }
            // Fast-forward: nobody can act, keep dealing.
            self.current_turn = None;
        }
    }

    fn board_string(&self) -> String {
        self.community
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn showdown(&mut self) -> Result<(), EngineError> {
        self.phase = HandPhase::Showdown;
        self.current_turn = None;

        let contributions: BTreeMap<usize, Chips> = self
            .seats
            .iter()
            .enumerate()
            .filter(|(_, p)| p.total_contribution > 0)
            .map(|(i, p)| (i, p.total_contribution))
            .collect();

        let mut contenders: BTreeMap<usize, eval::HandRank> = BTreeMap::new();
        let mut hands: Vec<ShowdownHand> = Vec::new();
        for (i, p) in self.seats.iter().enumerate() {
            if !p.in_hand {
                continue;
            }
            let mut cards = p.hole_cards.clone();
            cards.extend_from_slice(&self.community);
            let rank = eval::evaluate(&cards)?;
            hands.push(ShowdownHand {
                player_id: p.id,
                name: p.name.clone(),
                cards: p.hole_cards.clone(),
                description: eval::describe(&rank),
            });
            contenders.insert(i, rank);
        }
        for hand in &hands {
            let cards = hand
                .cards
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            self.push_log(format!("{} shows {cards}: {}", hand.name, hand.description));
        }

        let dealer_seat = self.dealer_seat().unwrap_or(0);
        let seat_order: Vec<usize> = {
            let len = self.seats.len();
            (1..=len).map(|step| (dealer_seat + step) % len).collect()
        };
        let payouts = payout::distribute_pot(&contributions, &contenders, &seat_order);

        let mut rows: Vec<PayoutRow> = payouts
            .iter()
            .map(|(&seat, &amount)| PayoutRow {
                player_id: self.seats[seat].id,
                name: self.seats[seat].name.clone(),
                amount,
            })
            .collect();
        rows.sort_by(|a, b| b.amount.cmp(&a.amount));

        for (&seat, &amount) in &payouts {
            self.seats[seat].chips += amount;
            let name = self.seats[seat].name.clone();
            self.push_log(format!("{name} wins {amount}"));
        }

        self.last_showdown = Some(ShowdownSummary {
            board: self.community.clone(),
            hands,
            payouts: rows,
        });

        self.finish_hand();
        Ok(())
    }

    /// Everyone else folded: the last contender takes the pot unseen.
    fn resolve_fold_out(&mut self) {
        if let Some(seat) = self.seats.iter().position(|p| p.in_hand) {
            let amount = self.pot;
            self.seats[seat].chips += amount;
            let name = self.seats[seat].name.clone();
            self.push_log(format!("{name} wins {amount}"));
        }
        self.finish_hand();
    }

    fn finish_hand(&mut self) {
        for p in &mut self.seats {
            p.reset_hand_state();
        }
        self.pot = 0;
        self.current_bet = 0;
        self.current_turn = None;
        self.hand_in_progress = false;
        self.phase = HandPhase::Showdown;

        let eligible: Vec<usize> = (0..self.seats.len())
            .filter(|&i| Self::is_eligible(&self.seats[i]))
            .collect();
        if eligible.len() >= 2 {
            self.schedule_next_hand = true;
        } else {
            if let [sole] = eligible[..] {
                let name = self.seats[sole].name.clone();
                let chips = self.seats[sole].chips;
                self.push_log(format!("{name} wins the game with {chips} chips"));
            }
            self.game_started = false;
            self.phase = HandPhase::Lobby;
            self.remove_disconnected();
            self.ensure_admin();
            self.push_log("Returning to lobby".to_string());
        }
    }

    /// Invariant violation: refund the hand's contributions and reset to
    /// the lobby, keeping the process alive.
    fn abort_hand(&mut self, err: &EngineError) {
        error!("invariant violated, aborting hand: {err}");
        for p in &mut self.seats {
            p.chips += p.total_contribution;
            p.reset_hand_state();
        }
        self.pot = 0;
        self.current_bet = 0;
        self.current_turn = None;
        self.community.clear();
        self.hand_in_progress = false;
        self.game_started = false;
        self.phase = HandPhase::Lobby;
        self.push_log("Hand aborted: internal error, returning to lobby".to_string());
    }

    // ---- betting ----------------------------------------------------------

    pub fn take_action(&mut self, id: PlayerId, action: PlayerAction) -> Result<(), TableError> {
        if !self.game_started || !self.hand_in_progress {
            return Err(TableError::NoHandInProgress);
        }
        let seat = self.seat_index(id).ok_or(TableError::NotSeated)?;
        if self.current_turn != Some(id) {
            return Err(TableError::OutOfTurn);
        }
        if !self.seats[seat].is_actionable() {
            return Err(TableError::NotActionable);
        }

        let player = &self.seats[seat];
        let to_call = self.current_bet.saturating_sub(player.bet_this_round);
        match action {
            PlayerAction::Fold => {}
            PlayerAction::Check => {
                if to_call != 0 {
                    return Err(TableError::CheckNotAllowed);
                }
            }
            PlayerAction::Call => {
                if to_call == 0 {
                    return Err(TableError::NothingToCall);
                }
            }
            PlayerAction::Raise { to } => {
                let max_total = player.bet_this_round + player.chips;
                let min_raise_to = if self.current_bet == 0 {
                    self.big_blind
                } else {
                    self.current_bet + self.last_raise_size
                };
                let rights_open = !player.acted || to_call == 0;
                if !rights_open {
                    return Err(TableError::ActionNotReopened);
                }
                if to <= self.current_bet {
                    return Err(TableError::RaiseNotAboveBet);
                }
                if to > max_total {
                    return Err(TableError::RaiseAboveMax { max: max_total });
                }
                if to < min_raise_to && to != max_total {
                    return Err(TableError::RaiseBelowMin { min: min_raise_to });
                }
            }
        }

        if let Err(err) = self.apply_action(seat, action, to_call) {
            self.abort_hand(&err);
        }
        Ok(())
    }

    /// Mutate for an already-validated action, then move the hand along.
    fn apply_action(
        &mut self,
        seat: usize,
        action: PlayerAction,
        to_call: Chips,
    ) -> Result<(), EngineError> {
        let name = self.seats[seat].name.clone();
        match action {
            PlayerAction::Fold => {
                self.seats[seat].fold();
                self.push_log(format!("{name} folds"));
            }
            PlayerAction::Check => {
                self.seats[seat].acted = true;
                self.push_log(format!("{name} checks"));
            }
            PlayerAction::Call => {
                let paid = self.seats[seat].commit(to_call);
                self.pot += paid;
                self.seats[seat].acted = true;
                if self.seats[seat].all_in {
                    self.push_log(format!("{name} calls {paid} and is all-in"));
                } else {
                    self.push_log(format!("{name} calls {paid}"));
                }
            }
            PlayerAction::Raise { to } => {
                let increment = to - self.current_bet;
                let pay = to - self.seats[seat].bet_this_round;
                let paid = self.seats[seat].commit(pay);
                self.pot += paid;
                self.seats[seat].acted = true;
                // A full raise moves the minimum re-raise increment and
                // reopens action for everyone else still able to act.
                // An all-in under-raise does neither: seats that already
                // acted at the old level keep their rights closed.
                if increment >= self.last_raise_size {
                    self.last_raise_size = increment;
                    for (i, p) in self.seats.iter_mut().enumerate() {
                        if i != seat && p.is_actionable() {
                            p.acted = false;
                        }
                    }
                }
                self.current_bet = to;
                if self.seats[seat].all_in {
                    self.push_log(format!("{name} raises to {to} and is all-in"));
                } else {
                    self.push_log(format!("{name} raises to {to}"));
                }
            }
        }
        self.advance_after_action(seat)
    }

    /// Round-completion check: every actionable player has acted and
    /// matched the table bet.
    fn betting_round_complete(&self) -> bool {
        self.seats
            .iter()
            .filter(|p| p.is_actionable())
            .all(|p| p.acted && p.bet_this_round == self.current_bet)
    }

    fn advance_after_action(&mut self, last_seat: usize) -> Result<(), EngineError> {
        if self.contender_count() == 1 {
            self.resolve_fold_out();
            return Ok(());
        }
        if self.betting_round_complete() {
            return self.advance_street();
        }
        self.current_turn = self
            .next_actionable_after(last_seat)
            .map(|i| self.seats[i].id);
        Ok(())
    }

    // ---- disconnects ------------------------------------------------------

    /// Transport-driven. Mid-hand an actionable player is force-folded;
    /// an all-in player keeps their claim on the pot. Seats are removed
    /// only between hands.
    pub fn disconnect(&mut self, id: PlayerId) {
        let Some(seat) = self.seat_index(id) else {
            return;
        };
        self.seats[seat].disconnected = true;
        let name = self.seats[seat].name.clone();
        self.push_log(format!("{name} disconnected"));

        if !self.hand_in_progress {
            self.remove_disconnected();
            self.ensure_admin();
            return;
        }

        if self.seats[seat].is_actionable() {
            let was_turn = self.current_turn == Some(id);
            self.seats[seat].fold();
            self.push_log(format!("{name} folds (disconnected)"));
            if self.contender_count() == 1 {
                self.resolve_fold_out();
            } else if was_turn {
                if let Err(err) = self.advance_after_action(seat) {
                    self.abort_hand(&err);
                }
            }
        }
    }

    // ---- view projection --------------------------------------------------

    pub fn project(&self, viewer: PlayerId) -> TableView {
        let me = self.seat_index(viewer).map(|i| &self.seats[i]);

        let your_cards = me
            .filter(|p| p.in_hand)
            .map(|p| p.hole_cards.clone())
            .unwrap_or_default();

        let can_act = self.hand_in_progress
            && self.current_turn == Some(viewer)
            && me.is_some_and(Player::is_actionable);

        let available_actions = if can_act {
            let p = me.expect("can_act implies seated");
            let to_call = self.current_bet.saturating_sub(p.bet_this_round);
            let max_total = p.bet_this_round + p.chips;
            let min_raise_to = if self.current_bet == 0 {
                self.big_blind
            } else {
                self.current_bet + self.last_raise_size
            };
            let rights_open = !p.acted || to_call == 0;
            AvailableActions {
                can_fold: true,
                can_check: to_call == 0,
                can_call: to_call > 0,
                can_raise: rights_open && max_total > self.current_bet,
                call_amount: to_call.min(p.chips),
                min_raise_to: min_raise_to.min(max_total),
                max_raise_to: max_total,
            }
        } else {
            AvailableActions::default()
        };

        let hand_insight = if self.hand_in_progress {
            me.filter(|p| p.in_hand).and_then(|p| {
                let to_call = self.current_bet.saturating_sub(p.bet_this_round);
                advisor::advise(&p.hole_cards, &self.community, to_call)
            })
        } else {
            None
        };

        TableView {
            joined: me.is_some(),
            you_id: viewer,
            game_started: self.game_started,
            hand_in_progress: self.hand_in_progress,
            hand_number: self.hand_number,
            phase: self.phase,
            starting_stack: self.starting_stack,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            pot: self.pot,
            current_bet: self.current_bet,
            dealer_id: self.dealer_id,
            small_blind_id: self.small_blind_id,
            big_blind_id: self.big_blind_id,
            current_turn_id: self.current_turn,
            community_cards: self.community.clone(),
            your_cards,
            hand_insight,
            available_actions,
            can_act,
            deck_remaining: self.deck.remaining(),
            burn_count: self.deck.burn_count(),
            players: self
                .seats
                .iter()
                .filter(|p| !p.disconnected)
                .map(|p| SeatView {
                    id: p.id,
                    name: p.name.clone(),
                    chips: p.chips,
                    is_admin: p.is_admin,
                    in_hand: p.in_hand,
                    folded: p.folded,
                    all_in: p.all_in,
                    bet_this_round: p.bet_this_round,
                    has_cards: !p.hole_cards.is_empty(),
                })
                .collect(),
            logs: self.logs.iter().cloned().collect(),
            last_showdown: self.last_showdown.clone(),
        }
    }
}
