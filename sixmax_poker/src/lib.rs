//! # sixmax_poker
//!
//! An authoritative, server-driven no-limit Texas Hold'em engine for a
//! single six-seat table. Clients are view/input terminals only: the
//! deck order, pot, turn pointer, and chip stacks all live here.
//!
//! ## Architecture
//!
//! - [`game`]: entities, the 5-to-7 card evaluator, side-pot payout,
//!   the betting engine and hand lifecycle, and the strength advisor.
//! - [`table`]: the table actor that serializes every client event and
//!   timer tick through one inbox, plus the wire protocol types.
//!
//! ## Example
//!
//! ```
//! use sixmax_poker::{Table, constants};
//!
//! let table = Table::new(
//!     constants::DEFAULT_STARTING_STACK,
//!     constants::SMALL_BLIND,
//!     constants::BIG_BLIND,
//! );
//! assert!(!table.game_started);
//! ```

pub mod game;
pub use game::{
    advisor::HandInsight,
    constants,
    engine::{AvailableActions, Table, TableError, TableView},
    entities::{self, Card, Chips, Deck, EngineError, HandPhase, Player, PlayerAction, PlayerId},
    eval::{self, HandCategory, HandRank},
    payout::{self, ShowdownSummary},
};

pub mod table;
pub use table::{
    actor::{TableActor, TableHandle},
    messages::{ClientEvent, ServerEvent, TableMessage},
};
