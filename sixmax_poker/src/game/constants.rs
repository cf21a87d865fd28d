//! Table-wide constants.

use std::time::Duration;

use super::entities::Chips;

/// Seats at the table. Ring order is join order.
pub const MAX_SEATS: usize = 6;

/// Stack every player receives on join, unless the admin changes it.
pub const DEFAULT_STARTING_STACK: Chips = 1_000;
pub const MIN_STARTING_STACK: Chips = 50;
pub const MAX_STARTING_STACK: Chips = 1_000_000;

pub const SMALL_BLIND: Chips = 10;
pub const BIG_BLIND: Chips = 20;

/// Display-name bounds after sanitization.
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 20;

/// Bounded table log ring.
pub const LOG_CAPACITY: usize = 40;

/// Pause between a finished hand and the next deal.
pub const NEXT_HAND_DELAY: Duration = Duration::from_secs(5);
