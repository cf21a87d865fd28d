//! The table actor and its message types.

pub mod actor;
pub mod messages;
