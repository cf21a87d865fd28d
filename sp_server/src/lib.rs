//! Server-side plumbing for the single-table hold'em server: validated
//! configuration, logging bootstrap, and the WebSocket endpoint.

pub mod config;
pub mod logging;
pub mod ws;
