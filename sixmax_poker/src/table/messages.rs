//! Wire protocol and actor inbox messages.
//!
//! Inbound client events and outbound server events are tagged JSON
//! objects; the tag field is `event`. Cards travel as two-character
//! codes.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::game::engine::{TableError, TableView};
use crate::game::entities::{Chips, PlayerAction, PlayerId};

/// Betting action kinds as they appear on the wire.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
}

/// Events a client may send.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    Join {
        name: String,
    },
    SetStartingStack {
        amount: Chips,
    },
    StartGame,
    Action {
        #[serde(rename = "type")]
        kind: ActionKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<Chips>,
    },
}

impl ClientEvent {
    /// Convert an `action` event into an engine action. Raising without
    /// an amount is a protocol error.
    pub fn as_action(kind: ActionKind, amount: Option<Chips>) -> Result<PlayerAction, TableError> {
        Ok(match kind {
            ActionKind::Fold => PlayerAction::Fold,
            ActionKind::Check => PlayerAction::Check,
            ActionKind::Call => PlayerAction::Call,
            ActionKind::Raise => PlayerAction::Raise {
                to: amount.ok_or(TableError::RaiseAmountMissing)?,
            },
        })
    }
}

/// Events the server pushes to clients.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Fresh per-viewer projection, broadcast after every mutation.
    State(Box<TableView>),
    /// Sent only to the offending socket; state is unchanged.
    ErrorMessage { message: String },
}

/// Messages flowing into the table actor's inbox. All table mutation is
/// driven from here, one message at a time.
#[derive(Debug)]
pub enum TableMessage {
    /// A transport connection opened; `sender` receives this viewer's
    /// outbound events from now on.
    Attach {
        viewer: PlayerId,
        sender: mpsc::Sender<ServerEvent>,
    },
    /// The transport saw the connection drop.
    Detach { viewer: PlayerId },
    /// A parsed inbound client event.
    Client {
        viewer: PlayerId,
        event: ClientEvent,
    },
    /// Inter-hand timer fired.
    StartNextHand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_event_shape() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"join","name":"alice"}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::Join {
                name: "alice".into()
            }
        );
    }

    #[test]
    fn test_set_starting_stack_shape() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"setStartingStack","amount":500}"#).unwrap();
        assert_eq!(event, ClientEvent::SetStartingStack { amount: 500 });
    }

    #[test]
    fn test_start_game_shape() {
        let event: ClientEvent = serde_json::from_str(r#"{"event":"startGame"}"#).unwrap();
        assert_eq!(event, ClientEvent::StartGame);
    }

    #[test]
    fn test_action_shapes() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"action","type":"raise","amount":250}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::Action {
                kind: ActionKind::Raise,
                amount: Some(250)
            }
        );
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"action","type":"fold"}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::Action {
                kind: ActionKind::Fold,
                amount: None
            }
        );
    }

    #[test]
    fn test_raise_without_amount_is_rejected() {
        assert_eq!(
            ClientEvent::as_action(ActionKind::Raise, None),
            Err(TableError::RaiseAmountMissing)
        );
        assert_eq!(
            ClientEvent::as_action(ActionKind::Raise, Some(100)),
            Ok(PlayerAction::Raise { to: 100 })
        );
    }

    #[test]
    fn test_error_message_serialization() {
        let json = serde_json::to_string(&ServerEvent::ErrorMessage {
            message: "not your turn".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"event":"errorMessage","message":"not your turn"}"#
        );
    }

    #[test]
    fn test_state_event_is_tagged_and_flat() {
        use crate::game::engine::Table;
        let table = Table::new(1_000, 10, 20);
        let view = table.project(uuid::Uuid::new_v4());
        let json =
            serde_json::to_value(ServerEvent::State(Box::new(view))).unwrap();
        assert_eq!(json["event"], "state");
        assert_eq!(json["joined"], false);
        assert_eq!(json["phase"], "lobby");
        assert!(json["availableActions"]["canFold"].is_boolean());
    }
}
