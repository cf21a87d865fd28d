//! Table actor: the single-writer monitor around the table state.
//!
//! Every inbound client event, transport disconnect, and timer tick is a
//! message in one mpsc inbox; the actor handles each to completion and
//! pushes a freshly projected `state` to every attached viewer before
//! taking the next message. Broadcasts use `try_send` so a slow client
//! can never stall the table.

use log::{debug, warn};
use std::collections::HashMap;
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};

use super::messages::{ClientEvent, ServerEvent, TableMessage};
use crate::game::{
    constants,
    engine::Table,
    entities::{Chips, PlayerId},
};

/// Cloneable handle for sending messages to a running table actor.
#[derive(Clone)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
}

impl TableHandle {
    pub async fn send(&self, message: TableMessage) -> Result<(), &'static str> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "table is closed")
    }
}

/// Owns the [`Table`] and the per-viewer outbound channels.
pub struct TableActor {
    table: Table,
    inbox: mpsc::Receiver<TableMessage>,
    handle: TableHandle,
    subscribers: HashMap<PlayerId, mpsc::Sender<ServerEvent>>,
    next_hand_timer: Option<JoinHandle<()>>,
}

impl TableActor {
    pub fn new(starting_stack: Chips, small_blind: Chips, big_blind: Chips) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(128);
        let handle = TableHandle { sender };
        let actor = Self {
            table: Table::new(starting_stack, small_blind, big_blind),
            inbox,
            handle: handle.clone(),
            subscribers: HashMap::new(),
            next_hand_timer: None,
        };
        (actor, handle)
    }

    /// Drain the inbox until every handle is dropped.
    pub async fn run(mut self) {
        log::info!("table actor starting");
        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
        }
        log::info!("table actor stopped");
    }

    fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::Attach { viewer, sender } => {
                self.subscribers.insert(viewer, sender);
                debug!("viewer {viewer} attached");
                self.send_state_to(viewer);
            }
            TableMessage::Detach { viewer } => {
                self.subscribers.remove(&viewer);
                debug!("viewer {viewer} detached");
                self.table.disconnect(viewer);
                self.broadcast_state();
                self.arm_timer_if_needed();
            }
            TableMessage::Client { viewer, event } => {
                let result = match event {
                    ClientEvent::Join { name } => self.table.join(viewer, &name),
                    ClientEvent::SetStartingStack { amount } => {
                        self.table.set_starting_stack(viewer, amount)
                    }
                    ClientEvent::StartGame => {
                        // A manual start must cancel any pending timer
                        // before the table state moves. A pending timer
                        // implies the game is already running, in which
                        // case the start is rejected without touching it.
                        if !self.table.game_started {
                            self.cancel_timer();
                        }
                        self.table.start_game(viewer)
                    }
                    ClientEvent::Action { kind, amount } => ClientEvent::as_action(kind, amount)
                        .and_then(|action| self.table.take_action(viewer, action)),
                };
                match result {
                    Ok(()) => {
                        self.broadcast_state();
                        self.arm_timer_if_needed();
                    }
                    Err(err) => self.send_error_to(viewer, err.to_string()),
                }
            }
            TableMessage::StartNextHand => {
                self.cancel_timer();
                self.table.start_next_hand();
                self.broadcast_state();
                self.arm_timer_if_needed();
            }
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.next_hand_timer.take() {
            timer.abort();
        }
    }

    /// Arm the inter-hand timer when the last event finished a hand with
    /// enough players left for another.
    fn arm_timer_if_needed(&mut self) {
        if !self.table.take_schedule_flag() {
            return;
        }
        self.cancel_timer();
        let handle = self.handle.clone();
        self.next_hand_timer = Some(tokio::spawn(async move {
            sleep(constants::NEXT_HAND_DELAY).await;
            let _ = handle.send(TableMessage::StartNextHand).await;
        }));
    }

    fn send_state_to(&mut self, viewer: PlayerId) {
        let view = self.table.project(viewer);
        self.try_deliver(viewer, ServerEvent::State(Box::new(view)));
    }

    fn send_error_to(&mut self, viewer: PlayerId, message: String) {
        self.try_deliver(viewer, ServerEvent::ErrorMessage { message });
    }

    fn try_deliver(&mut self, viewer: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.subscribers.get(&viewer) {
            match sender.try_send(event) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("viewer {viewer} channel full, dropping event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    self.subscribers.remove(&viewer);
                }
            }
        }
    }

    /// Project and push a fresh `state` to every attached viewer. Dead
    /// subscribers are evicted here.
    fn broadcast_state(&mut self) {
        let views: Vec<(PlayerId, ServerEvent)> = self
            .subscribers
            .keys()
            .map(|&viewer| {
                (
                    viewer,
                    ServerEvent::State(Box::new(self.table.project(viewer))),
                )
            })
            .collect();
        for (viewer, event) in views {
            self.try_deliver(viewer, event);
        }
    }
}
