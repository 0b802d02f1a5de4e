//! Background engine for the chat client.
//!
//! The engine performs assistant calls on a tokio task and reports results
//! over a channel, so the UI loop keeps rendering while a turn is pending.
//! It holds no conversation state of its own.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{RwLock, mpsc};

use crate::client::AssistantClient;
use crate::logging;

use super::events::Event;
use super::ops::Op;
use super::turn::TurnId;

// === Types ===

/// Handle to communicate with the engine
#[derive(Clone)]
pub struct EngineHandle {
    /// Send operations to the engine
    pub tx_op: mpsc::Sender<Op>,
    /// Receive events from the engine
    pub rx_event: Arc<RwLock<mpsc::Receiver<Event>>>,
}

impl EngineHandle {
    /// Send an operation to the engine
    pub async fn send(&self, op: Op) -> Result<()> {
        self.tx_op.send(op).await?;
        Ok(())
    }
}

pub struct Engine {
    client: Arc<dyn AssistantClient>,
    rx_op: mpsc::Receiver<Op>,
    tx_event: mpsc::Sender<Event>,
}

// === Engine ===

impl Engine {
    pub fn new(client: Arc<dyn AssistantClient>) -> (Self, EngineHandle) {
        let (tx_op, rx_op) = mpsc::channel(32);
        let (tx_event, rx_event) = mpsc::channel(64);

        let engine = Engine {
            client,
            rx_op,
            tx_event,
        };
        let handle = EngineHandle {
            tx_op,
            rx_event: Arc::new(RwLock::new(rx_event)),
        };
        (engine, handle)
    }

    /// Process operations until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        while let Some(op) = self.rx_op.recv().await {
            match op {
                Op::SendMessage { turn_id, content } => {
                    self.handle_send_message(turn_id, content).await;
                }
                Op::Shutdown => {
                    logging::debug("Engine shutting down");
                    break;
                }
            }
        }
    }

    async fn handle_send_message(&self, turn_id: TurnId, content: String) {
        logging::debug(format!("{turn_id}: POST {}", self.client.endpoint()));
        let result = self.client.send_message(&content).await;
        // The view may be gone by now; a late result is simply dropped.
        if self
            .tx_event
            .send(Event::TurnComplete { turn_id, result })
            .await
            .is_err()
        {
            logging::debug(format!("{turn_id}: no listener for result"));
        }
    }
}

/// Spawn the engine on the current runtime.
pub fn spawn_engine(client: Arc<dyn AssistantClient>) -> EngineHandle {
    let (engine, handle) = Engine::new(client);

    tokio::spawn(async move {
        engine.run().await;
    });

    handle
}

#[cfg(test)]
pub(crate) struct MockEngineHandle {
    pub handle: EngineHandle,
    pub rx_op: mpsc::Receiver<Op>,
    pub tx_event: mpsc::Sender<Event>,
}

#[cfg(test)]
pub(crate) fn mock_engine_handle() -> MockEngineHandle {
    let (tx_op, rx_op) = mpsc::channel(32);
    let (tx_event, rx_event) = mpsc::channel(64);
    let handle = EngineHandle {
        tx_op,
        rx_event: Arc::new(RwLock::new(rx_event)),
    };

    MockEngineHandle {
        handle,
        rx_op,
        tx_event,
    }
}
