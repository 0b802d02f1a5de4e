use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, OnceLock};

use async_trait::async_trait;

use crate::client::{AssistantClient, ClientError};
use crate::models::AssistantReply;

/// Serialise tests that mutate process-wide environment variables.
pub(crate) fn lock_test_env() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Mutex::new(()));
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Client that replays canned results and records what it was sent.
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Result<AssistantReply, ClientError>>>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub(crate) fn new(replies: Vec<Result<AssistantReply, ClientError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AssistantClient for ScriptedClient {
    fn endpoint(&self) -> &str {
        "scripted://assistant"
    }

    async fn send_message(&self, message: &str) -> Result<AssistantReply, ClientError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.to_string());
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(ClientError::Network("no scripted reply left".to_string())))
    }
}
