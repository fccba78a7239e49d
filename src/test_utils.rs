//! In-memory transport for tests.

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::{prelude::*, req::Transport, Error, TransportError};

/// Replays scripted replies in order and records every request.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_ok(&self, reply: Value) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    pub(crate) fn push_err(&self, err: TransportError) {
        self.replies.lock().unwrap().push_back(Err(err.into()));
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport(TransportError::Request(
                "no scripted reply".to_string(),
            ))))
    }
}
