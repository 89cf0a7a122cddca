use async_trait::async_trait;
use notemail_rs_llm::{ChatProvider, ChatRequest, LlmError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FixedLLM {
    response: String,
}

impl FixedLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FixedLLM {
    async fn complete(&self, _request: ChatRequest) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

/// Replies from a script in order and records every request.
///
/// Once the script runs out, the last reply repeats.
#[derive(Debug, Clone)]
pub struct RecordingLLM {
    replies: Arc<Mutex<VecDeque<String>>>,
    last: Arc<Mutex<String>>,
    seen: Arc<Mutex<Vec<ChatRequest>>>,
}

impl RecordingLLM {
    pub fn new<I, S>(replies: I) -> (Self, Arc<Mutex<Vec<ChatRequest>>>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
                last: Arc::new(Mutex::new(String::new())),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl ChatProvider for RecordingLLM {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.seen.lock().push(request);
        let reply = match self.replies.lock().pop_front() {
            Some(reply) => {
                *self.last.lock() = reply.clone();
                reply
            }
            None => self.last.lock().clone(),
        };
        Ok(reply)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FailingLLM;

#[async_trait]
impl ChatProvider for FailingLLM {
    async fn complete(&self, _request: ChatRequest) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "model unavailable".to_string(),
        })
    }
}

/// Replies from a script in order, then fails like [`FailingLLM`].
#[derive(Debug, Clone)]
pub struct FlakyLLM {
    replies: Arc<Mutex<VecDeque<String>>>,
}

impl FlakyLLM {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
        }
    }
}

#[async_trait]
impl ChatProvider for FlakyLLM {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let next = self.replies.lock().pop_front();
        match next {
            Some(reply) => Ok(reply),
            None => FailingLLM.complete(request).await,
        }
    }
}
