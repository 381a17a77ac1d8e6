//! Scripted gateway — returns canned replies in order.
//!
//! Used by the orchestrator's test suite (and handy for offline demos):
//! each `complete()` call pops the next scripted reply and records the
//! prompt it received, so tests can assert both call counts and prompt
//! contents. Exhausting the script is an error, which makes accidental
//! extra gateway calls fail loudly instead of passing silently.

use async_trait::async_trait;
use paperscope_core::error::GatewayError;
use paperscope_core::gateway::{CompletionRequest, Gateway};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A gateway that replays a fixed sequence of replies.
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A gateway with no scripted replies: any call fails.
    pub fn unreachable() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of completions served so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(request.prompt);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GatewayError::NotConfigured("scripted replies exhausted".into()))
    }
}
