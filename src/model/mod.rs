//! Language-model client seam and response parsing.

pub mod client;
pub mod error;
pub mod parse;


pub use client::GenaiModelClient;
pub use error::{ModelError, ModelResult};
pub use parse::parse_response_json;

use serde::{Deserialize, Serialize};

use crate::BoxError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One completed model invocation.
pub struct ModelReply {
    pub text: String,
    pub tokens_used: u64,
    pub model_id: String,
}

/// Synchronous model invocation. Timeouts and retries belong to the implementation.
pub trait ModelClient: Send + Sync {
    fn invoke(&self, prompt: &str) -> Result<ModelReply, BoxError>;
}

#[cfg(any(test, feature = "mock"))]
/// Replies with canned text, records prompts and counts calls.
#[derive(Debug, Default)]
pub struct MockModelClient {
    reply: String,
    fail: bool,
    prompts: parking_lot::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockModelClient {
    pub const MODEL_ID: &'static str = "mock-model";

    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[cfg(any(test, feature = "mock"))]
impl ModelClient for MockModelClient {
    fn invoke(&self, prompt: &str) -> Result<ModelReply, BoxError> {
        self.prompts.lock().push(prompt.to_string());
        if self.fail {
            return Err(Box::new(ModelError::EmptyResponse {
                model: Self::MODEL_ID.to_string(),
            }));
        }
        Ok(ModelReply {
            text: self.reply.clone(),
            tokens_used: (prompt.len() / 4) as u64,
            model_id: Self::MODEL_ID.to_string(),
        })
    }
}
