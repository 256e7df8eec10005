use genai::Client;
use genai::chat::ChatRequest;
use tokio::runtime::Runtime;
use tracing::{debug, info, instrument};

use crate::BoxError;

use super::error::{ModelError, ModelResult};
use super::{ModelClient, ModelReply};

/// Blocking facade over a `genai` client.
///
/// Each call is driven to completion on a private current-thread runtime, so this
/// must not be used from inside another tokio runtime.
pub struct GenaiModelClient {
    client: Client,
    model: String,
    runtime: Runtime,
}

impl std::fmt::Debug for GenaiModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiModelClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenaiModelClient {
    pub fn new(model: impl Into<String>) -> ModelResult<Self> {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> ModelResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ModelError::Runtime)?;
        Ok(Self {
            client,
            model: model.into(),
            runtime,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    pub fn complete(&self, prompt: &str) -> ModelResult<ModelReply> {
        debug!("Sending prompt to model");
        let request = ChatRequest::from_user(prompt);

        let response = self
            .runtime
            .block_on(self.client.exec_chat(&self.model, request, None))
            .map_err(|e| ModelError::Request {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        let text = response
            .first_text()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ModelError::EmptyResponse {
                model: self.model.clone(),
            })?;
        let tokens_used = response
            .usage
            .total_tokens
            .and_then(|t| u64::try_from(t).ok())
            .unwrap_or(0);

        info!(tokens_used, response_len = text.len(), "Model invocation completed");

        Ok(ModelReply {
            text,
            tokens_used,
            model_id: self.model.clone(),
        })
    }
}

impl ModelClient for GenaiModelClient {
    fn invoke(&self, prompt: &str) -> Result<ModelReply, BoxError> {
        Ok(self.complete(prompt)?)
    }
}
