use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    /// The blocking runtime could not be built.
    #[error("failed to start model runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("model request to '{model}' failed: {message}")]
    Request { model: String, message: String },

    #[error("model '{model}' returned no text")]
    EmptyResponse { model: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
