#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to invoke model '{model_id}': {message}")]
pub struct ModelError {
    pub model_id: String,
    pub message: String,
}

/// Hosted text-generation endpoint. Bodies are opaque JSON bytes.
pub trait TextGenerator {
    fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>, ModelError>;
}
