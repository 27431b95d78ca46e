//! Error types for the registration service.
//!
//! Nothing in the registration flow is fatal: transport and parse failures
//! are caught at the state-machine boundary and converted into a fixed
//! user-facing message with the session left untouched.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM transport errors. Every variant maps to the same user-facing
/// "service unavailable" outcome; the variants exist for logs.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} returned status {status}")]
    Http { provider: String, status: u16 },

    #[error("Provider {provider} timed out")]
    Timeout { provider: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Reply-parsing errors: the model broke the two-part format contract.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Reply contains no JSON object")]
    MissingJson,

    #[error("Reply's JSON span is not a valid object: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Reply's JSON object is missing the \"{0}\" key")]
    MissingKey(&'static str),
}
