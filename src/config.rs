//! Service configuration, loaded from the environment at startup.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmConfig;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP API.
    pub port: u16,
    /// LLM provider settings (key, endpoint, model, request timeout).
    pub llm: LlmConfig,
    /// Idle sessions are dropped after this duration.
    pub session_idle_timeout: Duration,
    /// How often the session sweep runs.
    pub sweep_interval: Duration,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// `GROQ_API_KEY` is required; everything else has a default:
    /// `GROQ_API_URL`, `REG_ASSIST_MODEL`, `REG_ASSIST_PORT`,
    /// `REG_ASSIST_LLM_TIMEOUT_SECS`, `REG_ASSIST_SESSION_TTL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("GROQ_API_KEY".to_string()))?;

        let base_url =
            std::env::var("GROQ_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("REG_ASSIST_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let port = parse_env("REG_ASSIST_PORT", 8080u16)?;
        let llm_timeout_secs = parse_env("REG_ASSIST_LLM_TIMEOUT_SECS", 30u64)?;
        let session_ttl_secs = parse_env("REG_ASSIST_SESSION_TTL_SECS", 3600u64)?;

        Ok(Self {
            port,
            llm: LlmConfig {
                api_key: SecretString::from(api_key),
                base_url,
                model,
                request_timeout: Duration::from_secs(llm_timeout_secs),
            },
            session_idle_timeout: Duration::from_secs(session_ttl_secs),
            sweep_interval: Duration::from_secs(60),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_falls_back_to_default() {
        // Key chosen to not exist in any environment running these tests.
        let port: u16 = parse_env("REG_ASSIST_TEST_UNSET_KEY", 9999).unwrap();
        assert_eq!(port, 9999);
    }
}
