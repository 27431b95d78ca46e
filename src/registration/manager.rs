//! RegistrationManager — drives one round-trip of the intake conversation:
//! prompt build, LLM call, reply parse, and the progress decision.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::field::Field;
use super::parser::parse_reply;
use super::prompts::{build_messages, REPROMPT_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE};
use super::session::{CollectedInfo, Session, SessionStatus, SessionStore};

/// Outcome of one user message, returned to the HTTP layer as-is.
///
/// Every failure mode still carries the (unchanged) collected snapshot and
/// completion flag, so the response shape never loses fields.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: Uuid,
    pub message: String,
    pub collected_info: CollectedInfo,
    pub registration_complete: bool,
}

/// Coordinates sessions and the LLM round-trip. All failures are converted
/// to user-facing messages here; nothing propagates to the transport layer.
pub struct RegistrationManager {
    llm: Arc<dyn LlmProvider>,
    store: Arc<SessionStore>,
}

impl RegistrationManager {
    pub fn new(llm: Arc<dyn LlmProvider>, store: Arc<SessionStore>) -> Self {
        Self { llm, store }
    }

    /// Process one inbound user message for a session.
    ///
    /// The session lock is held for the whole round-trip, so a second
    /// message for the same session queues rather than interleaves.
    pub async fn handle_message(&self, session_id: Option<Uuid>, user_message: &str) -> ChatReply {
        let (id, handle) = self.store.get_or_create(session_id).await;
        let mut session = handle.lock().await;

        let messages = build_messages(&session, user_message);
        let request = CompletionRequest::new(messages);

        let raw = match self.llm.complete(request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::warn!(session = %id, error = %e, "LLM request failed");
                return Self::reply(id, SERVICE_UNAVAILABLE_MESSAGE.to_string(), &session);
            }
        };

        let parsed = match parse_reply(&raw, session.current_field) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(session = %id, error = %e, "Reply broke the format contract");
                return Self::reply(id, REPROMPT_MESSAGE.to_string(), &session);
            }
        };

        let before = session.current_field;
        if session.apply_progress(&parsed.belief, user_message) {
            tracing::info!(
                session = %id,
                from = %before,
                to = %session.current_field,
                "Field collected"
            );
        }

        // History records the round-trip only once the reply parsed,
        // assistant turn first.
        session
            .history
            .push(ChatMessage::assistant(&parsed.display_message));
        session.history.push(ChatMessage::user(user_message));
        session.touch();

        Self::reply(id, parsed.display_message, &session)
    }

    /// Session status for the read-only endpoint. `None` for unknown ids.
    pub async fn status(&self, session_id: Uuid) -> Option<SessionStatus> {
        let handle = self.store.get(session_id).await?;
        let session = handle.lock().await;
        Some(SessionStatus {
            session_id,
            current_field: session.current_field,
            collected_info: session.collected.clone(),
            registration_complete: session.is_complete(),
            created_at: session.created_at,
        })
    }

    fn reply(id: Uuid, message: String, session: &Session) -> ChatReply {
        ChatReply {
            session_id: id,
            message,
            collected_info: session.collected.clone(),
            registration_complete: session.is_complete(),
        }
    }
}
