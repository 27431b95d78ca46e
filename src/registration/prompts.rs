//! Prompt construction for the registration conversation.
//!
//! Models follow format contracts most reliably when the contract is
//! restated close to generation time, so the required two-part shape appears
//! twice: once in the opening system turn and once in a trailing
//! reinforcement turn after the user's message. History is bounded to keep
//! prompt growth flat over a long conversation.

use crate::llm::ChatMessage;

use super::field::Field;
use super::session::Session;

/// How many recent history turns are replayed into each prompt.
pub const HISTORY_WINDOW: usize = 3;

/// Fixed user-facing message for upstream transport failures.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Sorry, I'm having trouble connecting to the AI service. Please try again in a moment.";

/// Fixed user-facing message when the model's reply could not be parsed.
pub const REPROMPT_MESSAGE: &str =
    "Sorry, I didn't quite catch that. Could you tell me again?";

/// Build the ordered message sequence for one round-trip:
/// system instructions, a bounded window of recent history (oldest first),
/// the new user turn, and a reinforcement of the format contract.
pub fn build_messages(session: &Session, user_message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(HISTORY_WINDOW + 3);
    messages.push(ChatMessage::system(system_prompt(session)));

    let recent = session
        .history
        .len()
        .saturating_sub(HISTORY_WINDOW);
    messages.extend(session.history[recent..].iter().cloned());

    messages.push(ChatMessage::user(user_message));
    messages.push(ChatMessage::system(REINFORCEMENT));
    messages
}

fn system_prompt(session: &Session) -> String {
    let collected = serde_json::to_string_pretty(&session.collected)
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        "You are a friendly registration assistant. You collect exactly four pieces of \
         information from the user, one at a time, in this order: name, username, password, \
         workplace/school.\n\
         Currently collecting: {current_field}\n\
         Collected so far:\n{collected}\n\n\
         For passwords, require at least 8 characters and encourage numbers and special \
         characters.\n\n\
         EVERY reply must have exactly two parts:\n\
         1. A short, natural message for the user (1-2 sentences).\n\
         2. On its own final line, a single JSON object with exactly these four keys: \
         \"name\", \"username\", \"password\", \"workplace\". For each key give the value \
         you believe the user has validly provided, or null if they have not.\n\n\
         Example reply:\n\
         Nice to meet you, John! What username would you like?\n\
         {{\"name\": \"John Smith\", \"username\": null, \"password\": null, \"workplace\": null}}",
        current_field = session.current_field,
    )
}

const REINFORCEMENT: &str = "Remember the required format: a short message for the user, \
then on its own final line one JSON object with the keys \"name\", \"username\", \
\"password\", \"workplace\" (value or null for each). Example:\n\
Great choice!\n\
{\"name\": \"John\", \"username\": \"john_s\", \"password\": null, \"workplace\": null}";

/// Fallback conversational line, used when the model sends the JSON object
/// with no message in front of it.
pub fn default_filler_message(field: Field) -> &'static str {
    match field {
        Field::Name => "Thanks! I've got your name down.",
        Field::Username => "Nice choice of username!",
        Field::Password => "Your password has been saved.",
        Field::Workplace => "Great, that's everything I needed!",
        Field::Completed => "You're all set — registration is complete!",
    }
}
