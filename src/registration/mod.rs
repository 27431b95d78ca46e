//! Registration intake — a multi-turn conversation that collects four
//! fields (name, username, password, workplace) with an LLM doing the
//! language understanding.
//!
//! Each user message flows prompt builder → LLM → reply parser → state
//! machine. The model replies with a short message plus a trailing JSON
//! object describing its belief about all four fields; the state machine
//! decides whether that belief is forward progress for the field currently
//! being collected.

pub mod field;
pub mod manager;
pub mod normalize;
pub mod parser;
pub mod prompts;
pub mod routes;
pub mod session;

pub use field::Field;
pub use manager::{ChatReply, RegistrationManager};
pub use parser::{parse_reply, ParsedReply};
pub use routes::{chat_routes, ChatRequest, ChatRouteState};
pub use session::{
    spawn_sweep_task, CollectedInfo, Session, SessionStatus, SessionStore, PASSWORD_MIN_CHARS,
};
