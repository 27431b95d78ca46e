//! Session state — collected fields, conversation history, and the
//! in-memory session store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::llm::ChatMessage;

use super::field::Field;
use super::normalize::normalize;

/// Minimum password length, counted in characters of the raw user message.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// The four registration values. Every key is always present in the JSON
/// form; an uncollected field serializes as `null`, never disappears.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedInfo {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub workplace: Option<String>,
}

impl CollectedInfo {
    /// The stored value for a field, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Username => self.username.as_deref(),
            Field::Password => self.password.as_deref(),
            Field::Workplace => self.workplace.as_deref(),
            Field::Completed => None,
        }
    }

    /// Set the value for a field. Setting the terminal marker is a no-op.
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::Workplace => &mut self.workplace,
            Field::Completed => return,
        };
        *slot = Some(value);
    }

    /// Whether all four values are set.
    pub fn is_filled(&self) -> bool {
        Field::ORDER.iter().all(|f| self.get(*f).is_some())
    }
}

/// One user's conversation: the authoritative collected values, the field
/// currently being collected, and the append-only turn history.
#[derive(Debug)]
pub struct Session {
    pub collected: CollectedInfo,
    pub current_field: Field,
    pub history: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    last_active: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            collected: CollectedInfo::default(),
            current_field: Field::default(),
            history: Vec::new(),
            created_at: Utc::now(),
            last_active: Instant::now(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session as recently used (resets the idle clock).
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// How long since the last completed round-trip.
    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    /// Registration is complete once every value is set and the field
    /// pointer has reached the terminal marker.
    pub fn is_complete(&self) -> bool {
        self.collected.is_filled() && self.current_field.is_terminal()
    }

    /// Apply the model's belief about all four fields to the session.
    ///
    /// Progress requires the belief to carry a non-null value for the
    /// current field that differs from what is stored. The accepted value is
    /// the normalized belief value — except for the password, which is the
    /// raw user message verbatim (gated on length) so the secret never
    /// round-trips through the model's echo.
    ///
    /// On progress the whole `CollectedInfo` is replaced with the belief
    /// (the model may revise earlier fields), with one carve-out: the
    /// password slot never takes a model-authored value.
    ///
    /// Returns whether the field pointer advanced.
    pub fn apply_progress(&mut self, belief: &CollectedInfo, user_message: &str) -> bool {
        let field = self.current_field;
        if field.is_terminal() {
            return false;
        }

        let Some(proposed) = belief.get(field) else {
            return false;
        };
        if self.collected.get(field) == Some(proposed) {
            return false;
        }

        let accepted = match field {
            Field::Password => {
                if user_message.chars().count() < PASSWORD_MIN_CHARS {
                    return false;
                }
                user_message.to_string()
            }
            _ => {
                let cleaned = normalize(field, proposed);
                if cleaned.is_empty() {
                    return false;
                }
                cleaned
            }
        };

        let prior_password = self.collected.password.take();
        self.collected = belief.clone();
        self.collected.password = prior_password;
        self.collected.set(field, accepted);

        if let Some(next) = field.next() {
            self.current_field = next;
        }
        true
    }
}

/// Snapshot of a session for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub current_field: Field,
    pub collected_info: CollectedInfo,
    pub registration_complete: bool,
    pub created_at: DateTime<Utc>,
}

/// In-memory session store, keyed by session id.
///
/// Sessions are created on first message and pruned once idle past the
/// timeout. Each session sits behind its own `tokio::sync::Mutex`: a second
/// message for the same session queues on the lock until the in-flight
/// round-trip finishes, so state mutations never interleave. Distinct
/// sessions share nothing and proceed in parallel.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Look up a session by id, creating it (under a fresh id if none was
    /// supplied) when absent.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Arc<Mutex<Session>>) {
        if let Some(id) = id {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(&id) {
                return (id, Arc::clone(handle));
            }
        }

        let id = id.unwrap_or_else(Uuid::new_v4);
        let mut sessions = self.sessions.write().await;
        let handle = sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())));
        (id, Arc::clone(handle))
    }

    /// Look up a session without creating one.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).map(Arc::clone)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle past the timeout. Sessions with a round-trip in
    /// flight hold their lock and are kept.
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.idle_for() < self.idle_timeout,
            Err(_) => true,
        });
        before - sessions.len()
    }
}

/// Spawn a background task that sweeps expired sessions on an interval.
pub fn spawn_sweep_task(
    store: Arc<SessionStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick fires immediately, skip it
        loop {
            ticker.tick().await;
            let removed = store.sweep_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "Swept expired sessions");
            }
        }
    })
}
