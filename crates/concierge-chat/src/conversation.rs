//! Best-effort conversation persistence.
//!
//! Wraps the storage capability so that no persistence failure reaches the
//! caller: session creation falls back to a local identifier, failed writes
//! are logged and dropped, and failed reads return an empty history.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use concierge_core::store::AssistantStore;
use concierge_core::types::{ConversationMessage, Sender};

/// Prefix of identifiers generated when the store could not create a session.
pub const LOCAL_SESSION_PREFIX: &str = "local-";

/// Session and message persistence that never fails.
pub struct ConversationStore {
    store: Arc<dyn AssistantStore>,
}

impl ConversationStore {
    pub fn new(store: Arc<dyn AssistantStore>) -> Self {
        Self { store }
    }

    /// Create a session, or hand out a local identifier if the store refuses.
    ///
    /// Messages recorded under a local identifier are not durable.
    pub fn create_session(&self) -> String {
        match self.store.create_session() {
            Ok(session) => {
                tracing::debug!(session_id = %session.id, "Chat session created");
                session.id
            }
            Err(e) => {
                let id = local_session_id();
                tracing::warn!(
                    session_id = %id,
                    error = %e,
                    "Failed to create chat session, continuing without durable history"
                );
                id
            }
        }
    }

    /// Resolve the session an exchange should be recorded under.
    ///
    /// A missing, blank, or unknown id gets a fresh session. If the lookup
    /// itself fails the requested id is kept, since the store could not
    /// record a new session either.
    pub fn ensure_session(&self, requested: Option<&str>) -> String {
        let id = match requested {
            Some(id) if !id.trim().is_empty() => id,
            _ => return self.create_session(),
        };

        match self.store.find_session(id) {
            Ok(Some(session)) => session.id,
            Ok(None) => {
                tracing::info!(requested = %id, "Unknown chat session, starting a new one");
                self.create_session()
            }
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Failed to look up chat session");
                id.to_string()
            }
        }
    }

    /// Append a message. Failures are logged and swallowed.
    pub fn save_message(
        &self,
        session_id: &str,
        sender: Sender,
        content: &str,
        suggestions: Option<&[String]>,
    ) {
        if let Err(e) = self
            .store
            .save_message(session_id, sender, content, suggestions)
        {
            tracing::warn!(
                session_id = %session_id,
                sender = %sender,
                error = %e,
                "Failed to save chat message"
            );
        }
    }

    /// Messages of a session in ascending timestamp order; empty on failure.
    pub fn get_history(&self, session_id: &str) -> Vec<ConversationMessage> {
        match self.store.get_history(session_id) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to load chat history");
                vec![]
            }
        }
    }
}

/// `local-<unix millis>-<8 hex chars>`.
fn local_session_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}-{}",
        LOCAL_SESSION_PREFIX,
        Utc::now().timestamp_millis(),
        &suffix[..8]
    )
}
