//! Storage capability consumed by the assistant.
//!
//! The assistant receives an implementation at construction time; there is
//! no process-wide client. Every method may fail, and the assistant decides
//! how each failure degrades.

use crate::error::Result;
use crate::types::{ConversationMessage, ConversationSession, KnowledgeItem, Sender};

/// Persistent backend for sessions, messages, and the knowledge catalog.
pub trait AssistantStore: Send + Sync {
    /// Insert a new session row and return it.
    fn create_session(&self) -> Result<ConversationSession>;

    /// Look up a session by id. `Ok(None)` when no such session was recorded.
    fn find_session(&self, session_id: &str) -> Result<Option<ConversationSession>>;

    /// Append one message to a session.
    fn save_message(
        &self,
        session_id: &str,
        sender: Sender,
        content: &str,
        suggestions: Option<&[String]>,
    ) -> Result<()>;

    /// All messages of a session, ascending by timestamp.
    fn get_history(&self, session_id: &str) -> Result<Vec<ConversationMessage>>;

    /// The knowledge catalog, ordered by category.
    fn load_catalog(&self) -> Result<Vec<KnowledgeItem>>;
}
