//! Reply types produced by the assistant.

use serde::{Deserialize, Serialize};

use concierge_core::types::IntentResult;

/// A composed reply: answer text plus quick-reply suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedReply {
    /// Never empty.
    pub response: String,
    pub suggestions: Vec<String>,
}

/// Result of a full exchange: the reply, the classification behind it, and
/// the session the messages were recorded under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeReply {
    pub session_id: String,
    pub response: String,
    pub suggestions: Vec<String>,
    pub intent: IntentResult,
}
