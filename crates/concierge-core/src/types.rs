//! Shared data model for the assistant and its storage backends.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Knowledge
// =============================================================================

/// A titled block of domain content tagged with a category and keywords.
///
/// Items are loaded once per catalog load and never mutated afterwards.
/// Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: i64,
    pub category: String,
    pub title: String,
    pub content: String,
    /// Lower-case keywords, in authoring order, without duplicates.
    pub keywords: Vec<String>,
}

impl KnowledgeItem {
    pub fn new(
        id: i64,
        category: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        keywords: &[&str],
    ) -> Self {
        Self {
            id,
            category: category.into(),
            title: title.into(),
            content: content.into(),
            keywords: Self::normalize_keywords(keywords),
        }
    }

    /// Lower-case each keyword and drop repeats, keeping first occurrence order.
    pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kws: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().to_lowercase();
            if !kws.contains(&kw) {
                kws.push(kw);
            }
        }
        kws
    }

    /// True if any keyword occurs as a substring of the already case-folded text.
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords
            .iter()
            .any(|kw| !kw.is_empty() && normalized.contains(kw.as_str()))
    }
}

// =============================================================================
// Intent
// =============================================================================

/// Outcome of classifying one message. Built fresh per call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    pub intent: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    pub matched_entities: Vec<String>,
    pub suggested_actions: Vec<String>,
}

// =============================================================================
// Conversation
// =============================================================================

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl std::str::FromStr for Sender {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            _ => Err(format!("Unknown sender: {}", s)),
        }
    }
}

/// A durable grouping of exchanged messages, as recorded by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    /// Opaque identifier.
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// One appended message. Never mutated or deleted once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub session_id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}
