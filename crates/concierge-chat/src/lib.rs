//! Conversational assistant for the Concierge site.
//!
//! Classifies a visitor's message, retrieves matching knowledge entries,
//! composes a templated reply, and records the exchange. No language model
//! is involved; every step is keyword driven and deterministic.

pub mod classifier;
pub mod conversation;
pub mod error;
pub mod knowledge;
pub mod orchestrator;
pub mod response;
pub mod retriever;
pub mod types;

pub use classifier::IntentClassifier;
pub use conversation::ConversationStore;
pub use error::ChatError;
pub use knowledge::{builtin_catalog, CatalogSource, KnowledgeStore};
pub use orchestrator::{check_message_length, parse_sender, Assistant};
pub use response::ResponseComposer;
pub use retriever::KnowledgeRetriever;
pub use types::{ComposedReply, ExchangeReply};
