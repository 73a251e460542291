//! Selection of knowledge entries relevant to a message.

use concierge_core::types::{IntentResult, KnowledgeItem};

/// Maximum number of entries returned for one message.
pub const MAX_RELEVANT: usize = 3;

/// Picks up to [`MAX_RELEVANT`] catalog entries for a classified message.
///
/// Entries whose category equals the intent come first, then entries with a
/// keyword found in the message, then (only if nothing matched) the head of
/// the catalog. Each entry appears at most once.
#[derive(Debug, Clone)]
pub struct KnowledgeRetriever {
    max_results: usize,
}

impl Default for KnowledgeRetriever {
    fn default() -> Self {
        Self::new(MAX_RELEVANT)
    }
}

impl KnowledgeRetriever {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    pub fn find_relevant(
        &self,
        message: &str,
        intent: &IntentResult,
        catalog: &[KnowledgeItem],
    ) -> Vec<KnowledgeItem> {
        let normalized = message.to_lowercase();
        let mut relevant: Vec<KnowledgeItem> = Vec::new();

        for item in catalog.iter().filter(|k| k.category == intent.intent) {
            push_unique(&mut relevant, item);
        }

        for item in catalog.iter().filter(|k| k.matches(&normalized)) {
            push_unique(&mut relevant, item);
        }

        if relevant.is_empty() {
            for item in catalog.iter().take(self.max_results) {
                push_unique(&mut relevant, item);
            }
        }

        relevant.truncate(self.max_results);
        relevant
    }
}

fn push_unique(into: &mut Vec<KnowledgeItem>, item: &KnowledgeItem) {
    if !into.iter().any(|k| k.id == item.id) {
        into.push(item.clone());
    }
}
