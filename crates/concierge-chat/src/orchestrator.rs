//! Assistant facade: central coordinator wiring classification, retrieval,
//! composition, and persistence.
//!
//! Every operation here succeeds. Storage failures degrade to the built-in
//! catalog, a local session id, a dropped write, or an empty history.

use std::sync::Arc;

use concierge_core::config::ChatConfig;
use concierge_core::store::AssistantStore;
use concierge_core::types::{ConversationMessage, IntentResult, KnowledgeItem, Sender};

use crate::classifier::IntentClassifier;
use crate::conversation::ConversationStore;
use crate::error::ChatError;
use crate::knowledge::KnowledgeStore;
use crate::response::{ResponseComposer, SELF_INTRODUCTION};
use crate::retriever::KnowledgeRetriever;
use crate::types::{ComposedReply, ExchangeReply};

/// The conversational assistant.
pub struct Assistant {
    classifier: IntentClassifier,
    knowledge: KnowledgeStore,
    retriever: KnowledgeRetriever,
    composer: ResponseComposer,
    conversations: ConversationStore,
}

impl Assistant {
    /// Create an assistant with default settings.
    pub fn new(store: Arc<dyn AssistantStore>) -> Self {
        Self::with_config(store, &ChatConfig::default())
    }

    pub fn with_config(store: Arc<dyn AssistantStore>, config: &ChatConfig) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            knowledge: KnowledgeStore::new(Arc::clone(&store), config.cache_catalog),
            retriever: KnowledgeRetriever::default(),
            composer: ResponseComposer::new(),
            conversations: ConversationStore::new(store),
        }
    }

    pub fn detect_intent(&self, message: &str) -> IntentResult {
        self.classifier.detect_intent(message)
    }

    /// Up to three catalog entries relevant to a classified message.
    pub fn find_relevant_knowledge(
        &self,
        message: &str,
        intent: &IntentResult,
    ) -> Vec<KnowledgeItem> {
        let catalog = self.knowledge.catalog();
        self.retriever.find_relevant(message, intent, &catalog)
    }

    /// Classify, retrieve, and compose a reply for one message.
    ///
    /// A blank message is answered with the self-introduction.
    pub fn generate_response(&self, message: &str) -> ComposedReply {
        self.generate_with_intent(message).0
    }

    pub fn create_session(&self) -> String {
        self.conversations.create_session()
    }

    pub fn save_chat_message(
        &self,
        session_id: &str,
        sender: Sender,
        content: &str,
        suggestions: Option<&[String]>,
    ) {
        self.conversations
            .save_message(session_id, sender, content, suggestions);
    }

    pub fn get_chat_history(&self, session_id: &str) -> Vec<ConversationMessage> {
        self.conversations.get_history(session_id)
    }

    /// Run one full exchange and record both sides of it.
    ///
    /// A session is created when none is given or the given one is unknown
    /// to the store; the returned `session_id` is the one actually used. The
    /// user message is stored before the reply is composed and the reply is
    /// stored after; neither write can prevent the reply from being returned.
    pub fn exchange(&self, session_id: Option<&str>, message: &str) -> ExchangeReply {
        let session_id = self.conversations.ensure_session(session_id);

        self.save_chat_message(&session_id, Sender::User, message, None);

        let (reply, intent) = self.generate_with_intent(message);

        self.save_chat_message(
            &session_id,
            Sender::Bot,
            &reply.response,
            Some(&reply.suggestions),
        );

        tracing::debug!(
            session_id = %session_id,
            intent = %intent.intent,
            "Chat exchange completed"
        );

        ExchangeReply {
            session_id,
            response: reply.response,
            suggestions: reply.suggestions,
            intent,
        }
    }

    /// Drop the cached catalog so the next request reloads it from the store.
    pub fn refresh_knowledge(&self) {
        self.knowledge.refresh();
    }

    fn generate_with_intent(&self, message: &str) -> (ComposedReply, IntentResult) {
        let intent = self.detect_intent(message);

        if message.trim().is_empty() {
            let reply = ComposedReply {
                response: SELF_INTRODUCTION.to_string(),
                suggestions: intent.suggested_actions.clone(),
            };
            return (reply, intent);
        }

        let relevant = self.find_relevant_knowledge(message, &intent);
        let reply = self.composer.compose(message, &intent, &relevant);
        (reply, intent)
    }
}

/// Reject messages longer than `max` characters.
pub fn check_message_length(message: &str, max: usize) -> Result<(), ChatError> {
    if message.chars().count() > max {
        return Err(ChatError::MessageTooLong(max));
    }
    Ok(())
}

/// Parse a sender name as received from a caller.
pub fn parse_sender(raw: &str) -> Result<Sender, ChatError> {
    raw.parse::<Sender>()
        .map_err(|_| ChatError::InvalidSender(raw.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GENERIC_ACTIONS;
    use crate::knowledge::builtin_catalog;
    use concierge_core::error::ConciergeError;
    use concierge_core::types::ConversationSession;
    use concierge_storage::{Database, SqliteStore};
    use std::thread;

    /// Store whose every call fails, as if the backend were unreachable.
    struct FailingStore;

    impl AssistantStore for FailingStore {
        fn create_session(&self) -> Result<ConversationSession, ConciergeError> {
            Err(ConciergeError::Storage("backend unreachable".to_string()))
        }
        fn find_session(&self, _: &str) -> Result<Option<ConversationSession>, ConciergeError> {
            Err(ConciergeError::Storage("backend unreachable".to_string()))
        }
        fn save_message(
            &self,
            _: &str,
            _: Sender,
            _: &str,
            _: Option<&[String]>,
        ) -> Result<(), ConciergeError> {
            Err(ConciergeError::Storage("backend unreachable".to_string()))
        }
        fn get_history(&self, _: &str) -> Result<Vec<ConversationMessage>, ConciergeError> {
            Err(ConciergeError::Storage("backend unreachable".to_string()))
        }
        fn load_catalog(&self) -> Result<Vec<KnowledgeItem>, ConciergeError> {
            Err(ConciergeError::Storage("backend unreachable".to_string()))
        }
    }

    fn sqlite_assistant() -> (Assistant, SqliteStore) {
        let db = Arc::new(Database::in_memory().unwrap());
        let store = SqliteStore::new(db);
        store.seed_knowledge_if_empty(&builtin_catalog()).unwrap();
        (Assistant::new(Arc::new(store.clone())), store)
    }

    // ---- Caller surface ----

    #[test]
    fn test_pricing_question() {
        let (assistant, _) = sqlite_assistant();
        let intent = assistant.detect_intent("What are your prices?");
        assert_eq!(intent.intent, "pricing");
        assert_eq!(intent.confidence, 0.9);
        assert!(intent
            .suggested_actions
            .contains(&"Schedule a consultation".to_string()));

        let relevant = assistant.find_relevant_knowledge("What are your prices?", &intent);
        assert_eq!(relevant[0].category, "pricing");

        let reply = assistant.generate_response("What are your prices?");
        assert!(reply.response.contains(&relevant[0].content));
    }

    #[test]
    fn test_empty_message_gets_self_introduction() {
        let (assistant, _) = sqlite_assistant();
        let reply = assistant.generate_response("");
        assert_eq!(reply.response, SELF_INTRODUCTION);
        assert_eq!(reply.suggestions, GENERIC_ACTIONS.to_vec());

        let reply = assistant.generate_response("   \n");
        assert_eq!(reply.response, SELF_INTRODUCTION);
    }

    #[test]
    fn test_round_trip_history() {
        let (assistant, _) = sqlite_assistant();
        let sid = assistant.create_session();
        assistant.save_chat_message(&sid, Sender::User, "hi", None);
        assistant.save_chat_message(&sid, Sender::Bot, "hello", None);

        let history = assistant.get_chat_history(&sid);
        assert_eq!(history.len(), 2);
        assert_eq!(
            (history[0].sender, history[0].content.as_str()),
            (Sender::User, "hi")
        );
        assert_eq!(
            (history[1].sender, history[1].content.as_str()),
            (Sender::Bot, "hello")
        );
    }

    #[test]
    fn test_store_catalog_overrides_builtin() {
        let db = Arc::new(Database::in_memory().unwrap());
        let store = SqliteStore::new(db);
        store
            .upsert_knowledge(&[KnowledgeItem::new(
                100,
                "pricing",
                "Rates",
                "Our day rate is fixed.",
                &["rate"],
            )])
            .unwrap();
        let assistant = Assistant::new(Arc::new(store));

        let intent = assistant.detect_intent("What does it cost?");
        let relevant = assistant.find_relevant_knowledge("What does it cost?", &intent);
        assert_eq!(relevant.len(), 1);
        assert_eq!(relevant[0].id, 100);
    }

    #[test]
    fn test_refresh_knowledge_picks_up_new_entries() {
        let (assistant, store) = sqlite_assistant();
        let intent = assistant.detect_intent("hello");
        assistant.find_relevant_knowledge("hello", &intent);

        store
            .upsert_knowledge(&[KnowledgeItem::new(
                200,
                "greeting",
                "Welcome",
                "Welcome to the studio.",
                &["hello"],
            )])
            .unwrap();

        let cached = assistant.find_relevant_knowledge("hello", &intent);
        assert!(cached.iter().all(|k| k.id != 200));

        assistant.refresh_knowledge();
        let fresh = assistant.find_relevant_knowledge("hello", &intent);
        assert_eq!(fresh[0].id, 200);
    }

    // ---- Exchange ----

    #[test]
    fn test_exchange_records_both_messages() {
        let (assistant, _) = sqlite_assistant();
        let reply = assistant.exchange(None, "How long would it take?");
        assert_eq!(reply.intent.intent, "timeline");
        assert!(!reply.response.is_empty());

        let history = assistant.get_chat_history(&reply.session_id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sender, Sender::User);
        assert_eq!(history[0].content, "How long would it take?");
        assert_eq!(history[1].sender, Sender::Bot);
        assert_eq!(history[1].content, reply.response);
        assert_eq!(history[1].suggestions.as_ref(), Some(&reply.suggestions));
    }

    #[test]
    fn test_exchange_reuses_given_session() {
        let (assistant, _) = sqlite_assistant();
        let first = assistant.exchange(None, "hello");
        let second = assistant.exchange(Some(&first.session_id), "What are your prices?");
        assert_eq!(first.session_id, second.session_id);
        assert_eq!(assistant.get_chat_history(&first.session_id).len(), 4);
    }

    #[test]
    fn test_exchange_services_declared_before_timeline() {
        // "website" is a services keyword and services is checked first.
        let (assistant, _) = sqlite_assistant();
        let reply = assistant.exchange(None, "How long does a website take?");
        assert_eq!(reply.intent.intent, "services");
    }

    #[test]
    fn test_exchange_unknown_session_starts_new_one() {
        let (assistant, _) = sqlite_assistant();
        let reply = assistant.exchange(Some("stale-session-from-client"), "What are your prices?");
        assert_ne!(reply.session_id, "stale-session-from-client");

        let history = assistant.get_chat_history(&reply.session_id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "What are your prices?");
        assert_eq!(history[1].content, reply.response);
        assert!(assistant
            .get_chat_history("stale-session-from-client")
            .is_empty());
    }

    #[test]
    fn test_exchange_blank_session_id_creates_one() {
        let (assistant, _) = sqlite_assistant();
        let reply = assistant.exchange(Some(""), "hello");
        assert!(!reply.session_id.is_empty());
        assert_eq!(assistant.get_chat_history(&reply.session_id).len(), 2);
    }

    // ---- Degraded store ----

    #[test]
    fn test_failing_store_never_surfaces_errors() {
        let assistant = Assistant::new(Arc::new(FailingStore));

        let sid = assistant.create_session();
        assert!(!sid.is_empty());
        assert!(sid.starts_with("local-"));

        assistant.save_chat_message(&sid, Sender::User, "hi", None);
        assert!(assistant.get_chat_history(&sid).is_empty());

        let reply = assistant.generate_response("What are your prices?");
        assert!(!reply.response.is_empty());
        let pricing = builtin_catalog()
            .into_iter()
            .find(|k| k.category == "pricing")
            .unwrap();
        assert!(reply.response.contains(&pricing.content));
    }

    #[test]
    fn test_failing_store_exchange_still_replies() {
        let assistant = Assistant::new(Arc::new(FailingStore));
        let reply = assistant.exchange(None, "Can I see your portfolio?");
        assert!(reply.session_id.starts_with("local-"));
        assert_eq!(reply.intent.intent, "portfolio");
        assert!(!reply.response.is_empty());
        assert_eq!(reply.suggestions.len(), 3);
    }

    // ---- Concurrency ----

    #[test]
    fn test_concurrent_exchanges() {
        let (assistant, _) = sqlite_assistant();
        let assistant = Arc::new(assistant);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let assistant = Arc::clone(&assistant);
                thread::spawn(move || assistant.exchange(None, &format!("question {} about pricing", i)))
            })
            .collect();

        for handle in handles {
            let reply = handle.join().unwrap();
            assert_eq!(reply.intent.intent, "pricing");
            assert_eq!(assistant.get_chat_history(&reply.session_id).len(), 2);
        }
    }

    // ---- Boundary helpers ----

    #[test]
    fn test_check_message_length() {
        assert!(check_message_length(&"a".repeat(2000), 2000).is_ok());
        assert!(matches!(
            check_message_length(&"a".repeat(2001), 2000),
            Err(ChatError::MessageTooLong(2000))
        ));
        // Counted in characters, not bytes.
        assert!(check_message_length(&"é".repeat(10), 10).is_ok());
    }

    #[test]
    fn test_parse_sender() {
        assert_eq!(parse_sender("user").unwrap(), Sender::User);
        assert_eq!(parse_sender("bot").unwrap(), Sender::Bot);
        assert!(matches!(
            parse_sender("assistant"),
            Err(ChatError::InvalidSender(s)) if s == "assistant"
        ));
    }
}
