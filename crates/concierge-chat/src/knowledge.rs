//! Knowledge catalog loading with a built-in fallback.
//!
//! The catalog normally comes from the persistent store. When the store is
//! unreachable, returns malformed rows, or has no rows at all, the built-in
//! catalog is used instead so the assistant can always answer.

use std::sync::{Arc, RwLock};

use concierge_core::store::AssistantStore;
use concierge_core::types::KnowledgeItem;

/// Where a loaded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Persistent,
    BuiltIn,
}

/// Loads and optionally caches the knowledge catalog.
///
/// Only catalogs read from the persistent store are cached. A built-in
/// fallback is never cached, so the next call tries the store again.
pub struct KnowledgeStore {
    store: Arc<dyn AssistantStore>,
    cache_enabled: bool,
    cached: RwLock<Option<Arc<Vec<KnowledgeItem>>>>,
}

impl KnowledgeStore {
    pub fn new(store: Arc<dyn AssistantStore>, cache_enabled: bool) -> Self {
        Self {
            store,
            cache_enabled,
            cached: RwLock::new(None),
        }
    }

    /// Fetch the catalog from the store, falling back to the built-in one.
    ///
    /// Always hits the store; never fails.
    pub fn load(&self) -> Vec<KnowledgeItem> {
        self.load_with_source().0
    }

    /// Like [`load`](Self::load), also reporting which catalog was used.
    pub fn load_with_source(&self) -> (Vec<KnowledgeItem>, CatalogSource) {
        match self.store.load_catalog() {
            Ok(items) if !items.is_empty() => {
                tracing::debug!(items = items.len(), "Knowledge catalog loaded");
                (items, CatalogSource::Persistent)
            }
            Ok(_) => {
                tracing::warn!("Knowledge catalog is empty, using built-in catalog");
                (builtin_catalog(), CatalogSource::BuiltIn)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load knowledge catalog, using built-in catalog");
                (builtin_catalog(), CatalogSource::BuiltIn)
            }
        }
    }

    /// The catalog for answering a request, served from cache when possible.
    pub fn catalog(&self) -> Arc<Vec<KnowledgeItem>> {
        if self.cache_enabled {
            if let Ok(guard) = self.cached.read() {
                if let Some(ref items) = *guard {
                    return Arc::clone(items);
                }
            }
        }

        let (items, source) = self.load_with_source();
        let items = Arc::new(items);

        if self.cache_enabled && source == CatalogSource::Persistent {
            if let Ok(mut guard) = self.cached.write() {
                *guard = Some(Arc::clone(&items));
            }
        }

        items
    }

    /// Drop the cached catalog so the next request reloads it.
    pub fn refresh(&self) {
        if let Ok(mut guard) = self.cached.write() {
            *guard = None;
        }
    }
}

// =============================================================================
// Built-in catalog
// =============================================================================

/// The fixed fallback catalog, ordered by category like the store's.
pub fn builtin_catalog() -> Vec<KnowledgeItem> {
    vec![
        KnowledgeItem::new(
            1,
            "assistant",
            "About this assistant",
            "I'm the Brightlane Digital assistant. I can answer questions about our services, \
             pricing, past projects, timelines and how to get in touch with the team.",
            &["assistant", "chatbot", "who are you", "what can you do"],
        ),
        KnowledgeItem::new(
            2,
            "company",
            "About Brightlane Digital",
            "Brightlane Digital is an independent studio of designers and engineers building \
             websites, web applications and mobile apps for growing businesses since 2014.",
            &["company", "about you", "about us", "team", "studio", "experience"],
        ),
        KnowledgeItem::new(
            3,
            "contact",
            "Contact information",
            "You can reach us at hello@brightlane.dev or +1 (555) 014-2290, Monday to Friday \
             9:00-18:00. Messages sent through the contact form get a reply within one business day.",
            &["contact", "email", "phone", "call", "reach", "office", "address"],
        ),
        KnowledgeItem::new(
            4,
            "portfolio",
            "Portfolio highlights",
            "Recent work includes an online store for a regional retailer, a booking app for a \
             chain of clinics, and an operations dashboard for a logistics company. Full case \
             studies are on our portfolio page.",
            &[
                "portfolio",
                "case study",
                "case studies",
                "project",
                "previous work",
                "examples",
                "clients",
            ],
        ),
        KnowledgeItem::new(
            5,
            "pricing",
            "Pricing policy",
            "Every project is quoted individually after a free discovery call. Websites typically \
             start at $5,000, custom web applications at $15,000, and support plans are billed monthly.",
            &["price", "pricing", "cost", "budget", "quote", "how much", "estimate", "rates"],
        ),
        KnowledgeItem::new(
            6,
            "services",
            "Services",
            "We design and develop marketing websites, custom web applications, and mobile apps \
             for iOS and Android, and we offer UI/UX design and ongoing maintenance.",
            &["service", "website", "web app", "mobile", "design", "develop", "maintenance"],
        ),
        KnowledgeItem::new(
            7,
            "technology",
            "Technology stack",
            "Our usual stack is React and Next.js on the front end, Rust and Node.js on the back \
             end, PostgreSQL for data, and managed cloud hosting with automated deployments.",
            &[
                "technology",
                "tech stack",
                "stack",
                "react",
                "rust",
                "framework",
                "database",
                "hosting",
            ],
        ),
        KnowledgeItem::new(
            8,
            "timeline",
            "Project timelines",
            "A marketing website usually takes 4 to 6 weeks from kickoff to launch, while web and \
             mobile applications take 3 to 6 months depending on scope. Milestones are agreed \
             before work starts.",
            &["timeline", "how long", "deadline", "duration", "weeks", "months", "launch"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::error::ConciergeError;
    use concierge_core::types::{ConversationMessage, ConversationSession, Sender};
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Catalog source that can be toggled between failing and serving items.
    struct ToggleStore {
        failing: AtomicBool,
        calls: AtomicUsize,
        items: Vec<KnowledgeItem>,
    }

    impl ToggleStore {
        fn new(failing: bool, items: Vec<KnowledgeItem>) -> Arc<Self> {
            Arc::new(Self {
                failing: AtomicBool::new(failing),
                calls: AtomicUsize::new(0),
                items,
            })
        }
    }

    impl AssistantStore for ToggleStore {
        fn create_session(&self) -> Result<ConversationSession, ConciergeError> {
            Ok(ConversationSession {
                id: "s".to_string(),
                created_at: Utc::now(),
            })
        }
        fn find_session(&self, _: &str) -> Result<Option<ConversationSession>, ConciergeError> {
            Ok(None)
        }
        fn save_message(
            &self,
            _: &str,
            _: Sender,
            _: &str,
            _: Option<&[String]>,
        ) -> Result<(), ConciergeError> {
            Ok(())
        }
        fn get_history(&self, _: &str) -> Result<Vec<ConversationMessage>, ConciergeError> {
            Ok(vec![])
        }
        fn load_catalog(&self) -> Result<Vec<KnowledgeItem>, ConciergeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                Err(ConciergeError::Storage("unreachable".to_string()))
            } else {
                Ok(self.items.clone())
            }
        }
    }

    fn custom_items() -> Vec<KnowledgeItem> {
        vec![KnowledgeItem::new(42, "pricing", "Rates", "Custom rates.", &["rate"])]
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = builtin_catalog();
        assert!(catalog.len() >= 7);

        let ids: HashSet<_> = catalog.iter().map(|k| k.id).collect();
        assert_eq!(ids.len(), catalog.len());

        let categories: Vec<_> = catalog.iter().map(|k| k.category.clone()).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);

        for category in ["company", "services", "pricing", "portfolio", "contact", "technology", "assistant"] {
            assert!(categories.iter().any(|c| c == category), "missing {}", category);
        }
        assert!(catalog.iter().all(|k| !k.content.is_empty() && !k.keywords.is_empty()));
    }

    #[test]
    fn test_load_from_store() {
        let store = ToggleStore::new(false, custom_items());
        let knowledge = KnowledgeStore::new(store, true);
        let (items, source) = knowledge.load_with_source();
        assert_eq!(source, CatalogSource::Persistent);
        assert_eq!(items, custom_items());
    }

    #[test]
    fn test_load_failure_uses_builtin() {
        let store = ToggleStore::new(true, custom_items());
        let knowledge = KnowledgeStore::new(store, true);
        let (items, source) = knowledge.load_with_source();
        assert_eq!(source, CatalogSource::BuiltIn);
        assert_eq!(items, builtin_catalog());
    }

    #[test]
    fn test_empty_store_uses_builtin() {
        let store = ToggleStore::new(false, vec![]);
        let knowledge = KnowledgeStore::new(store, false);
        assert_eq!(knowledge.load(), builtin_catalog());
    }

    #[test]
    fn test_load_retries_after_fallback() {
        let store = ToggleStore::new(true, custom_items());
        let knowledge = KnowledgeStore::new(store.clone(), true);
        assert_eq!(knowledge.load(), builtin_catalog());

        store.failing.store(false, Ordering::SeqCst);
        assert_eq!(knowledge.load(), custom_items());
    }

    #[test]
    fn test_catalog_caches_persistent_load() {
        let store = ToggleStore::new(false, custom_items());
        let knowledge = KnowledgeStore::new(store.clone(), true);
        knowledge.catalog();
        knowledge.catalog();
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);

        knowledge.refresh();
        knowledge.catalog();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_catalog_does_not_cache_fallback() {
        let store = ToggleStore::new(true, custom_items());
        let knowledge = KnowledgeStore::new(store.clone(), true);
        assert_eq!(*knowledge.catalog(), builtin_catalog());

        store.failing.store(false, Ordering::SeqCst);
        assert_eq!(*knowledge.catalog(), custom_items());
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_catalog_without_cache_always_loads() {
        let store = ToggleStore::new(false, custom_items());
        let knowledge = KnowledgeStore::new(store.clone(), false);
        knowledge.catalog();
        knowledge.catalog();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }
}
