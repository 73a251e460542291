//! Keyword-based intent classification.
//!
//! Maps a visitor's message to a coarse intent label. Definitions are
//! scanned in declaration order and the first one with any keyword present
//! wins, so a message touching two topics is classified as the earlier one.
//! There is no scoring between definitions.

use concierge_core::types::IntentResult;

/// Confidence reported when a definition matched.
pub const MATCHED_CONFIDENCE: f32 = 0.9;
/// Confidence reported for the `general` fallback.
pub const FALLBACK_CONFIDENCE: f32 = 0.5;
/// Label used when no definition matches.
pub const GENERAL_INTENT: &str = "general";

/// Actions offered when nothing specific was recognized.
pub const GENERIC_ACTIONS: [&str; 3] = ["Explore our services", "View our portfolio", "Contact us"];

// =============================================================================
// Intent definitions
// =============================================================================

/// One entry of the ordered intent table.
#[derive(Debug, Clone)]
pub struct IntentDefinition {
    /// Lower-case substrings that trigger this intent.
    pub keywords: Vec<String>,
    pub label: String,
    pub actions: Vec<String>,
}

impl IntentDefinition {
    pub fn new(label: &str, keywords: &[&str], actions: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            label: label.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Built-in intent table, in match priority order.
pub fn default_definitions() -> Vec<IntentDefinition> {
    vec![
        IntentDefinition::new(
            "pricing",
            &[
                "price", "pricing", "cost", "budget", "quote", "how much", "estimate", "rates",
            ],
            &["Schedule a consultation", "Request a quote", "View service packages"],
        ),
        IntentDefinition::new(
            "services",
            &[
                "service", "website", "web app", "mobile app", "design", "develop", "maintenance",
            ],
            &["Explore our services", "View our portfolio", "Schedule a consultation"],
        ),
        IntentDefinition::new(
            "timeline",
            &[
                "timeline", "how long", "deadline", "duration", "turnaround", "when can you start",
            ],
            &["Schedule a consultation", "Discuss your deadline", "Explore our services"],
        ),
        IntentDefinition::new(
            "portfolio",
            &[
                "portfolio", "case study", "case studies", "project", "previous work", "examples",
                "clients",
            ],
            &["View case studies", "Explore our services", "Contact us"],
        ),
        IntentDefinition::new(
            "technology",
            &[
                "technology", "technologies", "tech stack", "stack", "react", "rust", "framework",
                "programming",
            ],
            &["Explore our services", "View our portfolio", "Talk to an engineer"],
        ),
        IntentDefinition::new(
            "contact",
            &["contact", "email", "phone", "call", "reach", "office", "address", "talk to"],
            &["Send us a message", "Schedule a consultation", "View our office hours"],
        ),
        IntentDefinition::new(
            "support",
            &["support", "help", "problem", "issue", "bug", "broken", "not working"],
            &["Open a support request", "Contact us", "View maintenance plans"],
        ),
        IntentDefinition::new(
            "greeting",
            &[
                "hello", "good morning", "good afternoon", "good evening", "greetings", "hey there",
            ],
            &["Explore our services", "View our portfolio", "Contact us"],
        ),
    ]
}

// =============================================================================
// IntentClassifier
// =============================================================================

/// First-match keyword classifier. Pure: the same input always yields the
/// same result.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    definitions: Vec<IntentDefinition>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier with the built-in intent table.
    pub fn new() -> Self {
        Self::with_definitions(default_definitions())
    }

    /// Create a classifier over a custom, ordered intent table.
    pub fn with_definitions(definitions: Vec<IntentDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[IntentDefinition] {
        &self.definitions
    }

    /// Classify a raw message.
    pub fn detect_intent(&self, message: &str) -> IntentResult {
        let normalized = message.to_lowercase();

        for def in &self.definitions {
            let matched: Vec<String> = def
                .keywords
                .iter()
                .filter(|kw| !kw.is_empty() && normalized.contains(kw.as_str()))
                .cloned()
                .collect();

            if !matched.is_empty() {
                return IntentResult {
                    intent: def.label.clone(),
                    confidence: MATCHED_CONFIDENCE,
                    matched_entities: matched,
                    suggested_actions: def.actions.clone(),
                };
            }
        }

        Self::fallback()
    }

    /// The `general` result returned when no definition matches.
    pub fn fallback() -> IntentResult {
        IntentResult {
            intent: GENERAL_INTENT.to_string(),
            confidence: FALLBACK_CONFIDENCE,
            matched_entities: vec![],
            suggested_actions: GENERIC_ACTIONS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
