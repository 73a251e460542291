//! Reply composition for classified messages.
//!
//! Composes answers from hand-written intent templates and the retrieved
//! knowledge entries without requiring an LLM.

use concierge_core::types::{IntentResult, KnowledgeItem};

use crate::classifier::GENERIC_ACTIONS;
use crate::types::ComposedReply;

/// Number of leading characters of the top entry checked against the reply.
const SURFACE_PREFIX_CHARS: usize = 50;

/// Reply used when nothing more specific is available.
pub const SELF_INTRODUCTION: &str = "Hi! I'm the Brightlane Digital assistant. I can tell you \
     about our services, pricing, past projects, project timelines and how to reach our team. \
     What would you like to know?";

// =============================================================================
// Templates
// =============================================================================

struct Template {
    intent: &'static str,
    response: &'static str,
    suggestions: [&'static str; 3],
}

const TEMPLATES: &[Template] = &[
    Template {
        intent: "pricing",
        response: "Our pricing depends on the scope of your project. Every engagement starts \
             with a free consultation, after which we send a detailed fixed-price quote with \
             no hidden costs.",
        suggestions: ["Schedule a consultation", "Request a quote", "View service packages"],
    },
    Template {
        intent: "services",
        response: "We help businesses plan, design and build their digital products, from \
             marketing websites to custom web and mobile applications, and we keep them \
             running after launch.",
        suggestions: ["Explore our services", "View our portfolio", "Schedule a consultation"],
    },
    Template {
        intent: "timeline",
        response: "Timelines depend on scope, but we always agree on milestones and a launch \
             date before any work starts, and you get progress updates every week.",
        suggestions: ["Schedule a consultation", "Discuss your deadline", "Explore our services"],
    },
    Template {
        intent: "portfolio",
        response: "We're proud of the projects we've delivered for clients across retail, \
             healthcare and logistics. Here is a quick overview of our recent work.",
        suggestions: ["View case studies", "Explore our services", "Contact us"],
    },
    Template {
        intent: "technology",
        response: "We pick proven, well-supported technologies so your product is fast, secure \
             and easy to maintain long after launch.",
        suggestions: ["Explore our services", "View our portfolio", "Talk to an engineer"],
    },
    Template {
        intent: "contact",
        response: "We'd love to hear from you! Our team answers every message personally.",
        suggestions: ["Send us a message", "Schedule a consultation", "View our office hours"],
    },
    Template {
        intent: "support",
        response: "Sorry to hear something isn't working. Existing clients can open a support \
             request and our maintenance team will get back to you within one business day.",
        suggestions: ["Open a support request", "Contact us", "View maintenance plans"],
    },
    Template {
        intent: "greeting",
        response: SELF_INTRODUCTION,
        suggestions: ["Explore our services", "View our portfolio", "Contact us"],
    },
];

// =============================================================================
// ResponseComposer
// =============================================================================

/// Turns an intent and its retrieved knowledge into a reply.
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    pub fn new() -> Self {
        Self
    }

    /// Compose the reply for a classified message.
    ///
    /// The first relevant entry is always surfaced: if its opening is not
    /// already part of the reply, its full content is appended.
    pub fn compose(
        &self,
        _message: &str,
        intent: &IntentResult,
        relevant: &[KnowledgeItem],
    ) -> ComposedReply {
        let (mut response, suggestions) = match template_for(&intent.intent) {
            Some(t) => (
                t.response.to_string(),
                t.suggestions.iter().map(|s| s.to_string()).collect(),
            ),
            None => (
                general_response(relevant),
                GENERIC_ACTIONS.iter().map(|s| s.to_string()).collect(),
            ),
        };

        if let Some(top) = relevant.first() {
            let prefix: String = top.content.chars().take(SURFACE_PREFIX_CHARS).collect();
            if !prefix.is_empty() && !response.contains(&prefix) {
                response.push(' ');
                response.push_str(&top.content);
            }
        }

        if response.trim().is_empty() {
            response = SELF_INTRODUCTION.to_string();
        }

        ComposedReply {
            response,
            suggestions,
        }
    }
}

fn template_for(intent: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.intent == intent)
}

fn general_response(relevant: &[KnowledgeItem]) -> String {
    if relevant.is_empty() {
        return SELF_INTRODUCTION.to_string();
    }
    relevant
        .iter()
        .map(|k| k.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Tests
// =============================================================================
