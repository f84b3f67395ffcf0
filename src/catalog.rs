//! Static trigger -> response lookup table
//!
//! A catalog is built once at startup and shared read-only by every session.
//! Substring entries are tested in declaration order and the first match
//! wins, so entry order is part of a catalog's behavior.

mod error;
mod file;
mod presets;

pub use error::CatalogError;
pub use file::{load_catalog, CatalogFile, SubstringDef};
pub use presets::CatalogPreset;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Exact entry resolved when the user confirms an unmatched query
pub const DEFAULT_ASSUMED_INTENT: &str = "Admission Process";

/// Reply for a quick action with no exact entry
pub const DEFAULT_PENDING_INFO: &str = "I'll get that information for you shortly.";

/// Reply when the user rejects the assumed intent
pub const DEFAULT_REPHRASE: &str =
    "I apologize for the confusion. Could you please rephrase your question?";

/// A button the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    /// Exact-entry key sent when the button is pressed
    pub trigger: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SubstringEntry {
    /// Always lower-case
    trigger: String,
    response: String,
}

/// Immutable lookup table of canned responses
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    quick_actions: Vec<QuickAction>,
    exact_entries: HashMap<String, String>,
    substring_entries: Vec<SubstringEntry>,
    fallback_text: String,
    fallback_is_confirmation_prompt: bool,
    assumed_intent: String,
    pending_info_text: String,
    rephrase_text: String,
    greeting: Option<String>,
}

impl ResponseCatalog {
    pub fn builder(fallback_text: impl Into<String>) -> CatalogBuilder {
        CatalogBuilder::new(fallback_text)
    }

    /// Case-sensitive lookup of a full trigger (quick-action buttons)
    pub fn lookup_exact(&self, trigger: &str) -> Option<&str> {
        self.exact_entries.get(trigger).map(String::as_str)
    }

    /// First substring entry contained in the lower-cased query
    pub fn lookup_by_substring(&self, query: &str) -> Option<&str> {
        let query = query.to_lowercase();
        self.substring_entries
            .iter()
            .find(|entry| query.contains(entry.trigger.as_str()))
            .map(|entry| entry.response.as_str())
    }

    pub fn quick_actions(&self) -> &[QuickAction] {
        &self.quick_actions
    }

    /// Substring `(trigger, response)` pairs in declaration order
    pub fn substring_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.substring_entries
            .iter()
            .map(|e| (e.trigger.as_str(), e.response.as_str()))
    }

    pub fn fallback_text(&self) -> &str {
        &self.fallback_text
    }

    pub fn fallback_is_confirmation_prompt(&self) -> bool {
        self.fallback_is_confirmation_prompt
    }

    pub fn assumed_intent(&self) -> &str {
        &self.assumed_intent
    }

    pub fn pending_info_text(&self) -> &str {
        &self.pending_info_text
    }

    pub fn rephrase_text(&self) -> &str {
        &self.rephrase_text
    }

    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }
}

/// Builder that validates a catalog before it can be used
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    quick_actions: Vec<QuickAction>,
    exact_entries: Vec<(String, String)>,
    substring_entries: Vec<(String, String)>,
    fallback_text: String,
    fallback_is_confirmation_prompt: bool,
    assumed_intent: String,
    pending_info_text: String,
    rephrase_text: String,
    greeting: Option<String>,
}

impl CatalogBuilder {
    fn new(fallback_text: impl Into<String>) -> Self {
        Self {
            quick_actions: Vec::new(),
            exact_entries: Vec::new(),
            substring_entries: Vec::new(),
            fallback_text: fallback_text.into(),
            fallback_is_confirmation_prompt: true,
            assumed_intent: DEFAULT_ASSUMED_INTENT.to_string(),
            pending_info_text: DEFAULT_PENDING_INFO.to_string(),
            rephrase_text: DEFAULT_REPHRASE.to_string(),
            greeting: None,
        }
    }

    pub fn quick_action(mut self, label: impl Into<String>, trigger: impl Into<String>) -> Self {
        self.quick_actions.push(QuickAction {
            label: label.into(),
            trigger: trigger.into(),
        });
        self
    }

    pub fn exact(mut self, trigger: impl Into<String>, response: impl Into<String>) -> Self {
        self.exact_entries.push((trigger.into(), response.into()));
        self
    }

    pub fn substring(mut self, trigger: impl Into<String>, response: impl Into<String>) -> Self {
        self.substring_entries.push((trigger.into(), response.into()));
        self
    }

    /// Whether an unmatched free-text query asks the user to confirm the
    /// assumed intent
    pub fn fallback_is_confirmation_prompt(mut self, enabled: bool) -> Self {
        self.fallback_is_confirmation_prompt = enabled;
        self
    }

    pub fn assumed_intent(mut self, key: impl Into<String>) -> Self {
        self.assumed_intent = key.into();
        self
    }

    pub fn pending_info(mut self, text: impl Into<String>) -> Self {
        self.pending_info_text = text.into();
        self
    }

    pub fn rephrase(mut self, text: impl Into<String>) -> Self {
        self.rephrase_text = text.into();
        self
    }

    pub fn greeting(mut self, text: impl Into<String>) -> Self {
        self.greeting = Some(text.into());
        self
    }

    pub fn build(self) -> Result<ResponseCatalog, CatalogError> {
        let mut substring_entries: Vec<SubstringEntry> =
            Vec::with_capacity(self.substring_entries.len());
        for (trigger, response) in self.substring_entries {
            let trigger = trigger.to_lowercase();
            if trigger.trim().is_empty() {
                return Err(CatalogError::EmptyTrigger);
            }
            if let Some(earlier) = substring_entries
                .iter()
                .find(|e| trigger.contains(e.trigger.as_str()))
            {
                return Err(CatalogError::UnreachableEntry {
                    trigger,
                    shadowed_by: earlier.trigger.clone(),
                });
            }
            substring_entries.push(SubstringEntry { trigger, response });
        }

        let mut exact_entries = HashMap::with_capacity(self.exact_entries.len());
        for (trigger, response) in self.exact_entries {
            if trigger.trim().is_empty() {
                return Err(CatalogError::EmptyTrigger);
            }
            if exact_entries.contains_key(&trigger) {
                return Err(CatalogError::DuplicateTrigger(trigger));
            }
            exact_entries.insert(trigger, response);
        }

        if self.fallback_is_confirmation_prompt
            && !exact_entries.contains_key(&self.assumed_intent)
        {
            return Err(CatalogError::UnknownAssumedIntent(self.assumed_intent));
        }

        for action in &self.quick_actions {
            if action.trigger.trim().is_empty() {
                return Err(CatalogError::EmptyTrigger);
            }
            if !exact_entries.contains_key(&action.trigger) {
                tracing::warn!(
                    label = %action.label,
                    trigger = %action.trigger,
                    "Quick action has no exact entry, it will get the pending-info reply"
                );
            }
        }

        Ok(ResponseCatalog {
            quick_actions: self.quick_actions,
            exact_entries,
            substring_entries,
            fallback_text: self.fallback_text,
            fallback_is_confirmation_prompt: self.fallback_is_confirmation_prompt,
            assumed_intent: self.assumed_intent,
            pending_info_text: self.pending_info_text,
            rephrase_text: self.rephrase_text,
            greeting: self.greeting,
        })
    }
}
