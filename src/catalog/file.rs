//! JSON catalog files

use super::{CatalogError, QuickAction, ResponseCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One ordered substring entry in a catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstringDef {
    pub trigger: String,
    pub response: String,
}

/// On-disk catalog layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub quick_actions: Vec<QuickAction>,
    #[serde(default)]
    pub exact: BTreeMap<String, String>,
    /// Tested in file order
    #[serde(default)]
    pub substring: Vec<SubstringDef>,
    pub fallback: String,
    #[serde(default = "default_confirmation_fallback")]
    pub fallback_is_confirmation_prompt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumed_intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rephrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

fn default_confirmation_fallback() -> bool {
    true
}

impl CatalogFile {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_catalog(self) -> Result<ResponseCatalog, CatalogError> {
        let mut builder = ResponseCatalog::builder(self.fallback)
            .fallback_is_confirmation_prompt(self.fallback_is_confirmation_prompt);

        for action in self.quick_actions {
            builder = builder.quick_action(action.label, action.trigger);
        }
        for (trigger, response) in self.exact {
            builder = builder.exact(trigger, response);
        }
        for entry in self.substring {
            builder = builder.substring(entry.trigger, entry.response);
        }
        if let Some(key) = self.assumed_intent {
            builder = builder.assumed_intent(key);
        }
        if let Some(text) = self.pending_info {
            builder = builder.pending_info(text);
        }
        if let Some(text) = self.rephrase {
            builder = builder.rephrase(text);
        }
        if let Some(text) = self.greeting {
            builder = builder.greeting(text);
        }

        builder.build()
    }
}

/// Read, parse and validate a catalog file
pub fn load_catalog(path: &Path) -> Result<ResponseCatalog, CatalogError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = CatalogFile::from_json(&json)?.into_catalog()?;
    tracing::info!(
        path = %path.display(),
        quick_actions = catalog.quick_actions().len(),
        "Loaded catalog file"
    );
    Ok(catalog)
}
