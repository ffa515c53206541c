//! Slug rules and their compiled, request-scoped form.

use crate::errors::{CoreError, Result};
use crate::models::Scope;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Metadata key holding a displaced item's original slug.
pub const DEFAULT_META_KEY: &str = "_trashed_original_slug";

/// Host constants that decide which items compete for a slug.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugRules {
    pub attachment_type: String,
    pub hierarchical_types: Vec<String>,
    /// Hierarchical types whose trashed items are never reclaimed.
    pub ignored_hierarchical_types: Vec<String>,
    /// Slugs the host routes itself (feed endpoints).
    pub reserved_slugs: Vec<String>,
    pub pagination_base: String,
    pub meta_key: String,
}

impl Default for SlugRules {
    fn default() -> Self {
        Self {
            attachment_type: "attachment".to_string(),
            hierarchical_types: vec!["page".to_string()],
            ignored_hierarchical_types: vec!["nav_menu_item".to_string()],
            reserved_slugs: ["feed", "rdf", "rss", "rss2", "atom"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pagination_base: "page".to_string(),
            meta_key: DEFAULT_META_KEY.to_string(),
        }
    }
}

impl SlugRules {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let rules: Self = toml::from_str(input)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| CoreError::io(path, err))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.attachment_type.trim().is_empty() {
            return Err(CoreError::invalid_config("attachment_type must not be empty"));
        }
        if self.meta_key.trim().is_empty() {
            return Err(CoreError::invalid_config("meta_key must not be empty"));
        }
        if self.hierarchical_types.contains(&self.attachment_type) {
            return Err(CoreError::invalid_config(format!(
                "`{}` cannot be both the attachment type and hierarchical",
                self.attachment_type
            )));
        }
        Ok(())
    }
}

/// Rules compiled once per request scope and passed explicitly to the guard.
#[derive(Debug, Clone)]
pub struct ScopeContext {
    rules: SlugRules,
    hierarchical: BTreeSet<String>,
    pagination: Regex,
}

impl ScopeContext {
    pub fn new(rules: SlugRules) -> Result<Self> {
        rules.validate()?;
        let pagination = Regex::new(&format!(
            r"^(?:{})?\d+$",
            regex::escape(&rules.pagination_base)
        ))?;
        let hierarchical = rules.hierarchical_types.iter().cloned().collect();
        Ok(Self {
            rules,
            hierarchical,
            pagination,
        })
    }

    pub fn rules(&self) -> &SlugRules {
        &self.rules
    }

    pub fn meta_key(&self) -> &str {
        &self.rules.meta_key
    }

    pub fn classify(&self, content_type: &str) -> Scope {
        if content_type == self.rules.attachment_type {
            Scope::Attachment
        } else if self.hierarchical.contains(content_type) {
            Scope::Hierarchical
        } else {
            Scope::Flat
        }
    }

    pub fn hierarchical_types(&self) -> Vec<String> {
        self.hierarchical.iter().cloned().collect()
    }

    pub fn is_ignored(&self, content_type: &str) -> bool {
        self.rules
            .ignored_hierarchical_types
            .iter()
            .any(|t| t == content_type)
    }

    /// Slugs the host would never hand out in the given scope.
    pub fn is_reserved(&self, scope: Scope, slug: &str) -> bool {
        let feed = self.rules.reserved_slugs.iter().any(|s| s == slug);
        match scope {
            Scope::Hierarchical => feed || self.pagination.is_match(slug),
            Scope::Attachment | Scope::Flat => feed,
        }
    }
}
