//! Deserialisable filter configuration.

use serde::Deserialize;
use thiserror::Error;

use crate::rules::{FilterList, FilterRules};

/// The `[filters]` configuration table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterConfig {
    /// Rules keyed by cause identity (player uuid or name, entity type,
    /// world name).
    #[serde(default)]
    pub sources: RuleConfig,

    /// Rules keyed by block type.
    #[serde(default)]
    pub blocks: RuleConfig,
}

/// Raw allow/deny entries for one rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub allow: Vec<String>,

    #[serde(default)]
    pub deny: Vec<String>,
}

/// Errors found while compiling filter configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterConfigError {
    /// A rule entry was empty or whitespace.
    #[error("empty entry in filters.{list}")]
    EmptyEntry {
        /// Which list held the entry, e.g. `blocks.deny`.
        list: String,
    },
}

impl RuleConfig {
    fn compile(&self, name: &str) -> Result<FilterRules, FilterConfigError> {
        check_entries(&self.allow, &format!("{name}.allow"))?;
        check_entries(&self.deny, &format!("{name}.deny"))?;
        Ok(FilterRules::new(
            self.allow.iter().map(String::as_str),
            self.deny.iter().map(String::as_str),
        ))
    }
}

fn check_entries(entries: &[String], list: &str) -> Result<(), FilterConfigError> {
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(FilterConfigError::EmptyEntry {
            list: list.to_string(),
        });
    }
    Ok(())
}

impl FilterConfig {
    /// Compiles the configuration into an immutable [`FilterList`].
    ///
    /// # Errors
    ///
    /// Returns `FilterConfigError::EmptyEntry` if any entry is blank.
    pub fn compile(&self) -> Result<FilterList, FilterConfigError> {
        let list = FilterList::new(
            self.sources.compile("sources")?,
            self.blocks.compile("blocks")?,
        );
        tracing::debug!(
            source_allow = self.sources.allow.len(),
            source_deny = self.sources.deny.len(),
            block_allow = self.blocks.allow.len(),
            block_deny = self.blocks.deny.len(),
            "compiled filter list"
        );
        Ok(list)
    }
}
