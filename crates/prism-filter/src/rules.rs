//! Compiled rule sets and the filter gate.

use std::collections::HashSet;

/// Something that can be matched against source rules.
///
/// A source may answer to several keys (a player by unique id and by name).
pub trait SourceIdentity {
    fn filter_keys(&self) -> Vec<&str>;
}

impl SourceIdentity for str {
    fn filter_keys(&self) -> Vec<&str> {
        vec![self]
    }
}

impl SourceIdentity for String {
    fn filter_keys(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

/// A compiled set of case-insensitive patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PatternSet {
    exact: HashSet<String>,
    prefixes: Vec<String>,
}

impl PatternSet {
    fn compile<'a>(entries: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = Self::default();
        for entry in entries {
            let entry = entry.trim().to_lowercase();
            match entry.strip_suffix('*') {
                Some(prefix) => set.prefixes.push(prefix.to_string()),
                None => {
                    set.exact.insert(entry);
                }
            }
        }
        set
    }

    fn matches(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.exact.contains(&value) || self.prefixes.iter().any(|p| value.starts_with(p))
    }
}

/// One allow/deny rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRules {
    allow: PatternSet,
    deny: PatternSet,
}

impl FilterRules {
    /// Compiles allow and deny entries into a rule set.
    pub fn new<'a>(
        allow: impl IntoIterator<Item = &'a str>,
        deny: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            allow: PatternSet::compile(allow),
            deny: PatternSet::compile(deny),
        }
    }

    /// A rule set that permits everything.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Returns whether a value answering to `keys` passes this rule set.
    ///
    /// An explicit allow on any key wins over a deny on any key.
    pub fn allows_any(&self, keys: &[&str]) -> bool {
        if keys.iter().any(|k| self.allow.matches(k)) {
            return true;
        }
        !keys.iter().any(|k| self.deny.matches(k))
    }

    pub fn allows(&self, key: &str) -> bool {
        self.allows_any(&[key])
    }
}

/// The filter gate consulted for every finished record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterList {
    sources: FilterRules,
    blocks: FilterRules,
}

impl FilterList {
    pub fn new(sources: FilterRules, blocks: FilterRules) -> Self {
        Self { sources, blocks }
    }

    /// A list with no rules; every record passes.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Returns whether records caused by `source` may be recorded.
    pub fn allows_source(&self, source: &(impl SourceIdentity + ?Sized)) -> bool {
        self.sources.allows_any(&source.filter_keys())
    }

    /// Returns whether a record touching `block_type` may be recorded.
    ///
    /// Records without a block type always pass.
    pub fn allows_block(&self, block_type: Option<&str>) -> bool {
        match block_type {
            Some(block_type) => self.blocks.allows(block_type),
            None => true,
        }
    }
}
