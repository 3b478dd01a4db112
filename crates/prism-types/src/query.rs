//! Key paths into nested documents.

use std::fmt;

/// A path of key segments addressing a value inside a [`Document`].
///
/// An empty query addresses nothing.
///
/// [`Document`]: crate::Document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DataQuery {
    segments: Vec<String>,
}

impl DataQuery {
    /// Builds a query from individual segments.
    pub fn of<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a dotted path (`"a.b.c"`). Empty segments are skipped.
    pub fn parse(path: &str) -> Self {
        Self::of(path.split('.').filter(|s| !s.is_empty()))
    }

    /// Returns a new query with `segment` appended.
    pub fn then(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Splits the query into its parent path and final key.
    pub(crate) fn split_last(&self) -> Option<(&String, &[String])> {
        self.segments.split_last()
    }
}

impl fmt::Display for DataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for DataQuery {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<&DataQuery> for DataQuery {
    fn from(query: &DataQuery) -> Self {
        query.clone()
    }
}

impl<const N: usize> From<[&str; N]> for DataQuery {
    fn from(segments: [&str; N]) -> Self {
        Self::of(segments)
    }
}
