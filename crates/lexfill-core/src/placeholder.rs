//! Placeholder identity and the ordered placeholder sequence of a template.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// A named fillable slot defined by an uploaded template.
///
/// The name is opaque to the session logic: it is compared for equality and
/// handed to the phrasing and rendering collaborators unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placeholder(String);

impl Placeholder {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-facing label: underscores introduced by template conversion
    /// are shown as spaces again.
    pub fn label(&self) -> String {
        self.0.replace('_', " ").trim().to_string()
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Placeholder {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Placeholder {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Placeholder {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Placeholder {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The ordered, duplicate-free placeholder list of one session.
///
/// Fixed at upload time. Construction keeps the first occurrence of each
/// name and drops later repeats, so template order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Placeholder>", into = "Vec<Placeholder>")]
pub struct PlaceholderSequence(Vec<Placeholder>);

impl PlaceholderSequence {
    pub fn new<I, P>(placeholders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Placeholder>,
    {
        let mut seen = HashSet::new();
        let ordered = placeholders
            .into_iter()
            .map(Into::into)
            .filter(|placeholder: &Placeholder| seen.insert(placeholder.clone()))
            .collect();
        Self(ordered)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|placeholder| placeholder.as_str() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Placeholder> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Placeholder] {
        &self.0
    }
}

impl From<Vec<Placeholder>> for PlaceholderSequence {
    fn from(placeholders: Vec<Placeholder>) -> Self {
        Self::new(placeholders)
    }
}

impl From<PlaceholderSequence> for Vec<Placeholder> {
    fn from(sequence: PlaceholderSequence) -> Self {
        sequence.0
    }
}

impl<'a> IntoIterator for &'a PlaceholderSequence {
    type Item = &'a Placeholder;
    type IntoIter = std::slice::Iter<'a, Placeholder>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
