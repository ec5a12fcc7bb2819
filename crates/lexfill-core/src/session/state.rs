//! Session state types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a fill session.
///
/// ```text
/// Uninitialized ──upload──▶ Collecting ──last answer──▶ Complete ──render──▶ Rendered
///        └────────upload (no placeholders)───────────────▶┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// No document has been uploaded yet.
    #[default]
    Uninitialized,
    /// Waiting for the answer to the active placeholder.
    Collecting,
    /// Every placeholder has an answer; rendering is unlocked.
    Complete,
    /// The filled document has been produced at least once.
    Rendered,
}

impl SessionState {
    /// True once rendering is allowed.
    pub fn can_render(&self) -> bool {
        matches!(self, Self::Complete | Self::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_labels() {
        assert_eq!(SessionState::Uninitialized.to_string(), "uninitialized");
        assert_eq!(SessionState::Collecting.to_string(), "collecting");
        assert_eq!(SessionState::from_str("complete").unwrap(), SessionState::Complete);
    }

    #[test]
    fn test_can_render() {
        assert!(!SessionState::Uninitialized.can_render());
        assert!(!SessionState::Collecting.can_render());
        assert!(SessionState::Complete.can_render());
        assert!(SessionState::Rendered.can_render());
    }
}
