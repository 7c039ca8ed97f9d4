//! Keystroke event model.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// A key as reported by the platform's key name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A single printable character.
    Char(char),
    Enter,
    Tab,
    /// Any other named key (`Shift`, `ArrowLeft`, `F5`, ...).
    Named(String),
}

impl Key {
    /// Parse a platform key name.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockscan_wedge::Key;
    ///
    /// assert_eq!(Key::from_name("7"), Key::Char('7'));
    /// assert_eq!(Key::from_name("Enter"), Key::Enter);
    /// assert_eq!(Key::from_name("Shift"), Key::Named("Shift".into()));
    /// ```
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Self::Char(c),
            _ => match name {
                "Enter" => Self::Enter,
                "Tab" => Self::Tab,
                other => Self::Named(other.to_string()),
            },
        }
    }
}

/// Modifier keys held during a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        meta: false,
        shift: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Whether a shortcut modifier is held. Shift alone is just a
    /// capital letter.
    pub fn is_shortcut(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Kind of element holding keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// Document body or another non-editable element.
    #[default]
    Body,
    Input,
    TextArea,
    Select,
    ContentEditable,
}

impl FocusTarget {
    /// Whether typing here is ordinary text entry that the decoder must not
    /// intercept.
    pub fn is_text_entry(&self) -> bool {
        !matches!(self, Self::Body)
    }
}

/// One keydown event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub target: FocusTarget,
    pub at: Instant,
}

impl KeyEvent {
    /// Unmodified key on the document body.
    pub fn new(key: Key, at: Instant) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            target: FocusTarget::Body,
            at,
        }
    }

    /// Unmodified key parsed from a platform key name.
    pub fn named(name: &str, at: Instant) -> Self {
        Self::new(Key::from_name(name), at)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_target(mut self, target: FocusTarget) -> Self {
        self.target = target;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a", Key::Char('a'))]
    #[case("*", Key::Char('*'))]
    #[case(" ", Key::Char(' '))]
    #[case("Enter", Key::Enter)]
    #[case("Tab", Key::Tab)]
    #[case("Escape", Key::Named("Escape".into()))]
    #[case("", Key::Named(String::new()))]
    #[case("\n", Key::Named("\n".into()))]
    fn test_key_from_name(#[case] name: &str, #[case] expected: Key) {
        assert_eq!(Key::from_name(name), expected);
    }

    #[test]
    fn test_shift_is_not_shortcut() {
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert!(!shift.is_shortcut());
        assert!(Modifiers::CTRL.is_shortcut());
        assert!(Modifiers::ALT.is_shortcut());
        assert!(Modifiers::META.is_shortcut());
    }

    #[test]
    fn test_text_entry_targets() {
        assert!(!FocusTarget::Body.is_text_entry());
        assert!(FocusTarget::Input.is_text_entry());
        assert!(FocusTarget::TextArea.is_text_entry());
        assert!(FocusTarget::Select.is_text_entry());
        assert!(FocusTarget::ContentEditable.is_text_entry());
    }
}
