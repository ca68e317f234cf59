//! Screen trait and screen identifier enum.

use std::fmt;

/// Identifies each primary screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Full roster view with the signup form.
    #[default]
    Roster, // 1
    /// Per-student membership lookup.
    Lookup, // 2
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Roster, Self::Lookup];

    /// Numeric key for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Roster => 1,
            Self::Lookup => 2,
        }
    }

    /// Screen from a numeric key. Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Roster),
            2 => Some(Self::Lookup),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Roster => "Roster",
            Self::Lookup => "My Activities",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
