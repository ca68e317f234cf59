// Wire types for the sign-up service API, plus the availability
// classification the client renders from.
//
// The catalog is an ordered mapping: the service reports activities in
// a deliberate order and both the roster view and the signup selector
// must preserve it, hence `IndexMap` rather than `HashMap`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Full activity catalog from `GET /activities`, keyed by activity name.
pub type Catalog = IndexMap<String, Activity>;

/// Reduced per-student view from `GET /my-activities`, keyed by activity name.
pub type MyActivities = IndexMap<String, ActivitySummary>;

/// One sign-up-able activity as reported by the service.
///
/// The participant list is ordered; the service's order is the render
/// order. Everything here is a read snapshot — the client never mutates
/// an `Activity`, it re-fetches the whole catalog instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl Activity {
    /// Remaining capacity. Saturates at zero if the service ever
    /// reports more participants than `max_participants`.
    pub fn spots_left(&self) -> u32 {
        let enrolled = u32::try_from(self.participants.len()).unwrap_or(u32::MAX);
        self.max_participants.saturating_sub(enrolled)
    }

    /// Availability tier for rendering.
    pub fn availability(&self) -> Availability {
        Availability::classify(self.max_participants, self.participants.len())
    }

    /// Whether this activity belongs in the signup selector.
    /// Strictly positive remaining capacity; full activities are shown
    /// in the roster but never offered for signup.
    pub fn is_selectable(&self) -> bool {
        self.spots_left() > 0
    }
}

/// Reduced activity view returned by the membership lookup.
///
/// Unknown fields are ignored, so a server that answers with the full
/// activity object still decodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub description: String,
    pub schedule: String,
}

/// Success payload of the mutating endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Failure payload of the mutating endpoints (status >= 400).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

// ── Availability tiers ───────────────────────────────────────────────

/// Three-way availability classification, a pure function of
/// `(max_participants, enrolled)`.
///
/// The 0 and 1 boundaries are exact and deliberate (scarcity
/// signaling): zero spots renders a distinct "full" marker and makes
/// the activity non-selectable, exactly one spot renders a warning
/// marker, two or more render the plain count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// No spots left. Distinct marker, not selectable.
    Full,
    /// Exactly one spot left. Warning marker.
    Low,
    /// Two or more spots left. Plain count.
    Open(u32),
}

impl Availability {
    /// Classify remaining capacity into a tier.
    pub fn classify(max_participants: u32, enrolled: usize) -> Self {
        let enrolled = u32::try_from(enrolled).unwrap_or(u32::MAX);
        match max_participants.saturating_sub(enrolled) {
            0 => Self::Full,
            1 => Self::Low,
            n => Self::Open(n),
        }
    }

    /// Remaining spots in this tier.
    pub fn spots_left(self) -> u32 {
        match self {
            Self::Full => 0,
            Self::Low => 1,
            Self::Open(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(max: u32, enrolled: usize) -> Activity {
        Activity {
            description: "desc".into(),
            schedule: "sched".into(),
            max_participants: max,
            participants: (0..enrolled).map(|i| format!("kid{i}@school.edu")).collect(),
        }
    }

    #[test]
    fn classify_boundaries_are_exact() {
        assert_eq!(Availability::classify(12, 12), Availability::Full);
        assert_eq!(Availability::classify(12, 11), Availability::Low);
        assert_eq!(Availability::classify(12, 10), Availability::Open(2));
        assert_eq!(Availability::classify(12, 0), Availability::Open(12));
    }

    #[test]
    fn classify_clamps_over_enrollment_to_full() {
        // Server invariant says this can't happen; the client still
        // refuses to render a negative count.
        assert_eq!(Availability::classify(5, 7), Availability::Full);
        assert_eq!(Availability::classify(0, 0), Availability::Full);
    }

    #[test]
    fn selectable_iff_spots_strictly_positive() {
        assert!(!activity(10, 10).is_selectable());
        assert!(activity(10, 9).is_selectable());
        assert!(activity(10, 0).is_selectable());
    }

    #[test]
    fn spots_left_saturates() {
        assert_eq!(activity(5, 7).spots_left(), 0);
        assert_eq!(activity(5, 3).spots_left(), 2);
    }
}
