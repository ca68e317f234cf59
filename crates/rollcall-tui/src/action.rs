//! All possible UI actions. Actions are the sole mechanism for state
//! mutation — key handlers and spawned API calls alike complete by
//! dispatching one through the app channel.

use std::fmt;
use std::sync::Arc;

use rollcall_api::{Catalog, MyActivities};

use crate::screen::ScreenId;

/// Status notice severity. The status line only ever reports the
/// outcome of a mutating command, so there are exactly two kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
}

/// A transient status notice.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotifyKind,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            kind: NotifyKind::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            kind: NotifyKind::Error,
        }
    }
}

/// A withdraw waiting on user confirmation.
///
/// Carries both opaque parameters from the triggering roster row; the
/// confirmation prompt names them so the user knows exactly what they
/// are about to remove.
#[derive(Debug, Clone)]
pub struct PendingWithdraw {
    pub activity: String,
    pub email: String,
}

impl fmt::Display for PendingWithdraw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Remove {} from {}?", self.email, self.activity)
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),

    // ── Roster refresh cycle ──────────────────────────────────────
    /// Kick off a catalog fetch. Dispatched at startup, on manual
    /// refresh, and after every successful mutation. Overlapping
    /// refreshes are not de-duplicated; the last snapshot to arrive
    /// wins the render targets.
    RefreshRoster,
    /// A complete catalog snapshot. Replaces the previous one wholesale.
    RosterLoaded(Arc<Catalog>),
    /// The fetch failed; the roster area shows a single generic notice.
    RosterFailed,

    // ── Signup command ────────────────────────────────────────────
    SubmitSignup { activity: String, email: String },
    SignupSucceeded { message: String },
    SignupFailed { message: String },

    // ── Withdraw command ──────────────────────────────────────────
    ShowConfirm(PendingWithdraw),
    ConfirmYes,
    ConfirmNo,
    WithdrawSucceeded { message: String },
    WithdrawFailed { message: String },

    // ── Membership lookup ─────────────────────────────────────────
    SubmitLookup { email: String },
    LookupLoaded {
        email: String,
        activities: Arc<MyActivities>,
    },
    LookupFailed { message: String },

    // ── Status line ───────────────────────────────────────────────
    Notify(Notification),
}
