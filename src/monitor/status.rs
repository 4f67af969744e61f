//! Status transition rule.

use crate::site::SiteStatus;

/// A status change the owner must hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The site became unreachable (including a failing first check).
    WentDown,
    /// The site is reachable again after being down.
    Recovered,
}

/// Result of evaluating one probe against the previous status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Status to persist.
    pub status: SiteStatus,
    /// Event to announce, if any.
    pub transition: Option<Transition>,
}

impl Evaluation {
    /// Returns true if a notification must be sent.
    #[must_use]
    pub const fn notify(&self) -> bool {
        self.transition.is_some()
    }
}

/// Computes the new status of a site from its previous status and a probe outcome.
///
/// The new status is `Online` iff the probe succeeded. A notification is due
/// when a non-down site goes down, or a down site comes back. The very first
/// successful check (`NotChecked -> Online`) is silent; a failing first
/// check notifies like any other down transition.
///
/// # Example
///
/// ```
/// use itsalive::monitor::{Transition, evaluate};
/// use itsalive::site::SiteStatus;
///
/// let eval = evaluate(SiteStatus::Down, true);
/// assert_eq!(eval.status, SiteStatus::Online);
/// assert_eq!(eval.transition, Some(Transition::Recovered));
/// ```
#[must_use]
pub const fn evaluate(previous: SiteStatus, probe_succeeded: bool) -> Evaluation {
    let status = if probe_succeeded {
        SiteStatus::Online
    } else {
        SiteStatus::Down
    };

    let transition = match (previous, status) {
        (SiteStatus::NotChecked | SiteStatus::Online, SiteStatus::Down) => {
            Some(Transition::WentDown)
        }
        (SiteStatus::Down, SiteStatus::Online) => Some(Transition::Recovered),
        _ => None,
    };

    Evaluation { status, transition }
}
