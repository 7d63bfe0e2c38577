//! Rental application workflow rules.
//!
//! An application starts `Pending` and moves exactly once to a terminal
//! state (`Approved` or `Denied`). Only approval has side effects (lease,
//! first payment, residency link); those live in the API engine, this
//! module decides whether a transition is allowed.

use crate::error::CoreError;
use crate::status::ApplicationStatus;

/// Statuses that count as an "active" application for the one-per-pair rule.
pub const ACTIVE_STATUSES: [ApplicationStatus; 2] =
    [ApplicationStatus::Pending, ApplicationStatus::Approved];

/// A manager's decision on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Denied,
}

impl Decision {
    /// Parse a decision from its wire name. `Pending` is not a decision.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "Approved" => Ok(Decision::Approved),
            "Denied" => Ok(Decision::Denied),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: Approved, Denied"
            ))),
        }
    }

    /// The status an application lands in after this decision.
    pub fn target_status(self) -> ApplicationStatus {
        match self {
            Decision::Approved => ApplicationStatus::Approved,
            Decision::Denied => ApplicationStatus::Denied,
        }
    }
}

impl ApplicationStatus {
    /// `true` once the application can no longer change.
    pub fn is_terminal(self) -> bool {
        match self {
            ApplicationStatus::Pending => false,
            ApplicationStatus::Approved | ApplicationStatus::Denied => true,
        }
    }

    /// `true` for statuses that block a second application to the same property.
    pub fn is_active(self) -> bool {
        ACTIVE_STATUSES.contains(&self)
    }
}

/// Validate a decision against the application's current status and return
/// the resulting status.
pub fn apply_decision(
    current: ApplicationStatus,
    decision: Decision,
) -> Result<ApplicationStatus, CoreError> {
    match current {
        ApplicationStatus::Pending => Ok(decision.target_status()),
        ApplicationStatus::Approved | ApplicationStatus::Denied => Err(CoreError::Conflict(
            format!("Application has already been {current}. Cannot update again."),
        )),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pending_accepts_both_decisions() {
        assert_eq!(
            apply_decision(ApplicationStatus::Pending, Decision::Approved).unwrap(),
            ApplicationStatus::Approved
        );
        assert_eq!(
            apply_decision(ApplicationStatus::Pending, Decision::Denied).unwrap(),
            ApplicationStatus::Denied
        );
    }

    #[test]
    fn terminal_states_reject_every_decision() {
        for current in [ApplicationStatus::Approved, ApplicationStatus::Denied] {
            for decision in [Decision::Approved, Decision::Denied] {
                let err = apply_decision(current, decision).unwrap_err();
                assert_matches!(err, CoreError::Conflict(msg) if msg.contains(current.name()));
            }
        }
    }

    #[test]
    fn pending_is_not_a_decision() {
        assert_matches!(Decision::parse("Pending"), Err(CoreError::Validation(_)));
        assert_matches!(Decision::parse("approved"), Err(CoreError::Validation(_)));
        assert_eq!(Decision::parse("Denied").unwrap(), Decision::Denied);
    }

    #[test]
    fn active_statuses() {
        assert!(ApplicationStatus::Pending.is_active());
        assert!(ApplicationStatus::Approved.is_active());
        assert!(!ApplicationStatus::Denied.is_active());
        assert!(!ApplicationStatus::Pending.is_terminal());
    }
}
