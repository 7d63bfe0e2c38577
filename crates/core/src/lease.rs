//! Lease schedule arithmetic.

use chrono::Months;

use crate::types::Timestamp;

/// Length of a lease created by approving an application.
pub const LEASE_TERM_MONTHS: u32 = 12;

/// Start and end of a new lease beginning at `start`.
///
/// The end date is the same calendar day one year later (clamped to the end
/// of the month, so a lease starting on 29 Feb ends on 28 Feb).
pub fn lease_term(start: Timestamp) -> (Timestamp, Timestamp) {
    let end = start
        .checked_add_months(Months::new(LEASE_TERM_MONTHS))
        .unwrap_or(start);
    (start, end)
}

/// The first monthly anniversary of `start` strictly after `now`.
///
/// Anniversaries are computed from `start` each time rather than by repeated
/// addition, so a lease starting on the 31st is due on the last day of
/// shorter months without drifting afterwards.
pub fn next_payment_date(start: Timestamp, now: Timestamp) -> Timestamp {
    let mut months = 0u32;
    loop {
        let candidate = match start.checked_add_months(Months::new(months)) {
            Some(candidate) => candidate,
            None => return start,
        };
        if candidate > now {
            return candidate;
        }
        months += 1;
    }
}
