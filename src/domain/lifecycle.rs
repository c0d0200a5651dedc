use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Ordered,
    Approved,
    Done,
    Received,
    Rejected,
    Expired,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Ordered,
        OrderStatus::Approved,
        OrderStatus::Done,
        OrderStatus::Received,
        OrderStatus::Rejected,
        OrderStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ORDERED",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Done => "DONE",
            OrderStatus::Received => "RECEIVED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown order status '{s}'")))
    }
}

/// An accepted status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl Transition {
    /// Rejection hands the order's reserved stock back to the catalog.
    pub fn restores_stock(&self) -> bool {
        self.to == OrderStatus::Rejected
    }

    /// Only a rejection records the caller's cancel reasons.
    pub fn records_cancel_reasons(&self) -> bool {
        self.to == OrderStatus::Rejected
    }
}

/// Validates a client-initiated status update.
///
/// Only two rules apply: `Expired` is set by the system and is never a valid
/// target, and `Rejected` is reachable from `Ordered` alone. Moves between the
/// fulfilment states are not ordered against each other.
pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<Transition, DomainError> {
    let allowed = match to {
        OrderStatus::Expired => false,
        OrderStatus::Rejected => from == OrderStatus::Ordered,
        _ => true,
    };

    if allowed {
        Ok(Transition { from, to })
    } else {
        Err(DomainError::StatusError {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
