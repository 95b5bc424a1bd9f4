//! # Transition Table Audit
//!
//! Structural checks over a transition table:
//!
//! - no status lists itself as a successor;
//! - declared terminal statuses have no successors, all others have one;
//! - every status is reachable from `created` (breadth-first search).
//!
//! [`audit_transition_table`] runs the checks against the built-in table.
//! [`audit_table`] accepts any successor function so that broken tables
//! can be exercised in tests.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;
use thiserror::Error;

use crate::status::OrderStatus;

/// A structural defect in a transition table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableAuditError {
    /// A status lists itself as a successor.
    #[error("status {0} transitions to itself")]
    SelfTransition(OrderStatus),

    /// A non-terminal status has no successors.
    #[error("non-terminal status {0} has no outgoing transitions")]
    DeadEnd(OrderStatus),

    /// A terminal status has successors.
    #[error("terminal status {0} has outgoing transitions")]
    TerminalWithSuccessors(OrderStatus),

    /// A status cannot be reached from `created`.
    #[error("status {0} is unreachable from created")]
    Unreachable(OrderStatus),
}

/// Summary of a successful audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableAudit {
    /// Number of statuses checked.
    pub status_count: usize,
    /// Number of edges in the table.
    pub transition_count: usize,
    /// Terminal statuses.
    pub terminal: Vec<OrderStatus>,
    /// Statuses in breadth-first order from `created`.
    pub reachable: Vec<OrderStatus>,
}

/// Audit the built-in transition table.
pub fn audit_transition_table() -> Result<TableAudit, TableAuditError> {
    audit_table(|status| status.allowed_transitions().to_vec())
}

/// Audit a table given by its successor function.
pub fn audit_table<F>(successors: F) -> Result<TableAudit, TableAuditError>
where
    F: Fn(OrderStatus) -> Vec<OrderStatus>,
{
    let mut transition_count = 0;
    for status in OrderStatus::ALL {
        let next = successors(status);
        if next.contains(&status) {
            return Err(TableAuditError::SelfTransition(status));
        }
        let declared_terminal = OrderStatus::TERMINAL.contains(&status);
        match (declared_terminal, next.is_empty()) {
            (true, false) => return Err(TableAuditError::TerminalWithSuccessors(status)),
            (false, true) => return Err(TableAuditError::DeadEnd(status)),
            _ => {}
        }
        transition_count += next.len();
    }

    let mut seen = BTreeSet::new();
    let mut reachable = Vec::with_capacity(OrderStatus::ALL.len());
    let mut queue = VecDeque::from([OrderStatus::Created]);
    seen.insert(OrderStatus::Created);
    while let Some(status) = queue.pop_front() {
        reachable.push(status);
        for next in successors(status) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    if let Some(missing) = OrderStatus::ALL.into_iter().find(|s| !seen.contains(s)) {
        return Err(TableAuditError::Unreachable(missing));
    }

    Ok(TableAudit {
        status_count: OrderStatus::ALL.len(),
        transition_count,
        terminal: OrderStatus::TERMINAL.to_vec(),
        reachable,
    })
}
