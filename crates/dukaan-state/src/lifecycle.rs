//! # Order Lifecycle
//!
//! An order's current [`OrderStatus`] with its ordered transition history.
//! The order service loads one (fresh or restored from storage), calls
//! [`OrderLifecycle::transition`], and persists the result only on `Ok`.
//! A rejected transition leaves both the status and the history untouched.

use serde::{Deserialize, Serialize};

use dukaan_core::{OrderId, Timestamp};

use crate::status::{validate_transition, OrderStateError, OrderStatus};

// ─── Transition Evidence ─────────────────────────────────────────────

/// Why a transition is happening and who asked for it.
#[derive(Debug, Clone)]
pub struct OrderTransitionEvidence {
    /// Reason for the transition (e.g. "payment captured", "buyer cancelled").
    pub reason: String,
    /// Actor who initiated it (seller user, buyer, courier webhook).
    pub actor: Option<String>,
}

impl OrderTransitionEvidence {
    /// Evidence with a reason and no actor.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            actor: None,
        }
    }

    /// Builder: set the actor.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Record of an order status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTransitionRecord {
    /// Status before the transition.
    pub from_status: OrderStatus,
    /// Status after the transition.
    pub to_status: OrderStatus,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// Reason for the transition.
    pub reason: String,
    /// Who initiated it.
    pub actor: Option<String>,
}

// ─── Order Lifecycle ─────────────────────────────────────────────────

/// An order's status and transition log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLifecycle {
    /// The order this lifecycle belongs to.
    pub order_id: OrderId,
    /// Current status.
    pub status: OrderStatus,
    /// When the order was created.
    pub created_at: Timestamp,
    /// Ordered log of transitions applied through this value.
    pub transitions: Vec<OrderTransitionRecord>,
}

impl OrderLifecycle {
    /// A freshly placed order in `created`.
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            status: OrderStatus::Created,
            created_at: Timestamp::now(),
            transitions: Vec::new(),
        }
    }

    /// Rehydrate an order whose status was loaded from storage.
    ///
    /// The history starts empty; only transitions applied from here on are
    /// recorded.
    pub fn restore(order_id: OrderId, status: OrderStatus, created_at: Timestamp) -> Self {
        Self {
            order_id,
            status,
            created_at,
            transitions: Vec::new(),
        }
    }

    /// Statuses the order may move to next.
    pub fn next_statuses(&self) -> &'static [OrderStatus] {
        self.status.allowed_transitions()
    }

    /// Whether the order is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move the order to `to` if the transition table allows it.
    pub fn transition(
        &mut self,
        to: OrderStatus,
        evidence: OrderTransitionEvidence,
    ) -> Result<(), OrderStateError> {
        if let Err(err) = validate_transition(self.status, to) {
            tracing::warn!(
                order_id = %self.order_id,
                from = %self.status,
                to = %to,
                error = %err,
                "rejected order status transition"
            );
            return Err(err);
        }

        tracing::info!(
            order_id = %self.order_id,
            from = %self.status,
            to = %to,
            reason = %evidence.reason,
            "order status transition"
        );
        self.transitions.push(OrderTransitionRecord {
            from_status: self.status,
            to_status: to,
            timestamp: Timestamp::now(),
            reason: evidence.reason,
            actor: evidence.actor,
        });
        self.status = to;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
