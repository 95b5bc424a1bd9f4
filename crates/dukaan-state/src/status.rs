//! # Order Status and Transition Table
//!
//! ## Transition table
//!
//! | From               | To                                      |
//! |--------------------|-----------------------------------------|
//! | `created`          | `payment_pending`, `cod_confirmed`, `cancelled` |
//! | `payment_pending`  | `paid`, `cancelled`                     |
//! | `paid`             | `processing`, `refunded`, `cancelled`   |
//! | `cod_confirmed`    | `cod_otp_verified`, `cancelled`         |
//! | `cod_otp_verified` | `processing`, `cancelled`               |
//! | `processing`       | `shipped`, `cancelled`                  |
//! | `shipped`          | `out_for_delivery`, `delivered`, `rto`  |
//! | `out_for_delivery` | `delivered`, `rto`                      |
//! | `delivered`        | `refunded`                              |
//! | `cancelled`, `refunded`, `rto` | (terminal)                  |
//!
//! `refunded` is reachable from `paid` (pre-fulfillment) and `delivered`
//! (post-fulfillment) only. COD orders never reach it before delivery
//! because no payment has been captured.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dukaan_core::ValidationError;

// ─── Order Status ────────────────────────────────────────────────────

/// The lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, payment method not yet chosen.
    Created,
    /// Prepaid order awaiting payment capture.
    PaymentPending,
    /// Prepaid order with payment captured.
    Paid,
    /// Cash-on-delivery order confirmed by the buyer.
    CodConfirmed,
    /// Cash-on-delivery order whose OTP has been verified.
    CodOtpVerified,
    /// Seller is packing the order.
    Processing,
    /// Handed to the courier.
    Shipped,
    /// With the last-mile delivery agent.
    OutForDelivery,
    /// Delivered to the buyer.
    Delivered,
    /// Cancelled before shipment (terminal).
    Cancelled,
    /// Payment returned to the buyer (terminal).
    Refunded,
    /// Returned to origin before delivery (terminal).
    Rto,
}

/// Which payment sub-flow a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTrack {
    /// `payment_pending → paid`.
    Prepaid,
    /// `cod_confirmed → cod_otp_verified`.
    CashOnDelivery,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [OrderStatus; 12] = [
        Self::Created,
        Self::PaymentPending,
        Self::Paid,
        Self::CodConfirmed,
        Self::CodOtpVerified,
        Self::Processing,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
        Self::Rto,
    ];

    /// Statuses with no outgoing transitions.
    pub const TERMINAL: [OrderStatus; 3] = [Self::Cancelled, Self::Refunded, Self::Rto];

    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::PaymentPending => "payment_pending",
            Self::Paid => "paid",
            Self::CodConfirmed => "cod_confirmed",
            Self::CodOtpVerified => "cod_otp_verified",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Rto => "rto",
        }
    }

    /// Statuses reachable in one step, in table order.
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Created => &[PaymentPending, CodConfirmed, Cancelled],
            PaymentPending => &[Paid, Cancelled],
            Paid => &[Processing, Refunded, Cancelled],
            CodConfirmed => &[CodOtpVerified, Cancelled],
            CodOtpVerified => &[Processing, Cancelled],
            Processing => &[Shipped, Cancelled],
            Shipped => &[OutForDelivery, Delivered, Rto],
            OutForDelivery => &[Delivered, Rto],
            Delivered => &[Refunded],
            Cancelled | Refunded | Rto => &[],
        }
    }

    /// Whether `to` is a legal next status.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Whether this status has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// The payment sub-flow this status belongs to, or `None` for statuses
    /// shared by both tracks.
    pub fn payment_track(&self) -> Option<PaymentTrack> {
        match self {
            Self::PaymentPending | Self::Paid => Some(PaymentTrack::Prepaid),
            Self::CodConfirmed | Self::CodOtpVerified => Some(PaymentTrack::CashOnDelivery),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ValidationError::UnknownOrderStatus(s.to_string()))
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// A status change was rejected by the transition table.
///
/// Callers must reject the whole write; nothing is coerced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderStateError {
    /// `to` is not a successor of `from`.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
    },

    /// The order is already in a terminal status.
    #[error("order is in terminal state {state}; cannot move to {to}")]
    TerminalState {
        /// The terminal status.
        state: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
    },
}

// ─── Guards ──────────────────────────────────────────────────────────

/// Statuses reachable from `status` in one step.
pub fn allowed_transitions(status: OrderStatus) -> &'static [OrderStatus] {
    status.allowed_transitions()
}

/// Whether `from → to` is in the transition table.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    from.can_transition_to(to)
}

/// Whether `status` has no outgoing transitions.
pub fn is_terminal(status: OrderStatus) -> bool {
    status.is_terminal()
}

/// Like [`can_transition`], but explains the rejection.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderStateError> {
    if from.is_terminal() {
        return Err(OrderStateError::TerminalState { state: from, to });
    }
    if !from.can_transition_to(to) {
        return Err(OrderStateError::InvalidTransition { from, to });
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_terminal_statuses_have_successors() {
        for status in OrderStatus::ALL {
            if OrderStatus::TERMINAL.contains(&status) {
                assert!(status.allowed_transitions().is_empty(), "{status} should be terminal");
                assert!(is_terminal(status));
            } else {
                assert!(!status.allowed_transitions().is_empty(), "{status} has no successors");
                assert!(!is_terminal(status));
            }
        }
    }

    #[test]
    fn no_self_transitions() {
        for status in OrderStatus::ALL {
            assert!(!can_transition(status, status), "{status} loops to itself");
        }
    }

    #[test]
    fn cancelled_cannot_be_resurrected() {
        assert!(!can_transition(OrderStatus::Cancelled, OrderStatus::Paid));
        for to in OrderStatus::ALL {
            assert!(!can_transition(OrderStatus::Cancelled, to));
        }
    }

    #[test]
    fn delivered_can_be_refunded() {
        assert!(can_transition(OrderStatus::Delivered, OrderStatus::Refunded));
    }

    #[test]
    fn payment_and_processing_cannot_be_skipped() {
        assert!(!can_transition(OrderStatus::Created, OrderStatus::Shipped));
        assert!(!can_transition(OrderStatus::Created, OrderStatus::Paid));
        assert!(!can_transition(OrderStatus::Paid, OrderStatus::Shipped));
        assert!(!can_transition(OrderStatus::CodConfirmed, OrderStatus::Processing));
    }

    #[test]
    fn refund_only_after_capture_or_delivery() {
        let sources: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(|s| can_transition(*s, OrderStatus::Refunded))
            .collect();
        assert_eq!(sources, vec![OrderStatus::Paid, OrderStatus::Delivered]);
        assert!(!can_transition(OrderStatus::CodConfirmed, OrderStatus::Refunded));
        assert!(!can_transition(OrderStatus::CodOtpVerified, OrderStatus::Refunded));
    }

    #[test]
    fn payment_tracks_converge_at_processing() {
        assert!(can_transition(OrderStatus::Paid, OrderStatus::Processing));
        assert!(can_transition(OrderStatus::CodOtpVerified, OrderStatus::Processing));
        assert_eq!(OrderStatus::Paid.payment_track(), Some(PaymentTrack::Prepaid));
        assert_eq!(
            OrderStatus::CodOtpVerified.payment_track(),
            Some(PaymentTrack::CashOnDelivery)
        );
        assert_eq!(OrderStatus::Processing.payment_track(), None);
    }

    #[test]
    fn rto_is_a_shipped_stage_branch() {
        let sources: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(|s| can_transition(*s, OrderStatus::Rto))
            .collect();
        assert_eq!(sources, vec![OrderStatus::Shipped, OrderStatus::OutForDelivery]);
    }

    #[test]
    fn validate_transition_reports_reason() {
        assert!(validate_transition(OrderStatus::Created, OrderStatus::PaymentPending).is_ok());

        let err = validate_transition(OrderStatus::Created, OrderStatus::Shipped).unwrap_err();
        assert_eq!(
            err,
            OrderStateError::InvalidTransition {
                from: OrderStatus::Created,
                to: OrderStatus::Shipped,
            }
        );
        assert_eq!(err.to_string(), "cannot move order from created to shipped");

        let err = validate_transition(OrderStatus::Rto, OrderStatus::Delivered).unwrap_err();
        assert!(matches!(err, OrderStateError::TerminalState { .. }));
    }

    #[test]
    fn parse_known_and_unknown_statuses() {
        assert_eq!("cod_otp_verified".parse::<OrderStatus>().unwrap(), OrderStatus::CodOtpVerified);
        assert_eq!("RTO".parse::<OrderStatus>().unwrap(), OrderStatus::Rto);
        assert!(matches!(
            "lost_in_transit".parse::<OrderStatus>(),
            Err(ValidationError::UnknownOrderStatus(_))
        ));
    }

    #[test]
    fn display_and_serde_use_wire_names() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!(OrderStatus::OutForDelivery.to_string(), "out_for_delivery");
    }
}
