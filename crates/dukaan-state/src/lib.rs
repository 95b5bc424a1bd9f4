//! # dukaan-state — Order Lifecycle State Machine
//!
//! Governs the legal set of order status transitions. The order service
//! asks this crate which statuses are reachable next (for dashboard action
//! buttons) and checks every status write against it before persisting.
//!
//! ## Modules
//!
//! - **Status** (`status.rs`): the twelve [`OrderStatus`] values and the
//!   static transition table, with [`allowed_transitions`],
//!   [`can_transition`], [`is_terminal`] and [`validate_transition`].
//!
//! - **Lifecycle** (`lifecycle.rs`): [`OrderLifecycle`], an order's current
//!   status plus its ordered transition history. Rejected transitions leave
//!   it untouched.
//!
//! - **Audit** (`audit.rs`): breadth-first check of the transition table
//!   (totality, no self-loops, terminal/non-terminal out-degree,
//!   reachability from `created`).
//!
//! ## Design
//!
//! Transitions are an explicit adjacency table rather than conditionals
//! scattered through the order service. The table is an exhaustive `match`
//! on the status enum: adding a status without deciding its successors is a
//! compile error.
//!
//! ```text
//! prepaid:   created ──▶ payment_pending ──▶ paid ──────────────┐
//! COD:       created ──▶ cod_confirmed ──▶ cod_otp_verified ────┤
//!                                                               ▼
//! shared:    processing ──▶ shipped ──▶ out_for_delivery ──▶ delivered ──▶ refunded
//!                              │              │                  ▲
//!                              │              └──▶ rto           │
//!                              ├──▶ rto                          │
//!                              └─────────────────────────────────┘
//! ```
//!
//! Every pre-shipment status may also move to `cancelled`, and `paid` may
//! move straight to `refunded`. `cancelled`, `refunded` and `rto` are
//! terminal.

pub mod audit;
pub mod lifecycle;
pub mod status;

pub use audit::{audit_table, audit_transition_table, TableAudit, TableAuditError};
pub use lifecycle::{OrderLifecycle, OrderTransitionEvidence, OrderTransitionRecord};
pub use status::{
    allowed_transitions, can_transition, is_terminal, validate_transition, OrderStateError,
    OrderStatus, PaymentTrack,
};
