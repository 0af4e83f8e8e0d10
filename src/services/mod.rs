//! Service layer: delivery channels and the escalation controller.

pub mod escalation;
pub mod notifications;

pub use escalation::{EscalationController, EscalationState};
