//! Application layer: the screen state machine, the submission lifecycle the
//! payment forms share, and the session that wires them to the ports.

pub mod action;
pub mod amount;
pub mod checkout;
pub mod express;
pub mod forms;
pub mod lifecycle;
pub mod session;
