//! Pure checkout domain: money, validators, fees, field bookkeeping and the
//! ports the application layer talks to.

pub mod fees;
pub mod fields;
pub mod method;
pub mod money;
pub mod ports;
pub mod settlement;
pub mod validators;
