//! Adapters for the domain ports: the in-memory saved-profile table and the
//! simulated payment processor and wallet.

pub mod in_memory;
pub mod simulated;
