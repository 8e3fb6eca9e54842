//! Domain types for confirming a fee payment after checkout.
//!
//! Everything here is free of I/O. The collaborators the verification flow
//! talks to are described as traits in [`ports`].

pub mod intent;
pub mod params;
pub mod ports;
pub mod reconciliation;
pub mod verification;
