//! Adapters for the collaborators declared in [`crate::domain::ports`].
//!
//! `stripe` and `backend` talk HTTP with `reqwest`; `in_memory` holds scripted
//! and recording doubles for tests and local runs.

pub mod backend;
pub mod in_memory;
pub mod stripe;
