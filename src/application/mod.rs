//! Application layer orchestrating the payment confirmation flow.
//!
//! `PaymentVerifier` owns the injected gateway, backend and notifier, maps the
//! gateway's answer onto a `VerificationState`, and hands the backend
//! reconciliation off to a background `tokio` task.

pub mod verifier;
