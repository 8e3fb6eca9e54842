use serde::{Deserialize, Serialize};

/// Body of the backend call that marks a local payment record as paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualUpdate {
    pub payment_id: String,
    pub payment_intent_id: String,
}

impl ManualUpdate {
    pub fn new(payment_id: impl Into<String>, payment_intent_id: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            payment_intent_id: payment_intent_id.into(),
        }
    }
}

/// How the secondary backend write ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reconciliation {
    /// No write was attempted (no record id, or the payment did not succeed).
    Skipped,
    /// The backend accepted the update.
    Recorded,
    /// The write failed; the record awaits manual verification.
    Pending,
}
