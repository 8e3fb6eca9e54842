use fee_checkout::application::verifier::PaymentVerifier;
use fee_checkout::domain::intent::{IntentStatus, PaymentIntentView};
use fee_checkout::infrastructure::in_memory::{
    RecordingBackend, RecordingNotifier, ScriptedGateway,
};
use std::sync::Arc;

pub fn intent(id: &str, status: &str, amount: i64, currency: &str) -> PaymentIntentView {
    PaymentIntentView::new(id, amount, currency, IntentStatus::from(status), "card")
        .expect("valid intent")
}

/// A verifier wired to in-memory collaborators the test can inspect.
pub struct Harness {
    pub gateway: ScriptedGateway,
    pub backend: RecordingBackend,
    pub notifier: RecordingNotifier,
}

impl Harness {
    pub fn new(gateway: ScriptedGateway) -> Self {
        Self::with_backend(gateway, RecordingBackend::new())
    }

    pub fn with_backend(gateway: ScriptedGateway, backend: RecordingBackend) -> Self {
        Self {
            gateway,
            backend,
            notifier: RecordingNotifier::new(),
        }
    }

    pub fn verifier(&self) -> PaymentVerifier {
        PaymentVerifier::new(
            Arc::new(self.gateway.clone()),
            Arc::new(self.backend.clone()),
            Arc::new(self.notifier.clone()),
        )
    }
}
