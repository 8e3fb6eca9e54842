use crate::domain::intent::PaymentIntentView;
use crate::domain::ports::{Notifier, PaymentGateway, PaymentRecordBackend};
use crate::domain::reconciliation::ManualUpdate;
use crate::domain::verification::Notification;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Notify, RwLock};

type ScriptedResponse = std::result::Result<PaymentIntentView, String>;

#[derive(Default)]
struct GatewayScript {
    responses: VecDeque<ScriptedResponse>,
    secrets: Vec<String>,
}

/// A gateway that answers from a fixed script.
///
/// Responses are consumed in order; the last one is repeated once the
/// script runs out. Every call is recorded. Clones share the same script.
#[derive(Default, Clone)]
pub struct ScriptedGateway {
    script: Arc<RwLock<GatewayScript>>,
}

impl ScriptedGateway {
    /// Creates a gateway with an empty script. Calls fail until a response is queued.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, intent: PaymentIntentView) -> Self {
        self.push(Ok(intent))
    }

    pub fn fail_with(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()))
    }

    fn push(self, response: ScriptedResponse) -> Self {
        if let Ok(mut script) = self.script.try_write() {
            script.responses.push_back(response);
        }
        self
    }

    pub async fn calls(&self) -> usize {
        self.script.read().await.secrets.len()
    }

    /// Client secrets the gateway was queried with, in call order.
    pub async fn secrets(&self) -> Vec<String> {
        self.script.read().await.secrets.clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn retrieve_intent(&self, client_secret: &str) -> Result<PaymentIntentView> {
        let mut script = self.script.write().await;
        script.secrets.push(client_secret.to_string());

        let response = if script.responses.len() > 1 {
            script.responses.pop_front()
        } else {
            script.responses.front().cloned()
        };

        match response {
            Some(Ok(intent)) => Ok(intent),
            Some(Err(message)) => Err(CheckoutError::Gateway(message)),
            None => Err(CheckoutError::Gateway("no scripted response".to_string())),
        }
    }
}

/// A backend that records every update it receives.
#[derive(Default, Clone)]
pub struct RecordingBackend {
    updates: Arc<RwLock<Vec<ManualUpdate>>>,
    failure: Option<String>,
    gate: Option<Arc<Notify>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that records the update and then rejects it.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// A backend that holds every update until the returned handle is notified.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let backend = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (backend, gate)
    }

    pub async fn updates(&self) -> Vec<ManualUpdate> {
        self.updates.read().await.clone()
    }
}

#[async_trait]
impl PaymentRecordBackend for RecordingBackend {
    async fn manual_update(&self, update: &ManualUpdate) -> Result<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.updates.write().await.push(update.clone());
        match &self.failure {
            Some(message) => Err(CheckoutError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

/// A notifier that keeps every notification in memory.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
