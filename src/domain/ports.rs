use super::intent::PaymentIntentView;
use super::reconciliation::ManualUpdate;
use super::verification::Notification;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Read access to the payment gateway's view of an intent.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn retrieve_intent(&self, client_secret: &str) -> Result<PaymentIntentView>;
}

/// The institute's own record of fee payments.
///
/// `manual_update` must be idempotent per payment id.
#[async_trait]
pub trait PaymentRecordBackend: Send + Sync {
    async fn manual_update(&self, update: &ManualUpdate) -> Result<()>;
}

/// Fire-and-forget user notification surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub type PaymentGatewayRef = Arc<dyn PaymentGateway>;
pub type PaymentRecordBackendRef = Arc<dyn PaymentRecordBackend>;
pub type NotifierRef = Arc<dyn Notifier>;
