use crate::domain::intent::{IntentStatus, PaymentIntentView};
use crate::domain::params::NavigationParams;
use crate::domain::ports::{NotifierRef, PaymentGatewayRef, PaymentRecordBackendRef};
use crate::domain::reconciliation::{ManualUpdate, Reconciliation};
use crate::domain::verification::{
    MISSING_PAYMENT_INFORMATION, Notification, PAYMENT_METHOD_DECLINED, UNEXPECTED_STATUS,
    VERIFICATION_FAILED, VerificationState,
};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Bounded re-query of an intent that is still `processing`.
///
/// `attempts == 0` disables re-polling, leaving a single gateway read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessingPoll {
    pub attempts: u32,
    pub interval: Duration,
}

impl ProcessingPoll {
    /// A policy that never re-queries the gateway.
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Outcome of one verification run.
///
/// The state is final when this is returned. A backend reconciliation may
/// still be running in the background; [`Verification::settle`] waits for it.
/// Dropping the handle detaches the write.
#[derive(Debug)]
pub struct Verification {
    state: VerificationState,
    reconciliation: Option<JoinHandle<Reconciliation>>,
}

impl Verification {
    fn settled(state: VerificationState) -> Self {
        Self {
            state,
            reconciliation: None,
        }
    }

    /// The final state shown to the user.
    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    /// Whether the backend write is still in flight.
    pub fn is_reconciling(&self) -> bool {
        self.reconciliation
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Waits for the background reconciliation, if any.
    pub async fn settle(self) -> (VerificationState, Reconciliation) {
        let outcome = match self.reconciliation {
            Some(handle) => handle.await.unwrap_or_else(|e| {
                error!(error = %e, "Reconciliation task did not complete");
                Reconciliation::Pending
            }),
            None => Reconciliation::Skipped,
        };
        (self.state, outcome)
    }
}

/// Confirms a checkout against the gateway and reconciles the local record.
///
/// The gateway is authoritative for what the user sees. The backend write is
/// secondary: it runs as a detached task and its failure only changes the
/// notification text.
pub struct PaymentVerifier {
    gateway: PaymentGatewayRef,
    backend: PaymentRecordBackendRef,
    notifier: NotifierRef,
    poll: ProcessingPoll,
}

impl PaymentVerifier {
    /// Creates a new verifier with re-polling disabled.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The payment gateway queried for the intent status.
    /// * `backend` - The institute backend that records confirmed payments.
    /// * `notifier` - Where the single user-facing notification is sent.
    pub fn new(
        gateway: PaymentGatewayRef,
        backend: PaymentRecordBackendRef,
        notifier: NotifierRef,
    ) -> Self {
        Self {
            gateway,
            backend,
            notifier,
            poll: ProcessingPoll::disabled(),
        }
    }

    /// Re-queries a `processing` intent according to `poll`.
    ///
    /// # Arguments
    ///
    /// * `poll` - Number of extra reads and the pause between them.
    pub fn with_processing_poll(mut self, poll: ProcessingPoll) -> Self {
        self.poll = poll;
        self
    }

    /// Runs the flow once for the given navigation parameters.
    ///
    /// Never fails: every error is mapped to a `failed` state and a
    /// notification.
    pub async fn verify(&self, params: &NavigationParams) -> Verification {
        let Some(client_secret) = params.client_secret() else {
            warn!("Return URL carried no client secret");
            return self.fail(Notification::verification_failed(
                MISSING_PAYMENT_INFORMATION,
            ));
        };

        let intent = match self.query_intent(client_secret).await {
            Ok(intent) => intent,
            Err(e) => {
                error!(error = %e, "Failed to retrieve payment intent");
                return self.fail(Notification::verification_failed(VERIFICATION_FAILED));
            }
        };

        debug!(intent_id = %intent.id(), status = %intent.status(), "Payment intent retrieved");

        match intent.status().clone() {
            IntentStatus::Succeeded => self.succeed(intent, params.payment_record_id()),
            IntentStatus::Processing => {
                info!(intent_id = %intent.id(), "Payment still processing");
                self.notifier.notify(Notification::payment_processing());
                Verification::settled(VerificationState::processing(intent))
            }
            IntentStatus::RequiresPaymentMethod => {
                info!(intent_id = %intent.id(), "Payment method was declined");
                self.fail(Notification::payment_failed(PAYMENT_METHOD_DECLINED))
            }
            IntentStatus::Other(status) => {
                warn!(intent_id = %intent.id(), %status, "Unexpected payment intent status");
                self.fail(Notification::payment_failed(UNEXPECTED_STATUS))
            }
        }
    }

    async fn query_intent(&self, client_secret: &str) -> Result<PaymentIntentView> {
        let mut intent = self.gateway.retrieve_intent(client_secret).await?;

        let mut remaining = self.poll.attempts;
        while *intent.status() == IntentStatus::Processing && remaining > 0 {
            tokio::time::sleep(self.poll.interval).await;
            remaining -= 1;
            match self.gateway.retrieve_intent(client_secret).await {
                Ok(next) => intent = next,
                Err(e) => {
                    warn!(error = %e, intent_id = %intent.id(), "Re-poll failed, keeping processing status");
                    break;
                }
            }
        }
        Ok(intent)
    }

    fn succeed(&self, intent: PaymentIntentView, payment_record_id: Option<&str>) -> Verification {
        info!(intent_id = %intent.id(), amount = %intent.formatted_amount(), "Payment succeeded");

        let reconciliation = match payment_record_id {
            Some(payment_id) => {
                Some(self.spawn_reconciliation(ManualUpdate::new(payment_id, intent.id())))
            }
            None => {
                debug!(intent_id = %intent.id(), "No payment record id, skipping reconciliation");
                self.notifier.notify(Notification::payment_successful());
                None
            }
        };

        Verification {
            state: VerificationState::succeeded(intent),
            reconciliation,
        }
    }

    fn spawn_reconciliation(&self, update: ManualUpdate) -> JoinHandle<Reconciliation> {
        let backend = Arc::clone(&self.backend);
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            match backend.manual_update(&update).await {
                Ok(()) => {
                    info!(payment_id = %update.payment_id, intent_id = %update.payment_intent_id, "Payment record updated");
                    notifier.notify(Notification::payment_successful());
                    Reconciliation::Recorded
                }
                Err(e) => {
                    error!(
                        error = %e,
                        payment_id = %update.payment_id,
                        intent_id = %update.payment_intent_id,
                        "Failed to update payment record"
                    );
                    notifier.notify(Notification::records_pending());
                    Reconciliation::Pending
                }
            }
        })
    }

    fn fail(&self, notification: Notification) -> Verification {
        let state = VerificationState::failed(notification.description.clone());
        self.notifier.notify(notification);
        Verification::settled(state)
    }
}
