use super::intent::PaymentIntentView;
use serde::Serialize;
use std::fmt;

pub const MISSING_PAYMENT_INFORMATION: &str =
    "Payment verification failed. Missing payment information.";
pub const VERIFICATION_FAILED: &str = "Failed to verify payment. Please contact support.";
pub const PAYMENT_METHOD_DECLINED: &str = "Payment failed. Please try another payment method.";
pub const UNEXPECTED_STATUS: &str = "Something went wrong with your payment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Verifying,
    Processing,
    Success,
    Failed,
}

/// State of one verification run.
///
/// Fields are only reachable through the transition constructors, so a
/// payment view exists exactly for `Success`/`Processing` and an error
/// message exactly for `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationState {
    phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_view: Option<PaymentIntentView>,
}

impl VerificationState {
    pub fn verifying() -> Self {
        Self {
            phase: Phase::Verifying,
            error_message: None,
            payment_view: None,
        }
    }

    pub fn processing(view: PaymentIntentView) -> Self {
        Self {
            phase: Phase::Processing,
            error_message: None,
            payment_view: Some(view),
        }
    }

    pub fn succeeded(view: PaymentIntentView) -> Self {
        Self {
            phase: Phase::Success,
            error_message: None,
            payment_view: Some(view),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Failed,
            error_message: Some(message.into()),
            payment_view: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn payment_view(&self) -> Option<&PaymentIntentView> {
        self.payment_view.as_ref()
    }
}

impl Default for VerificationState {
    fn default() -> Self {
        Self::verifying()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Destructive,
}

impl Severity {
    /// The label used in both the text and the JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Destructive => "destructive",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-facing toast emitted once per verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    fn new(title: &str, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity,
        }
    }

    pub fn payment_successful() -> Self {
        Self::new(
            "Payment Successful",
            "Your payment has been processed successfully.",
            Severity::Success,
        )
    }

    /// Gateway confirmed the payment but the local record could not be updated.
    pub fn records_pending() -> Self {
        Self::new(
            "Payment Successful",
            "Payment completed but there was an issue updating records. Please contact support if needed.",
            Severity::Success,
        )
    }

    pub fn payment_processing() -> Self {
        Self::new(
            "Payment Processing",
            "Your payment is being processed. Please check back later.",
            Severity::Info,
        )
    }

    pub fn payment_failed(message: &str) -> Self {
        Self::new("Payment Failed", message, Severity::Destructive)
    }

    pub fn verification_failed(message: &str) -> Self {
        Self::new("Verification Failed", message, Severity::Destructive)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.title, self.description)
    }
}
