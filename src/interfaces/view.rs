use crate::domain::intent::PaymentIntentView;
use crate::domain::verification::{Phase, VerificationState};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Spinner,
    Clock,
    CheckCircle,
    XCircle,
}

impl Icon {
    fn glyph(&self) -> &'static str {
        match self {
            Icon::Spinner => "…",
            Icon::Clock => "◷",
            Icon::CheckCircle => "✓",
            Icon::XCircle => "✗",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Blue,
    Yellow,
    Green,
    Red,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionTarget {
    Route(String),
    /// Previous history entry.
    HistoryBack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub label: String,
    pub target: ActionTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub amount: String,
    pub payment_method: String,
    pub date: String,
    pub transaction_id: String,
}

/// Everything the confirmation page shows for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub phase: Phase,
    pub icon: Icon,
    pub accent: Accent,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PaymentDetails>,
    pub actions: Vec<Action>,
}

/// Renders the confirmation page. Pure: the same state, date and route
/// always give the same view.
pub fn render(state: &VerificationState, today: NaiveDate, dashboard_route: &str) -> RenderedView {
    let (icon, accent, title, description) = match state.phase() {
        Phase::Verifying => (
            Icon::Spinner,
            Accent::Blue,
            "Verifying Payment",
            "Please wait while we confirm your payment...",
        ),
        Phase::Processing => (
            Icon::Clock,
            Accent::Yellow,
            "Payment Processing",
            "Your payment is being processed. We'll notify you once it's complete.",
        ),
        Phase::Success => (
            Icon::CheckCircle,
            Accent::Green,
            "Payment Successful!",
            "Your payment has been processed successfully.",
        ),
        Phase::Failed => (
            Icon::XCircle,
            Accent::Red,
            "Payment Failed",
            state.error_message().unwrap_or_default(),
        ),
    };

    let details = match state.phase() {
        Phase::Success => state.payment_view().map(|view| details_for(view, today)),
        _ => None,
    };

    let mut actions = vec![Action {
        label: "Go to Dashboard".to_string(),
        target: ActionTarget::Route(dashboard_route.to_string()),
    }];
    if state.phase() == Phase::Failed {
        actions.push(Action {
            label: "Try Again".to_string(),
            target: ActionTarget::HistoryBack,
        });
    }

    RenderedView {
        phase: state.phase(),
        icon,
        accent,
        title: title.to_string(),
        description: description.to_string(),
        details,
        actions,
    }
}

fn details_for(view: &PaymentIntentView, today: NaiveDate) -> PaymentDetails {
    PaymentDetails {
        amount: view.formatted_amount(),
        payment_method: method_label(view.payment_method_kind()),
        date: today.format("%d/%m/%Y").to_string(),
        transaction_id: view.id().to_string(),
    }
}

/// `"card"` -> `"Card"`, `"us_bank_account"` -> `"Us bank account"`.
fn method_label(kind: &str) -> String {
    let spaced = kind.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.icon.glyph(), self.title)?;
        writeln!(f, "{}", self.description)?;

        if let Some(details) = &self.details {
            writeln!(f)?;
            writeln!(f, "  Amount Paid:     {}", details.amount)?;
            writeln!(f, "  Payment Method:  {}", details.payment_method)?;
            writeln!(f, "  Date:            {}", details.date)?;
            writeln!(f, "  Transaction ID:  {}", details.transaction_id)?;
        }

        writeln!(f)?;
        for action in &self.actions {
            match &action.target {
                ActionTarget::Route(route) => writeln!(f, "  [{}] -> {route}", action.label)?,
                ActionTarget::HistoryBack => writeln!(f, "  [{}] -> back", action.label)?,
            }
        }
        Ok(())
    }
}
