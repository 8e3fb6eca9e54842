use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// An amount expressed in minor currency units (paise, cents).
///
/// Gateways report amounts as integers in the smallest unit of the currency.
/// The value is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MinorAmount(i64);

impl MinorAmount {
    /// Creates a new amount, rejecting negative values.
    ///
    /// # Arguments
    ///
    /// * `value` - The amount in minor units as reported by the gateway.
    pub fn new(value: i64) -> Result<Self> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(CheckoutError::InvalidResponse(format!(
                "amount must not be negative, got {value}"
            )))
        }
    }

    /// The raw amount in minor units.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The amount in major units, exact to two decimal places.
    pub fn major(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl TryFrom<i64> for MinorAmount {
    type Error = CheckoutError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// 1,234,567
    Western,
    /// 12,34,567
    Indian,
}

/// An upper-case ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Parses a three-letter currency code, in any case.
    ///
    /// # Arguments
    ///
    /// * `code` - The code as reported by the gateway, e.g. `inr`.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(CheckoutError::InvalidResponse(format!(
                "invalid currency code '{code}'"
            )))
        }
    }

    /// The upper-case ISO 4217 code.
    pub fn code(&self) -> &str {
        &self.0
    }

    fn symbol(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "INR" => Some("₹"),
            "USD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            _ => None,
        }
    }

    fn grouping(&self) -> Grouping {
        match self.0.as_str() {
            "INR" => Grouping::Indian,
            _ => Grouping::Western,
        }
    }

    /// Formats `amount` the way a receipt shows it, e.g. `₹1,50,000.00`.
    pub fn format(&self, amount: MinorAmount) -> String {
        let minor = amount.value();
        let whole = group_digits(&(minor / 100).to_string(), self.grouping());
        let fraction = minor % 100;
        match self.symbol() {
            Some(symbol) => format!("{symbol}{whole}.{fraction:02}"),
            None => format!("{} {whole}.{fraction:02}", self.0),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let step = match grouping {
        Grouping::Western => 3,
        Grouping::Indian => 2,
    };

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// Lifecycle status of a payment intent as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum IntentStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    /// Any status this flow has no dedicated handling for, kept verbatim.
    Other(String),
}

impl IntentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            IntentStatus::Succeeded => "succeeded",
            IntentStatus::Processing => "processing",
            IntentStatus::RequiresPaymentMethod => "requires_payment_method",
            IntentStatus::Other(status) => status,
        }
    }
}

impl From<&str> for IntentStatus {
    fn from(status: &str) -> Self {
        match status {
            "succeeded" => IntentStatus::Succeeded,
            "processing" => IntentStatus::Processing,
            "requires_payment_method" => IntentStatus::RequiresPaymentMethod,
            other => IntentStatus::Other(other.to_string()),
        }
    }
}

impl From<IntentStatus> for String {
    fn from(status: IntentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The validated view of a gateway payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentView {
    id: String,
    amount_minor: MinorAmount,
    currency: Currency,
    status: IntentStatus,
    payment_method_kind: String,
}

impl PaymentIntentView {
    /// Creates a new view from gateway fields, validating each one.
    ///
    /// # Arguments
    ///
    /// * `id` - The gateway's intent id, which must not be blank.
    /// * `amount_minor` - The amount in minor units.
    /// * `currency` - The three-letter currency code.
    /// * `status` - The intent status.
    /// * `payment_method_kind` - The payment method type, e.g. `card`.
    pub fn new(
        id: impl Into<String>,
        amount_minor: i64,
        currency: &str,
        status: IntentStatus,
        payment_method_kind: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CheckoutError::InvalidResponse(
                "payment intent id is empty".to_string(),
            ));
        }
        Ok(Self {
            id,
            amount_minor: MinorAmount::new(amount_minor)?,
            currency: Currency::parse(currency)?,
            status,
            payment_method_kind: payment_method_kind.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount_minor(&self) -> MinorAmount {
        self.amount_minor
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn status(&self) -> &IntentStatus {
        &self.status
    }

    pub fn payment_method_kind(&self) -> &str {
        &self.payment_method_kind
    }

    pub fn formatted_amount(&self) -> String {
        self.currency.format(self.amount_minor)
    }
}
