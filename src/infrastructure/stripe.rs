use crate::config::GatewayConfig;
use crate::domain::intent::{IntentStatus, PaymentIntentView};
use crate::domain::ports::PaymentGateway;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

const SECRET_MARKER: &str = "_secret_";
const DEFAULT_METHOD_KIND: &str = "card";

/// Payment intent as returned by `GET /v1/payment_intents/{id}`.
#[derive(Debug, Deserialize)]
pub struct IntentResponse {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub payment_method_types: Vec<String>,
}

impl TryFrom<IntentResponse> for PaymentIntentView {
    type Error = CheckoutError;

    fn try_from(response: IntentResponse) -> Result<Self> {
        let kind = response
            .payment_method_types
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_METHOD_KIND.to_string());
        PaymentIntentView::new(
            response.id,
            response.amount,
            &response.currency,
            IntentStatus::from(response.status.as_str()),
            kind,
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// The intent id is the client secret up to its `_secret_` marker.
pub fn intent_id_from_secret(client_secret: &str) -> &str {
    client_secret
        .split_once(SECRET_MARKER)
        .map_or(client_secret, |(id, _)| id)
}

/// Retrieves payment intents with a publishable key, the way a browser
/// checkout page does.
#[derive(Clone)]
pub struct StripeGateway {
    http: Client,
    api_base: String,
    publishable_key: String,
}

impl StripeGateway {
    /// Builds a client with rustls and the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            publishable_key: config.publishable_key.clone(),
        })
    }
}

impl StripeGateway {
    /// `{api_base}/v1/payment_intents/{intent_id}`, with the id encoded as a
    /// single path segment.
    fn intent_url(&self, intent_id: &str) -> Result<Url> {
        if matches!(intent_id, "" | "." | "..") {
            return Err(CheckoutError::Gateway(
                "client secret does not name a payment intent".to_string(),
            ));
        }
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| CheckoutError::Config(format!("invalid gateway api base: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| CheckoutError::Config("gateway api base cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(["v1", "payment_intents", intent_id]);
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn retrieve_intent(&self, client_secret: &str) -> Result<PaymentIntentView> {
        let intent_id = intent_id_from_secret(client_secret);
        let url = self.intent_url(intent_id)?;
        debug!(%intent_id, "Retrieving payment intent");

        // Errors carry the request URL, which holds the client secret.
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.publishable_key)
            .query(&[("client_secret", client_secret)])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| format!("gateway answered {status}"));
            return Err(CheckoutError::Gateway(message));
        }

        let body: IntentResponse = response
            .json()
            .await
            .map_err(|e| CheckoutError::InvalidResponse(e.without_url().to_string()))?;
        PaymentIntentView::try_from(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_id_from_secret() {
        assert_eq!(intent_id_from_secret("pi_3Nabc_secret_xyz"), "pi_3Nabc");
        assert_eq!(intent_id_from_secret("cs_test_123"), "cs_test_123");
    }

    fn gateway(api_base: &str) -> StripeGateway {
        StripeGateway::new(&GatewayConfig {
            api_base: api_base.to_string(),
            publishable_key: "pk_test_abc".to_string(),
            timeout_ms: 1_000,
        })
        .unwrap()
    }

    #[test]
    fn test_intent_id_is_a_single_path_segment() {
        let url = gateway("https://api.example.com").intent_url("../v1/customers?x=1#y").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/payment_intents/..%2Fv1%2Fcustomers%3Fx=1%23y"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let gateway = gateway("https://api.example.com");
        for intent_id in ["", ".", ".."] {
            assert!(matches!(
                gateway.intent_url(intent_id),
                Err(CheckoutError::Gateway(_))
            ));
        }
    }

    #[test]
    fn test_intent_url_keeps_api_base_path() {
        let url = gateway("http://127.0.0.1:8080/stripe/").intent_url("pi_1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/stripe/v1/payment_intents/pi_1");
    }

    #[test]
    fn test_response_validation() {
        let response: IntentResponse = serde_json::from_str(
            r#"{"id":"pi_1","amount":150000,"currency":"inr","status":"succeeded","payment_method_types":["upi","card"]}"#,
        )
        .unwrap();
        let view = PaymentIntentView::try_from(response).unwrap();
        assert_eq!(view.currency().code(), "INR");
        assert_eq!(view.payment_method_kind(), "upi");
        assert_eq!(*view.status(), IntentStatus::Succeeded);
    }

    #[test]
    fn test_missing_method_types_defaults_to_card() {
        let response: IntentResponse = serde_json::from_str(
            r#"{"id":"pi_1","amount":100,"currency":"usd","status":"processing"}"#,
        )
        .unwrap();
        let view = PaymentIntentView::try_from(response).unwrap();
        assert_eq!(view.payment_method_kind(), "card");
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let response = IntentResponse {
            id: "pi_1".to_string(),
            amount: -5,
            currency: "inr".to_string(),
            status: "succeeded".to_string(),
            payment_method_types: vec![],
        };
        assert!(matches!(
            PaymentIntentView::try_from(response),
            Err(CheckoutError::InvalidResponse(_))
        ));
    }
}
