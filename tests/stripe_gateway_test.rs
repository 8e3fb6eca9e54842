use fee_checkout::config::GatewayConfig;
use fee_checkout::domain::intent::IntentStatus;
use fee_checkout::domain::ports::PaymentGateway;
use fee_checkout::error::CheckoutError;
use fee_checkout::infrastructure::stripe::StripeGateway;
use httpmock::prelude::*;
use serde_json::json;

fn gateway(server: &MockServer) -> StripeGateway {
    StripeGateway::new(&GatewayConfig {
        api_base: server.base_url(),
        publishable_key: "pk_test_abc".to_string(),
        timeout_ms: 5_000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_retrieves_intent_by_client_secret() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/payment_intents/pi_abc123456789")
                .query_param("client_secret", "pi_abc123456789_secret_xyz")
                .header("authorization", "Bearer pk_test_abc");
            then.status(200).json_body(json!({
                "id": "pi_abc123456789",
                "object": "payment_intent",
                "amount": 150000,
                "currency": "inr",
                "status": "succeeded",
                "payment_method_types": ["card"]
            }));
        })
        .await;

    let intent = gateway(&server)
        .retrieve_intent("pi_abc123456789_secret_xyz")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(intent.id(), "pi_abc123456789");
    assert_eq!(intent.amount_minor().value(), 150000);
    assert_eq!(intent.currency().code(), "INR");
    assert_eq!(*intent.status(), IntentStatus::Succeeded);
    assert_eq!(intent.formatted_amount(), "₹1,500.00");
}

#[tokio::test]
async fn test_gateway_error_message_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/payment_intents/pi_missing");
            then.status(404).json_body(json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "No such payment_intent: 'pi_missing'"
                }
            }));
        })
        .await;

    let result = gateway(&server)
        .retrieve_intent("pi_missing_secret_q")
        .await;

    match result {
        Err(CheckoutError::Gateway(message)) => {
            assert_eq!(message, "No such payment_intent: 'pi_missing'")
        }
        other => panic!("expected gateway error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/payment_intents/pi_1");
            then.status(200).json_body(json!({
                "id": "pi_1",
                "amount": 100,
                "currency": "rupees",
                "status": "succeeded"
            }));
        })
        .await;

    let result = gateway(&server).retrieve_intent("pi_1_secret_z").await;
    assert!(matches!(result, Err(CheckoutError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unreachable_gateway_is_http_error() {
    let gateway = StripeGateway::new(&GatewayConfig {
        api_base: "http://127.0.0.1:9".to_string(),
        publishable_key: "pk_test_abc".to_string(),
        timeout_ms: 2_000,
    })
    .unwrap();

    let result = gateway.retrieve_intent("pi_1_secret_z").await;
    assert!(matches!(result, Err(CheckoutError::Http(_))));
}

#[tokio::test]
async fn test_transport_error_does_not_expose_client_secret() {
    let gateway = StripeGateway::new(&GatewayConfig {
        api_base: "http://127.0.0.1:9".to_string(),
        publishable_key: "pk_test_abc".to_string(),
        timeout_ms: 2_000,
    })
    .unwrap();

    let error = gateway
        .retrieve_intent("pi_1_secret_TOPSECRET")
        .await
        .unwrap_err();

    assert!(matches!(error, CheckoutError::Http(_)));
    assert!(!error.to_string().contains("TOPSECRET"));
    assert!(!format!("{error:?}").contains("TOPSECRET"));
}

#[tokio::test]
async fn test_undecodable_body_does_not_expose_client_secret() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/payment_intents/pi_1");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let error = gateway(&server)
        .retrieve_intent("pi_1_secret_TOPSECRET")
        .await
        .unwrap_err();

    assert!(matches!(error, CheckoutError::InvalidResponse(_)));
    assert!(!error.to_string().contains("TOPSECRET"));
}
