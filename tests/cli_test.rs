use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 5] = [
    "FEE_CHECKOUT_PUBLISHABLE_KEY",
    "FEE_CHECKOUT_GATEWAY_URL",
    "FEE_CHECKOUT_BACKEND_URL",
    "FEE_CHECKOUT_BACKEND_TOKEN",
    "RUST_LOG",
];

fn command() -> Command {
    let mut cmd = Command::new(cargo_bin!("fee-checkout"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn mock_succeeded_intent(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/payment_intents/pi_abc123456789")
            .query_param("client_secret", "pi_abc123456789_secret_q");
        then.status(200).json_body(json!({
            "id": "pi_abc123456789",
            "amount": 150000,
            "currency": "inr",
            "status": "succeeded",
            "payment_method_types": ["card"]
        }));
    })
}

#[test]
fn test_cli_success_end_to_end() {
    let server = MockServer::start();
    let intent = mock_succeeded_intent(&server);
    let update = server.mock(|when, then| {
        when.method(POST)
            .path("/stripe/manual-update")
            .json_body(json!({"paymentId": "42", "paymentIntentId": "pi_abc123456789"}));
        then.status(200);
    });

    command()
        .arg("--publishable-key")
        .arg("pk_test_abc")
        .arg("--gateway-url")
        .arg(server.base_url())
        .arg("--backend-url")
        .arg(server.base_url())
        .arg("https://fees.example.edu/payment/success?payment_intent_client_secret=pi_abc123456789_secret_q&paymentId=42")
        .assert()
        .success()
        .stdout(predicate::str::contains("Payment Successful!"))
        .stdout(predicate::str::contains("Amount Paid:     ₹1,500.00"))
        .stdout(predicate::str::contains("[success] Payment Successful"))
        .stdout(predicate::str::contains("Try Again").not());

    intent.assert();
    update.assert();
}

#[test]
fn test_cli_missing_parameters_is_rendered_failure() {
    command()
        .arg("--publishable-key")
        .arg("pk_test_abc")
        .arg("--backend-url")
        .arg("http://127.0.0.1:9")
        .arg("https://fees.example.edu/payment/success")
        .assert()
        .success()
        .stdout(predicate::str::contains("Payment Failed"))
        .stdout(predicate::str::contains("Missing payment information"))
        .stdout(predicate::str::contains("[Try Again] -> back"));
}

#[test]
fn test_cli_json_output_from_config_file() {
    let server = MockServer::start();
    mock_succeeded_intent(&server);

    let mut config = NamedTempFile::new().unwrap();
    writeln!(
        config,
        r#"
dashboard_route = "/student/fees"

[gateway]
api_base = "{}"
publishable_key = "pk_test_abc"

[backend]
base_url = "{}"
"#,
        server.base_url(),
        server.base_url()
    )
    .unwrap();

    let output = command()
        .arg("--config")
        .arg(config.path())
        .arg("--json")
        .arg("?clientSecret=pi_abc123456789_secret_q")
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[success] Payment Successful"));

    assert_eq!(view["phase"], "success");
    assert_eq!(view["details"]["amount"], "₹1,500.00");
    assert_eq!(view["actions"][0]["target"]["route"], "/student/fees");
}

#[test]
fn test_cli_requires_publishable_key() {
    command()
        .arg("--backend-url")
        .arg("http://127.0.0.1:9")
        .arg("?clientSecret=cs_test_123")
        .assert()
        .failure()
        .stderr(predicate::str::contains("publishable key is not set"));
}
