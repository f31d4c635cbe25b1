mod common;

use std::time::Duration;

use common::{issuer_config, PRODUCTION_PATH, SANDBOX_PATH};
use fractic_receipt_validation::{
    config::SharedSecret,
    domain::{
        entities::{
            issuer_status::IssuerStatus, receipt::Receipt,
            verification_environment::VerificationEnvironment,
        },
        repositories::issuer_repository::IssuerRepository,
    },
    errors::ReceiptValidationError,
    util::issuer_client,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_status(server: &MockServer, at: &str, status: i64, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": status })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn request_bodies(server: &MockServer, at: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.url.path() == at)
        .map(|request| request.body_json::<Value>().unwrap())
        .collect()
}

#[tokio::test]
async fn valid_production_receipt_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "latest_receipt_info": [
                { "product_id": "p.monthly", "expires_date_ms": "9999999999999" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_status(&server, SANDBOX_PATH, 0, 0).await;

    let client = issuer_client(&issuer_config(&server)).unwrap();
    let response = client.verify(&Receipt::from_base64("QUJD"), None).await.unwrap();

    assert_eq!(response.status, IssuerStatus::Valid);
    assert_eq!(response.environment, VerificationEnvironment::Production);
    assert_eq!(response.latest_receipt_info.len(), 1);
    assert_eq!(response.latest_receipt_info[0].product_id, "p.monthly");
}

#[tokio::test]
async fn sandbox_redirect_triggers_exactly_one_identical_retry() {
    let server = MockServer::start().await;
    mount_status(&server, PRODUCTION_PATH, 21007, 1).await;
    mount_status(&server, SANDBOX_PATH, 0, 1).await;

    let client = issuer_client(&issuer_config(&server)).unwrap();
    let secret = SharedSecret::new("configured-secret");
    let response = client
        .verify(&Receipt::from_base64("QUJD"), Some(&secret))
        .await
        .unwrap();

    assert_eq!(response.status, IssuerStatus::Valid);
    assert_eq!(response.environment, VerificationEnvironment::Sandbox);

    let production = request_bodies(&server, PRODUCTION_PATH).await;
    let sandbox = request_bodies(&server, SANDBOX_PATH).await;
    assert_eq!(production, sandbox);
    assert_eq!(
        production[0],
        json!({
            "receipt-data": "QUJD",
            "password": "configured-secret",
            "exclude-old-transactions": true,
        })
    );
}

#[tokio::test]
async fn sandbox_response_is_never_retried() {
    let server = MockServer::start().await;
    mount_status(&server, PRODUCTION_PATH, 21007, 1).await;
    mount_status(&server, SANDBOX_PATH, 21007, 1).await;

    let client = issuer_client(&issuer_config(&server)).unwrap();
    let response = client.verify(&Receipt::from_base64("QUJD"), None).await.unwrap();

    assert_eq!(response.status, IssuerStatus::SandboxReceiptInProduction);
    assert_eq!(response.environment, VerificationEnvironment::Sandbox);
}

#[tokio::test]
async fn password_is_absent_without_a_secret() {
    let server = MockServer::start().await;
    mount_status(&server, PRODUCTION_PATH, 0, 1).await;

    let client = issuer_client(&issuer_config(&server)).unwrap();
    client.verify(&Receipt::from_base64("QUJD"), None).await.unwrap();

    let body = &request_bodies(&server, PRODUCTION_PATH).await[0];
    assert!(body.get("password").is_none());
    assert_eq!(body["receipt-data"], "QUJD");
}

#[tokio::test]
async fn rejection_is_a_response_not_an_error() {
    let server = MockServer::start().await;
    mount_status(&server, PRODUCTION_PATH, 21004, 1).await;

    let client = issuer_client(&issuer_config(&server)).unwrap();
    let response = client.verify(&Receipt::from_base64("QUJD"), None).await.unwrap();

    assert_eq!(response.status, IssuerStatus::SharedSecretMismatch);
    assert_eq!(response.status.message(), "The shared secret does not match");
}

#[tokio::test]
async fn non_json_body_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = issuer_client(&issuer_config(&server)).unwrap();
    let err = client
        .verify(&Receipt::from_base64("QUJD"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ReceiptValidationError::MalformedResponse(_)));
}

#[tokio::test]
async fn body_without_status_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "receipt": {} })))
        .mount(&server)
        .await;

    let client = issuer_client(&issuer_config(&server)).unwrap();
    let err = client
        .verify(&Receipt::from_base64("QUJD"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ReceiptValidationError::MalformedResponse(_)));
}

#[tokio::test]
async fn server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = issuer_client(&issuer_config(&server)).unwrap();
    let err = client
        .verify(&Receipt::from_base64("QUJD"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ReceiptValidationError::TransportFailure(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn hung_issuer_times_out_as_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": 0 }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = issuer_config(&server);
    config.timeout = Duration::from_millis(200);
    let client = issuer_client(&config).unwrap();
    let err = client
        .verify(&Receipt::from_base64("QUJD"), None)
        .await
        .unwrap_err();

    match err {
        ReceiptValidationError::TransportFailure(message) => {
            assert!(message.contains("timed out"), "{message}")
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}
