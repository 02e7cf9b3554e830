//! ApiClient integration tests against a mock HTTP server

use fieldforce_client::{ApiClient, ClientConfig, ClientError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
    let mut config = ClientConfig::new(format!("{}/api", server.uri())).with_timeout(5);
    if let Some(token) = token {
        config = config.with_token(token);
    }
    ApiClient::new(&config).expect("client builds")
}

#[tokio::test]
async fn get_sends_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/doctors"))
        .and(header("Authorization", "Bearer t-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("t-123"));
    let doctors: Vec<serde_json::Value> = client.get("doctors").await.unwrap();
    assert!(doctors.is_empty());
}

#[tokio::test]
async fn requests_without_a_token_omit_the_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let zones: Vec<serde_json::Value> = client.get("zones").await.unwrap();
    assert!(zones.is_empty());
}

#[tokio::test]
async fn error_responses_carry_the_server_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/doctors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.get::<Vec<serde_json::Value>>("doctors").await.unwrap_err();
    match err {
        ClientError::Api(text) => assert_eq!(text, "database down"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_bodies_fall_back_to_the_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/doctors"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.get::<Vec<serde_json::Value>>("doctors").await.unwrap_err();
    match err {
        ClientError::Api(text) => assert_eq!(text, "HTTP 502"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn statuses_map_to_typed_errors() {
    let server = MockServer::start().await;
    for (status, p) in [(401, "a"), (403, "b"), (404, "c"), (400, "d")] {
        Mock::given(method("GET"))
            .and(path(format!("/api/{p}")))
            .respond_with(ResponseTemplate::new(status).set_body_string("detail"))
            .mount(&server)
            .await;
    }

    let client = client_for(&server, None);
    assert!(matches!(
        client.get::<serde_json::Value>("a").await.unwrap_err(),
        ClientError::Unauthorized
    ));
    assert!(matches!(
        client.get::<serde_json::Value>("b").await.unwrap_err(),
        ClientError::Forbidden(_)
    ));
    assert!(matches!(
        client.get::<serde_json::Value>("c").await.unwrap_err(),
        ClientError::NotFound(_)
    ));
    assert!(matches!(
        client.get::<serde_json::Value>("d").await.unwrap_err(),
        ClientError::Validation(_)
    ));
}

#[tokio::test]
async fn no_content_reads_as_none_not_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/doctors/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/doctors/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    client.delete("doctors/7").await.unwrap();
    let updated: Option<serde_json::Value> = client
        .put("doctors/7", &serde_json::json!({"city": "Pune"}))
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[tokio::test]
async fn post_sends_the_json_body() {
    let server = MockServer::start().await;
    let body = serde_json::json!({"name": "Dr. Mehta", "specialty": "Cardiology"});
    Mock::given(method("POST"))
        .and(path("/api/doctors"))
        .and(body_json(&body))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({"id": 1, "name": "Dr. Mehta"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let created: serde_json::Value = client.post("doctors", &body).await.unwrap();
    assert_eq!(created["id"], 1);
}
