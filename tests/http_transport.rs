//! HttpTransport against a local wiremock server: authentication, error
//! mapping and page following over real HTTP.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{
    basic_auth, bearer_token, body_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zdesk::{
    ApiPath, Config, Credentials, EndpointGroup, HttpTransport, ResourceKind, Transport,
    ZendeskClient, ZendeskError,
};

const TOKEN: &str = "abc123def456";

fn token_credentials() -> Credentials {
    Credentials::ApiToken {
        username: "agent@acme.com".to_string(),
        token: TOKEN.to_string(),
    }
}

fn config_for(server: &MockServer, credentials: Credentials) -> Config {
    Config::new("acme", credentials)
        .unwrap()
        .with_endpoint_uri(format!("{}/api/v2", server.uri()))
        .unwrap()
}

fn client_for(server: &MockServer) -> ZendeskClient {
    ZendeskClient::new(&config_for(server, token_credentials())).unwrap()
}

#[tokio::test]
async fn api_token_uses_basic_auth_with_token_suffix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views/12345.json"))
        .and(basic_auth("agent@acme.com/token", TOKEN))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"view": {"id": 12345, "title": "Unassigned"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let view = client_for(&server).views().unwrap().show(12345).await.unwrap();

    assert_eq!(view.id, 12345);
    assert_eq!(view.display_title(), "Unassigned");
}

#[tokio::test]
async fn oauth_uses_bearer_token_and_on_behalf_of() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/me.json"))
        .and(bearer_token("oauth-token-42"))
        .and(header("x-on-behalf-of", "end-user@acme.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 7}})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        Credentials::OAuth {
            token: "oauth-token-42".to_string(),
        },
    )
    .with_as_user("end-user@acme.com");
    let transport = HttpTransport::new(&config).unwrap();

    transport.test_connection().await.unwrap();
}

#[tokio::test]
async fn show_counts_sends_comma_joined_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views/count_many.json"))
        .and(query_param("ids", "12345,67890"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"view_counts": [
            {"view_id": 12345, "value": 1},
            {"view_id": 67890, "value": 2}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let counts = client_for(&server)
        .views()
        .unwrap()
        .show_counts(&[12345, 67890])
        .await
        .unwrap();

    assert_eq!(counts.len(), 2);
}

#[tokio::test]
async fn reorder_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/views/reorder.json"))
        .and(body_json(json!({"view_order": [3, 1, 2]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"views": []})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .views()
        .unwrap()
        .reorder(&[3, 1, 2])
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_with_empty_body_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/views/12345.json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .views()
        .unwrap()
        .delete(12345)
        .await
        .unwrap();
}

#[tokio::test]
async fn list_follows_next_page_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views.json"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "views": [{"id": 1}, {"id": 2}],
            "next_page": format!("{}/api/v2/views.json?page=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views.json"))
        .and(query_param("page", "2"))
        .and(basic_auth("agent@acme.com/token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "views": [{"id": 3}],
            "next_page": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let views = client_for(&server).views().unwrap().list().await.unwrap();

    assert_eq!(views.iter().map(|v| v.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[tokio::test]
async fn cross_host_next_link_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [{"id": 1}],
            "next_page": "http://attacker.example.com/api/v2/tickets.json?page=2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .resource(ResourceKind::Tickets)
        .unwrap()
        .list()
        .await
        .unwrap_err();

    assert!(matches!(err, ZendeskError::Validation(_)));
    assert!(err.to_string().contains("host mismatch"));
}

#[tokio::test]
async fn not_found_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views/999.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "RecordNotFound"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .views()
        .unwrap()
        .show(999)
        .await
        .unwrap_err();

    assert!(matches!(err, ZendeskError::NotFound { .. }));
    assert!(err.to_string().contains("views/999"));
    assert_eq!(err.body(), Some(&json!({"error": "RecordNotFound"})));
}

#[tokio::test]
async fn forbidden_keeps_status_and_body() {
    let server = MockServer::start().await;
    let error_body = json!({
        "error": "Forbidden",
        "description": "You do not have access to this page"
    });
    Mock::given(method("GET"))
        .and(path("/api/v2/views/5.json"))
        .respond_with(ResponseTemplate::new(403).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .views()
        .unwrap()
        .show(5)
        .await
        .unwrap_err();

    match &err {
        ZendeskError::Authentication { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, &error_body);
        }
        other => panic!("expected Authentication, got {:?}", other),
    }
    assert!(err.to_string().contains("You do not have access"));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views.json"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Couldn't authenticate you"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).views().unwrap().list().await.unwrap_err();

    assert!(matches!(err, ZendeskError::Authentication { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
}

#[tokio::test]
async fn rate_limit_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views/active.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .views()
        .unwrap()
        .list_active()
        .await
        .unwrap_err();

    match err {
        ZendeskError::RateLimited { retry_after, .. } => {
            assert_eq!(retry_after, Some(Duration::from_secs(30)));
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn service_unavailable_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views/1/count.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .views()
        .unwrap()
        .show_count(1)
        .await
        .unwrap_err();

    assert!(matches!(err, ZendeskError::ServiceUnavailable { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert_eq!(err.body(), Some(&serde_json::Value::Null));
}

#[tokio::test]
async fn unprocessable_entity_keeps_error_body() {
    let server = MockServer::start().await;
    let error_body = json!({
        "error": "RecordInvalid",
        "description": "Record validation errors",
        "details": {"title": [{"description": "Title: cannot be blank"}]}
    });
    Mock::given(method("POST"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(422).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .resource(ResourceKind::Tickets)
        .unwrap()
        .create(json!({"ticket": {}}))
        .await
        .unwrap_err();

    match err {
        ZendeskError::Api { status, body } => {
            assert_eq!(status.as_u16(), 422);
            assert_eq!(body, error_body);
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn error_body_is_scrubbed_of_secret() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users.json"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string(format!("internal error for token {}", TOKEN)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .resource(ResourceKind::Users)
        .unwrap()
        .list()
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(!text.contains(TOKEN));
    assert!(text.contains("[REDACTED]"));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"views": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server, token_credentials()).with_timeout(Duration::from_millis(200));
    let client = ZendeskClient::new(&config).unwrap();

    let err = client.views().unwrap().list().await.unwrap_err();

    assert!(matches!(err, ZendeskError::Timeout { .. }));
}

#[tokio::test]
async fn non_json_success_body_is_returned_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/views/7/export.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id,subject\n1,Help\n"))
        .mount(&server)
        .await;

    let config = config_for(&server, token_credentials());
    let transport = Arc::new(HttpTransport::new(&config).unwrap());
    let body = transport
        .get(ApiPath::new().lit("views").id(7).lit("export"))
        .await
        .unwrap();

    assert_eq!(body, json!("id,subject\n1,Help\n"));
}

#[tokio::test]
async fn voice_group_uses_configured_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/voice/greetings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "greetings": [{"id": 1, "name": "Welcome"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::new("acme", token_credentials())
        .unwrap()
        .with_endpoint_group(EndpointGroup::Voice)
        .with_endpoint_uri(format!("{}/api/v2/channels/voice", server.uri()))
        .unwrap();
    let client = ZendeskClient::new(&config).unwrap();

    let greetings = client
        .resource(ResourceKind::Greetings)
        .unwrap()
        .list()
        .await
        .unwrap();

    assert_eq!(greetings, vec![json!({"id": 1, "name": "Welcome"})]);
}
