//! Integration tests for annotation operations.
//!
//! Annotations live under `/api/annotations` rather than the dashboards
//! prefix and need the `Project` header plus a versioned `Accept` header.

use chrono::{DateTime, TimeZone, Utc};
use nobl9_api::annotations::{AnnotationQuery, AnnotationSpec, AnnotationsClient};
use nobl9_api::{
    ApiToken, BaseUrl, ClientId, ClientSecret, ErrorKind, Nobl9Client, Nobl9Config,
    OrganizationId,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_client(server: &MockServer) -> Nobl9Client {
    let config = Nobl9Config::builder()
        .organization(OrganizationId::new("acme").unwrap())
        .api_token(ApiToken::new("static-token").unwrap())
        .client_id(ClientId::new("cid").unwrap())
        .client_secret(ClientSecret::new("csecret").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    Nobl9Client::new(config).unwrap()
}

fn window() -> (DateTime<Utc>, DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2024, 11, 4, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 11, 4, 10, 5, 0).unwrap(),
    )
}

fn deploy_spec() -> AnnotationSpec {
    let (start, end) = window();
    AnnotationSpec::new("software-slo", "prod-latency", "Deployed v1.2.3").window(start, end)
}

#[tokio::test]
async fn test_create_posts_named_annotation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/annotations"))
        .and(header("Project", "software-slo"))
        .and(header("Accept", "application/json; version=v1alpha"))
        .and(header("Authorization", "Bearer static-token"))
        .and(body_json(json!({
            "name": "deploy-v1-2-3",
            "project": "software-slo",
            "slo": "prod-latency",
            "description": "Deployed v1.2.3",
            "startTime": "2024-11-04T10:00:00Z",
            "endTime": "2024-11-04T10:05:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "deploy-v1-2-3"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let created = AnnotationsClient::new(&client)
        .create("deploy-v1-2-3", &deploy_spec())
        .await
        .unwrap();

    assert_eq!(created["name"], "deploy-v1-2-3");
}

#[tokio::test]
async fn test_create_duplicate_name_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/annotations"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "already exists"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = AnnotationsClient::new(&client)
        .create("deploy", &deploy_spec())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Api);
    assert_eq!(error.status_code(), Some(409));
}

#[tokio::test]
async fn test_list_sends_filters_and_repeated_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/annotations"))
        .and(header("Project", "software-slo"))
        .and(header("Accept", "application/json; version=v1alpha"))
        .and(query_param("slo", "prod-latency"))
        .and(query_param("from", "2024-11-04T10:00:00Z"))
        .and(query_param("name", "deploy-a"))
        .and(query_param("name", "deploy-b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"name": "deploy-a"}, {"name": "deploy-b"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let (from, _) = window();
    let query = AnnotationQuery::new()
        .slo("prod-latency")
        .from(from)
        .name("deploy-a")
        .name("deploy-b");
    let found = AnnotationsClient::new(&client)
        .list("software-slo", &query)
        .await
        .unwrap();

    assert_eq!(found.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/annotations/deploy%20v1"))
        .and(header("Project", "software-slo"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    AnnotationsClient::new(&client)
        .delete("software-slo", "deploy v1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_unknown_annotation_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/annotations/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = AnnotationsClient::new(&client)
        .delete("software-slo", "missing")
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_upsert_puts_spec_at_named_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/annotations/deploy-v1"))
        .and(header("Project", "software-slo"))
        .and(body_json(json!({
            "project": "software-slo",
            "slo": "prod-latency",
            "description": "Deployed v1.2.3",
            "startTime": "2024-11-04T10:00:00Z",
            "endTime": "2024-11-04T10:05:00Z",
            "labels": {"team": ["backend"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "deploy-v1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let spec = deploy_spec().label("team", "backend");
    let upserted = AnnotationsClient::new(&client)
        .upsert("deploy-v1", &spec)
        .await
        .unwrap();

    assert_eq!(upserted["name"], "deploy-v1");
}

#[tokio::test]
async fn test_create_for_project_annotates_each_slo() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/slos"))
        .and(header("Project", "software-slo"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"name": "latency"}, {"name": "availability"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/annotations"))
        .and(body_json(json!({
            "name": "deploy-latency",
            "project": "software-slo",
            "slo": "latency",
            "description": "Deployed v1.2.3",
            "startTime": "2024-11-04T10:00:00Z",
            "endTime": "2024-11-04T10:05:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "deploy-latency"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/annotations"))
        .and(body_json(json!({
            "name": "deploy-availability",
            "project": "software-slo",
            "slo": "availability",
            "description": "Deployed v1.2.3",
            "startTime": "2024-11-04T10:00:00Z",
            "endTime": "2024-11-04T10:05:00Z"
        })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "exists"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let outcomes = AnnotationsClient::new(&client)
        .create_for_project("deploy", &deploy_spec())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].slo, "latency");
    assert_eq!(outcomes[0].name, "deploy-latency");
    assert!(outcomes[0].result.is_ok());
    assert_eq!(outcomes[1].name, "deploy-availability");
    assert_eq!(outcomes[1].result.as_ref().unwrap_err().status_code(), Some(409));
}

#[tokio::test]
async fn test_create_for_project_single_slo_keeps_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/slos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"name": "latency"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/annotations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "deploy"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let outcomes = AnnotationsClient::new(&client)
        .create_for_project("deploy", &deploy_spec())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].name, "deploy");
}

#[tokio::test]
async fn test_create_for_project_fails_when_slos_cannot_be_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/slos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad token"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/annotations"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = AnnotationsClient::new(&client)
        .create_for_project("deploy", &deploy_spec())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Authentication);
}
