//! End-to-end tests of the composed hooks against a mock PostgREST server

use serde_json::json;
use storehooks::prelude::*;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-anon-key";
const ANA_ID: &str = "7d3a1c52-0d0b-4a8e-9a36-1b7f9b2c6e11";

fn storehooks(server: &MockServer) -> StoreHooks {
    let config = AppConfig {
        remote: RemoteConfig::new(server.uri(), KEY.to_string()),
        cache: CacheConfig::default(),
    };
    StoreHooks::new(config).unwrap()
}

fn ana_row(email: &str) -> Value {
    json!({
        "id": ANA_ID,
        "username": "ana",
        "email": email,
        "created_at": "2024-03-01T10:00:00.123456+00:00"
    })
}

#[tokio::test]
async fn test_list_is_fetched_once_until_a_mutation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("select", "*"))
        .and(header("apikey", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ana_row("ana@x.com")])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", ANA_ID).as_str()))
        .and(body_json(json!({ "email": "ana2@x.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ana_row("ana2@x.com")])))
        .expect(1)
        .mount(&server)
        .await;

    let users = storehooks(&server).users().unwrap();
    assert_eq!(users.list().await.unwrap().len(), 1);
    assert_eq!(users.list().await.unwrap().len(), 1);

    let patch = UserPatch {
        email: Some("ana2@x.com".to_string()),
        ..UserPatch::default()
    };
    let updated = users.update(ANA_ID, &patch).await.unwrap();
    assert_eq!(updated[0].email.as_deref(), Some("ana2@x.com"));

    users.list().await.unwrap();
}

#[tokio::test]
async fn test_get_by_id_miss_surfaces_store_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/posts"))
        .and(query_param("id", "eq.missing"))
        .respond_with(ResponseTemplate::new(406).set_body_json(json!({
            "code": "PGRST116",
            "details": "The result contains 0 rows",
            "hint": null,
            "message": "JSON object requested, multiple (or no) rows returned"
        })))
        .mount(&server)
        .await;

    let posts = storehooks(&server).posts().unwrap();
    let err = posts.get_by_id("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "JSON object requested, multiple (or no) rows returned"
    );
}

#[tokio::test]
async fn test_create_posts_payload_without_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({ "username": "ana", "email": "ana@x.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([ana_row("ana@x.com")])))
        .expect(1)
        .mount(&server)
        .await;

    let users = storehooks(&server).users().unwrap();
    let created = users
        .create(&NewUser {
            username: "ana".to_string(),
            email: "ana@x.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created[0].id.to_string(), ANA_ID);
}

#[test]
fn test_missing_credentials_fail_before_any_request() {
    temp_env::with_vars_unset(["SUPABASE_PROJECT_URL", "SUPABASE_API_KEY"], || {
        let err = StoreHooks::from_env().unwrap_err();
        assert!(matches!(
            err,
            StoreHooksError::Config(config::ConfigError::MissingEnv(_))
        ));
    });
}

#[test]
fn test_redis_backend_without_url_is_rejected() {
    let config = AppConfig {
        remote: RemoteConfig::new("https://demo.supabase.co".to_string(), KEY.to_string()),
        cache: CacheConfig {
            backend: CacheBackendKind::Redis,
            ..CacheConfig::default()
        },
    };
    assert!(matches!(
        StoreHooks::new(config),
        Err(StoreHooksError::Config(_))
    ));
}

#[tokio::test]
async fn test_health_check_reports_unreachable_redis() {
    let server = MockServer::start().await;
    assert!(storehooks(&server).health_check().await.is_ok());

    let config = AppConfig {
        remote: RemoteConfig::new(server.uri(), KEY.to_string()),
        cache: CacheConfig::redis("redis://127.0.0.1:9".to_string(), 60, "test".to_string()),
    };
    let unreachable = StoreHooks::new(config).unwrap();
    assert!(matches!(
        unreachable.health_check().await,
        Err(StoreHooksError::Cache(_))
    ));
}
