//! Integration tests for the natural-language query endpoint

use dineboard_core::views::ai_query::{detect_visualization, Visualization};
use dineboard_core::{ApiClient, CoreError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri())).unwrap()
}

#[tokio::test]
async fn test_successful_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-query"))
        .and(body_json(json!({"question": "revenue by store"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sql": "SELECT store, SUM(total) AS revenue FROM sales GROUP BY store",
            "data": [
                {"store": "Centro", "revenue": 15230.5},
                {"store": "Norte", "revenue": 8200}
            ],
            "rowCount": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .await
        .ai_query("  revenue by store  ")
        .await
        .unwrap();

    assert!(response.sql.as_deref().unwrap().starts_with("SELECT"));
    assert_eq!(response.columns(), vec!["store", "revenue"]);
    assert_eq!(response.rows(), 2);
    assert_eq!(detect_visualization(&response.data), Visualization::Chart);
}

#[tokio::test]
async fn test_blocked_keyword_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Query blocked",
            "message": "Only read queries are allowed",
            "blockedKeyword": "DROP"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .ai_query("drop the sales table")
        .await
        .unwrap_err();

    match err {
        CoreError::QueryRejected {
            status,
            error,
            message,
            blocked_keyword,
        } => {
            assert_eq!(status, 400);
            assert_eq!(error, "Query blocked");
            assert_eq!(message.as_deref(), Some("Only read queries are allowed"));
            assert_eq!(blocked_keyword.as_deref(), Some("DROP"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_question_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).await.ai_query("   ").await.unwrap_err();
    assert!(matches!(err, CoreError::EmptyQuestion));
    server.verify().await;
}

#[tokio::test]
async fn test_rejection_with_null_data_keeps_server_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Query contains forbidden keyword",
            "blockedKeyword": "DROP",
            "data": null,
            "rowCount": "n/a"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .ai_query("drop everything")
        .await
        .unwrap_err();

    match err {
        CoreError::QueryRejected {
            status,
            error,
            message,
            blocked_keyword,
        } => {
            assert_eq!(status, 400);
            assert_eq!(error, "Query contains forbidden keyword");
            assert_eq!(message, None);
            assert_eq!(blocked_keyword.as_deref(), Some("DROP"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_null_data_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sql": "SELECT 1",
            "data": null
        })))
        .mount(&server)
        .await;

    let response = client(&server).await.ai_query("anything").await.unwrap();

    assert_eq!(response.sql.as_deref(), Some("SELECT 1"));
    assert!(response.data.is_empty());
    assert_eq!(response.rows(), 0);
    assert_eq!(detect_visualization(&response.data), Visualization::Table);
}

#[tokio::test]
async fn test_non_object_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).await.ai_query("anything").await.unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }));
}
