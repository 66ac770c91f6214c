//! Integration tests for the HTTP API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use taskwise_domain::{Clock, Priority};
use taskwise_llm::{LlmError, MockProvider};
use taskwise_parser::{ParserConfig, TaskParser};
use taskwise_server::handlers::{
    create_router, AnalyzeTodosResponse, AppState, ErrorResponse, HealthCheckResponse,
    ParseTodoResponse,
};
use tower::ServiceExt; // for oneshot

/// Helper to create a router backed by `llm`, pinned to 2026-01-09
fn create_app(llm: MockProvider) -> Router {
    create_app_with(llm, ParserConfig::default())
}

fn create_app_with(llm: MockProvider, config: ParserConfig) -> Router {
    let parser = TaskParser::new(llm, config).unwrap();
    create_router(AppState {
        parser: Arc::new(parser),
        clock: Clock::Fixed(NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()),
    })
}

async fn post_parse(app: Router, body: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai/parse-todo")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn expect_error(app: Router, body: &str, status: StatusCode, code: &str) -> ErrorResponse {
    let (actual, bytes) = post_parse(app, body).await;
    assert_eq!(actual, status);
    let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.code, code);
    error
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_app(MockProvider::default());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.model, "mock");
    assert_eq!(health.classification, "local");
}

#[tokio::test]
async fn test_parse_meeting_tomorrow() {
    let llm = MockProvider::new(
        r#"{"title": "팀 회의 준비", "description": "중요한 팀 회의 준비",
            "due_date": "2026-01-10", "due_time": "15:00",
            "priority": "medium", "category": []}"#,
    );
    let app = create_app(llm);

    let (status, bytes) = post_parse(
        app,
        r#"{"naturalLanguage": "내일 오후 3시까지 중요한 팀 회의 준비하기"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: ParseTodoResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(response.success);
    assert!(!response.has_past_date);
    assert_eq!(response.data.title, "팀 회의 준비");
    assert_eq!(response.data.due_date, NaiveDate::from_ymd_opt(2026, 1, 10));
    assert_eq!(response.data.due_time.as_deref(), Some("15:00"));
    assert_eq!(response.data.priority, Priority::High);
    assert_eq!(response.data.category, vec!["업무"]);
}

#[tokio::test]
async fn test_response_wire_shape() {
    let app = create_app(MockProvider::new(r#"{"title": "책 읽기"}"#));

    let (status, bytes) = post_parse(app, r#"{"naturalLanguage": "여유롭게 책 읽기"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["hasPastDate"], false);
    assert_eq!(json["data"]["title"], "책 읽기");
    assert_eq!(json["data"]["description"], "");
    assert!(json["data"]["due_date"].is_null());
    assert!(json["data"]["due_time"].is_null());
    assert_eq!(json["data"]["priority"], "low");
    assert_eq!(json["data"]["category"], serde_json::json!(["학습"]));
}

#[tokio::test]
async fn test_past_date_is_flagged_not_rejected() {
    let app = create_app(MockProvider::new(
        r#"{"title": "보고서", "due_date": "2026-01-08", "due_time": "09:00"}"#,
    ));

    let (status, bytes) = post_parse(app, r#"{"naturalLanguage": "어제 보고서 제출"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["hasPastDate"], true);
    assert!(json["data"]["due_date"].is_null());
    assert!(json["data"]["due_time"].is_null());
}

#[tokio::test]
async fn test_meaningless_input_rejected_without_llm_call() {
    let llm = MockProvider::new("{}");
    let app = create_app(llm.clone());

    let error = expect_error(
        app,
        r#"{"naturalLanguage": "ㅁㅁㅁ"}"#,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
    )
    .await;

    assert_eq!(error.error, "Please enter a meaningful task description.");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_missing_or_non_string_input() {
    for body in [r#"{}"#, r#"{"naturalLanguage": 5}"#, r#"[]"#, r#""text""#] {
        let error = expect_error(
            create_app(MockProvider::default()),
            body,
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
        )
        .await;
        assert_eq!(error.error, "Please enter a task.");
    }
}

#[tokio::test]
async fn test_too_long_input() {
    let body = serde_json::json!({ "naturalLanguage": "가".repeat(501) }).to_string();
    expect_error(
        create_app(MockProvider::default()),
        &body,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
    )
    .await;
}

#[tokio::test]
async fn test_invalid_json_body() {
    expect_error(
        create_app(MockProvider::default()),
        "{naturalLanguage: oops",
        StatusCode::BAD_REQUEST,
        "INVALID_JSON",
    )
    .await;
}

#[tokio::test]
async fn test_extractor_failures_map_to_codes() {
    let cases = [
        (
            LlmError::Authentication("HTTP 403".into()),
            StatusCode::UNAUTHORIZED,
            "AUTH_ERROR",
        ),
        (
            LlmError::ModelNotAvailable("gemini-x".into()),
            StatusCode::SERVICE_UNAVAILABLE,
            "MODEL_ERROR",
        ),
        (
            LlmError::RateLimitExceeded,
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMIT",
        ),
        (
            LlmError::Timeout(Duration::from_secs(30)),
            StatusCode::GATEWAY_TIMEOUT,
            "TIMEOUT",
        ),
        (
            LlmError::Communication("connection reset".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "UNKNOWN_ERROR",
        ),
    ];

    for (llm_error, status, code) in cases {
        let error = expect_error(
            create_app(MockProvider::failing(llm_error)),
            r#"{"naturalLanguage": "read a book"}"#,
            status,
            code,
        )
        .await;
        assert!(!error.error.is_empty());
    }
}

#[tokio::test]
async fn test_error_body_does_not_leak_detail() {
    let llm = MockProvider::failing(LlmError::Authentication("key sk-secret rejected".into()));

    let error = expect_error(
        create_app(llm),
        r#"{"naturalLanguage": "read a book"}"#,
        StatusCode::UNAUTHORIZED,
        "AUTH_ERROR",
    )
    .await;

    assert!(!error.error.contains("sk-secret"));
}

#[tokio::test]
async fn test_pipeline_timeout() {
    let llm = MockProvider::new("{}").with_delay(Duration::from_millis(1500));
    let config = ParserConfig {
        extraction_timeout_secs: 1,
        ..ParserConfig::default()
    };

    expect_error(
        create_app_with(llm, config),
        r#"{"naturalLanguage": "read a book"}"#,
        StatusCode::GATEWAY_TIMEOUT,
        "TIMEOUT",
    )
    .await;
}

#[tokio::test]
async fn test_malformed_extractor_output() {
    expect_error(
        create_app(MockProvider::new("[1, 2, 3]")),
        r#"{"naturalLanguage": "read a book"}"#,
        StatusCode::INTERNAL_SERVER_ERROR,
        "UNKNOWN_ERROR",
    )
    .await;
}

async fn post_analyze(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai/analyze-todos")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn week_todos() -> Value {
    use chrono::{TimeZone, Utc};
    use taskwise_domain::{RepairedTask, Todo};

    let todo = |title: &str, priority, due_day: u32, completed| {
        let task = RepairedTask {
            title: title.to_string(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2026, 1, due_day),
            due_time: None,
            priority,
            category: vec!["업무".to_string()],
        };
        let created = Utc.with_ymd_and_hms(2026, 1, 5, 1, 0, 0).unwrap();
        let mut todo = Todo::from_repaired(task, "user-1", created);
        todo.completed = completed;
        todo
    };

    serde_json::to_value(vec![
        todo("보고서 제출", Priority::High, 10, false),
        todo("회의록 정리", Priority::Medium, 7, true),
        todo("메일 확인", Priority::Low, 8, true),
    ])
    .unwrap()
}

#[tokio::test]
async fn test_analyze_week_with_model_summary() {
    let llm = MockProvider::new("Two of three done; finish the report first.");
    let app = create_app(llm.clone());

    let body = serde_json::json!({"userId": "user-1", "period": "week", "todos": week_todos()});
    let (status, json) = post_analyze(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let data = &json["data"];
    assert_eq!(data["summary"], "Two of three done; finish the report first.");
    assert_eq!(data["totalTasks"], 3);
    assert_eq!(data["completedTasks"], 2);
    assert_eq!(data["completionRate"], 67);
    assert_eq!(data["urgentTasks"], serde_json::json!(["보고서 제출"]));
    assert_eq!(data["remainingTasks"][0]["title"], "보고서 제출");
    assert_eq!(data["categoryDistribution"]["업무"], 3);
    assert_eq!(data["dailyCompletion"].as_array().unwrap().len(), 7);
    assert_eq!(data["dailyCompletion"][0]["day"], "Monday");
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_analyze_keeps_computed_summary_when_model_fails() {
    let app = create_app(MockProvider::failing(LlmError::RateLimitExceeded));

    let body = serde_json::json!({"userId": "user-1", "period": "today", "todos": week_todos()});
    let (status, json) = post_analyze(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["summary"], "2 of 3 tasks completed (67%).");
    assert!(json["data"].get("dailyCompletion").is_none());
}

#[tokio::test]
async fn test_analyze_empty_list_skips_model() {
    let llm = MockProvider::new("unused");
    let app = create_app(llm.clone());

    let (status, json) =
        post_analyze(app, r#"{"userId": "user-1", "period": "week", "todos": []}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: AnalyzeTodosResponse = serde_json::from_value(json).unwrap();
    assert_eq!(response.data.summary, "No tasks registered this week.");
    assert_eq!(response.data.total_tasks, 0);
    assert_eq!(response.data.recommendations.len(), 2);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_validation() {
    let cases = [
        (r#"{"period": "today"}"#, "A user ID is required."),
        (r#"{"userId": "  ", "period": "today"}"#, "A user ID is required."),
        (
            r#"{"userId": "u", "period": "month"}"#,
            "The analysis period must be 'today' or 'week'.",
        ),
        (
            r#"{"userId": "u"}"#,
            "The analysis period must be 'today' or 'week'.",
        ),
        (
            r#"{"userId": "u", "period": "week", "todos": [{"title": 1}]}"#,
            "The todos list is malformed.",
        ),
    ];

    for (body, message) in cases {
        let (status, json) = post_analyze(create_app(MockProvider::default()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        let error: ErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(error.error, message);
    }

    let (status, json) = post_analyze(create_app(MockProvider::default()), "{oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_JSON");
}
