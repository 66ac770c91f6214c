//! HTTP request handlers for the server.
//!
//! Implements the parse and analysis endpoints and the health check using axum.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use taskwise_domain::traits::LlmProvider;
use taskwise_domain::{AnalysisPeriod, Clock, RepairedTask, Todo, TodoAnalysis};
use taskwise_parser::{sanitize_value, ErrorCode, ParseError, TaskParser};
use tracing::{debug, error, info, warn};

/// Request body field holding the free text
pub const INPUT_FIELD: &str = "naturalLanguage";

/// Shared application state
pub struct AppState<L>
where
    L: LlmProvider,
{
    /// Parser shared by every request
    pub parser: Arc<TaskParser<L>>,
    /// Source of the reference date
    pub clock: Clock,
}

impl<L: LlmProvider> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            parser: Arc::clone(&self.parser),
            clock: self.clock,
        }
    }
}

/// Successful parse response
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseTodoResponse {
    /// The repaired task
    pub data: RepairedTask,
    /// A due date was dropped because it was in the past or unreadable
    #[serde(rename = "hasPastDate")]
    pub has_past_date: bool,
    /// Always `true`
    pub success: bool,
}

/// Successful analysis response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeTodosResponse {
    /// The analysis
    pub data: TodoAnalysis,
    /// Always `true`
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Model behind the extractor
    pub model: String,
    /// Classification mode in use
    pub classification: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Message safe to show an end user
    pub error: String,
    /// Machine-readable error code
    pub code: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request body was not JSON
    InvalidJson(String),
    /// A request field is missing or malformed
    InvalidRequest(&'static str),
    /// The parse pipeline failed
    Parse(ParseError),
}

impl AppError {
    /// Code reported for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidJson(_) => ErrorCode::InvalidJson,
            AppError::InvalidRequest(_) => ErrorCode::ValidationError,
            AppError::Parse(e) => e.code(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status =
            StatusCode::from_u16(code.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &self {
            AppError::InvalidJson(detail) => {
                warn!("{}: {}", code, detail);
                code.user_message()
            }
            AppError::InvalidRequest(message) => {
                info!("{}: {}", code, message);
                *message
            }
            AppError::Parse(e @ ParseError::Validation(rejection)) => {
                info!("{} ({}): {}", code, rejection.code(), e);
                e.user_message()
            }
            AppError::Parse(e) => {
                error!("{}: {}", code, e);
                e.user_message()
            }
        };

        let body = Json(ErrorResponse {
            error: message.to_string(),
            code: code.as_str().to_string(),
        });
        (status, body).into_response()
    }
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        AppError::Parse(e)
    }
}

/// POST /api/ai/parse-todo - Turn free text into a task
///
/// The body is read raw so malformed JSON maps to `INVALID_JSON` instead of
/// axum's default rejection.
async fn parse_todo<L>(
    State(state): State<AppState<L>>,
    body: Bytes,
) -> Result<Json<ParseTodoResponse>, AppError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let request: Value =
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidJson(e.to_string()))?;

    let input = sanitize_value(request.get(INPUT_FIELD)).map_err(ParseError::from)?;

    let outcome = state
        .parser
        .parse_sanitized(input, state.clock.today())
        .await?;

    Ok(Json(ParseTodoResponse {
        data: outcome.task,
        has_past_date: outcome.has_past_date,
        success: true,
    }))
}

/// POST /api/ai/analyze-todos - Completion analysis with a model-written summary
///
/// Body: `userId`, `period` (`today` or `week`) and an optional `todos`
/// array, already narrowed to the period by the caller. The statistics are
/// computed locally; when the model cannot write the summary the computed
/// one is kept.
async fn analyze_todos<L>(
    State(state): State<AppState<L>>,
    body: Bytes,
) -> Result<Json<AnalyzeTodosResponse>, AppError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let request: Value =
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidJson(e.to_string()))?;

    request
        .get("userId")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or(AppError::InvalidRequest("A user ID is required."))?;

    let period = request
        .get("period")
        .and_then(Value::as_str)
        .and_then(AnalysisPeriod::parse)
        .ok_or(AppError::InvalidRequest(
            "The analysis period must be 'today' or 'week'.",
        ))?;

    let todos: Vec<Todo> = match request.get("todos") {
        None | Some(Value::Null) => Vec::new(),
        Some(todos) => serde_json::from_value(todos.clone()).map_err(|e| {
            debug!("Rejected todos array: {}", e);
            AppError::InvalidRequest("The todos list is malformed.")
        })?,
    };

    let today = state.clock.today();
    let mut analysis = TodoAnalysis::compute(&todos, today, period);

    if analysis.total_tasks > 0 {
        match state.parser.summarize(&analysis, today).await {
            Ok(summary) => analysis.summary = summary,
            Err(e) => warn!("Keeping computed summary ({}): {}", e.code(), e),
        }
    }

    info!(
        "Analyzed {} todos for {} ({}% done)",
        analysis.total_tasks,
        period.as_str(),
        analysis.completion_rate
    );

    Ok(Json(AnalyzeTodosResponse {
        data: analysis,
        success: true,
    }))
}

/// GET /health - Liveness and active settings
async fn health_check<L>(State(state): State<AppState<L>>) -> Json<HealthCheckResponse>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        model: state.parser.model_name().to_string(),
        classification: state.parser.config().classification.as_str().to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router<L>(state: AppState<L>) -> AxumRouter
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    AxumRouter::new()
        .route("/api/ai/parse-todo", post(parse_todo::<L>))
        .route("/api/ai/analyze-todos", post(analyze_todos::<L>))
        .route("/health", get(health_check::<L>))
        .with_state(state)
}
