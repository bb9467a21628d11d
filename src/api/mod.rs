use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::InputRecord;
use crate::session::{Session, SessionError};
use crate::store::InputStore;

type SharedSession = Arc<Mutex<Session<Box<dyn InputStore + Send>>>>;

#[derive(Clone)]
struct AppState {
    session: SharedSession,
}

/// Form field as sent by a client: the raw text, or a plain JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Number(f64),
}

impl RawField {
    fn into_text(self) -> String {
        match self {
            RawField::Text(text) => text,
            // The form parser reads `.` as a thousands separator.
            RawField::Number(value) => value.to_string().replace('.', ","),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    #[serde(alias = "age_now")]
    age_now: Option<RawField>,
    #[serde(alias = "age_retire")]
    age_retire: Option<RawField>,
    #[serde(alias = "presentValue")]
    pv: Option<RawField>,
    #[serde(alias = "monthlyContribution")]
    pmt: Option<RawField>,
    #[serde(alias = "income_goal")]
    income_goal: Option<RawField>,
}

impl From<ProjectPayload> for InputRecord {
    fn from(payload: ProjectPayload) -> Self {
        let text = |field: Option<RawField>| field.map(RawField::into_text).unwrap_or_default();
        InputRecord {
            age_now: text(payload.age_now),
            age_retire: text(payload.age_retire),
            pv: text(payload.pv),
            pmt: text(payload.pmt),
            income_goal: text(payload.income_goal),
        }
    }
}

#[derive(Debug, Serialize)]
struct RecordResponse {
    record: Option<InputRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server<S>(port: u16, store: S) -> std::io::Result<()>
where
    S: InputStore + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("retirement projection API listening on http://{addr}");
    log::info!("local access: http://127.0.0.1:{port}/api/project");
    axum::serve(listener, router(store)).await
}

fn router<S>(store: S) -> Router
where
    S: InputStore + Send + 'static,
{
    let store: Box<dyn InputStore + Send> = Box::new(store);
    let state = AppState {
        session: Arc::new(Mutex::new(Session::new(store))),
    };
    Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route(
            "/api/record",
            get(record_get_handler)
                .put(record_put_handler)
                .delete(record_delete_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<ProjectPayload>,
) -> Response {
    project_handler_impl(&state, payload.into())
}

async fn project_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Response {
    project_handler_impl(&state, payload.into())
}

fn project_handler_impl(state: &AppState, record: InputRecord) -> Response {
    let mut session = state.session.lock().unwrap_or_else(PoisonError::into_inner);
    match session.compute(record) {
        Ok(projection) => json_response(StatusCode::OK, projection),
        Err(err) => session_error_response(&err),
    }
}

async fn record_get_handler(State(state): State<AppState>) -> Response {
    let session = state.session.lock().unwrap_or_else(PoisonError::into_inner);
    json_response(
        StatusCode::OK,
        RecordResponse {
            record: session.store().load(),
        },
    )
}

async fn record_put_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Response {
    let record = InputRecord::from(payload);
    let mut session = state.session.lock().unwrap_or_else(PoisonError::into_inner);
    match session.save(&record) {
        Ok(()) => json_response(
            StatusCode::OK,
            RecordResponse {
                record: Some(record),
            },
        ),
        Err(err) => session_error_response(&err),
    }
}

async fn record_delete_handler(State(state): State<AppState>) -> Response {
    let mut session = state.session.lock().unwrap_or_else(PoisonError::into_inner);
    match session.clear() {
        Ok(_) => json_response(StatusCode::OK, RecordResponse { record: None }),
        Err(err) => session_error_response(&err),
    }
}

fn session_error_response(err: &SessionError) -> Response {
    match err {
        SessionError::Projection(_) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
        SessionError::Store(_) | SessionError::Encode(_) => {
            log::error!("request failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
