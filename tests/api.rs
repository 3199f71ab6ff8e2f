use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::{json, Value};
use tower::ServiceExt;

use focus_timer::{
    create_router,
    services::{ActivityLogger, BackendError, Collaborators, GoalLookup, Task, TaskProvider},
    state::{AppState, NoticeKind, SessionKind, SessionLog, TimerConfig, TimerState},
    tasks::timer_driver_task,
};

#[derive(Default)]
struct Backend {
    tasks: Vec<Task>,
    tasks_fail: bool,
    log_fails: bool,
    logged: Mutex<Vec<SessionLog>>,
}

fn unavailable() -> BackendError {
    BackendError::Status {
        status: 503,
        body: "down".to_string(),
    }
}

impl TaskProvider for Backend {
    fn list_incomplete_tasks(&self) -> BoxFuture<'_, Result<Vec<Task>, BackendError>> {
        let result = if self.tasks_fail { Err(unavailable()) } else { Ok(self.tasks.clone()) };
        future::ready(result).boxed()
    }
}

impl ActivityLogger for Backend {
    fn log_session(&self, log: SessionLog) -> BoxFuture<'_, Result<(), BackendError>> {
        self.logged.lock().unwrap().push(log);
        let result = if self.log_fails { Err(unavailable()) } else { Ok(()) };
        future::ready(result).boxed()
    }
}

impl GoalLookup for Backend {
    fn find_goal_title(&self, goal_id: i64) -> BoxFuture<'_, Option<String>> {
        let title = (goal_id == 3).then(|| "Ship the book".to_string());
        future::ready(title).boxed()
    }
}

fn todo(id: i64, title: &str, goal_id: Option<i64>) -> Task {
    Task {
        id,
        title: title.to_string(),
        priority: "high".to_string(),
        goal_id,
    }
}

fn setup(backend: Backend, timer: TimerState) -> (Arc<AppState>, Arc<Backend>, Router) {
    let backend = Arc::new(backend);
    let collaborators = Collaborators {
        tasks: backend.clone(),
        activity: backend.clone(),
        goals: backend.clone(),
    };
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string(), timer, collaborators));
    let app = create_router(Arc::clone(&state));
    (state, backend, app)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn start_without_tasks_runs_immediately() {
    let (_, _, app) = setup(Backend::default(), TimerState::default());

    let (status, body) = call(&app, Method::POST, "/timer/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["remaining_seconds"], 1500);

    let (status, body) = call(&app, Method::GET, "/timer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "running");
    assert_eq!(body["last_action"], "start");

    let (status, _) = call(&app, Method::POST, "/timer/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn start_prompts_then_runs_on_selected_task() {
    let backend = Backend {
        tasks: vec![todo(1, "Outline chapter", Some(3)), todo(2, "Email editor", None)],
        ..Default::default()
    };
    let (_, _, app) = setup(backend, TimerState::default());

    let (status, body) = call(&app, Method::POST, "/timer/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "awaiting_task_selection");
    assert_eq!(body["tasks"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["timer"]["running"], false);

    let (status, _) = call(&app, Method::POST, "/timer/select", Some(json!({ "task_id": 42 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::POST, "/timer/select", Some(json!({ "task_id": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["selected_task"]["title"], "Outline chapter");

    let (_, body) = call(&app, Method::GET, "/timer", None).await;
    assert_eq!(body["goal_title"], "Ship the book");
    assert!(body["pending_tasks"].as_array().unwrap().is_empty());

    // reset drops the selection and its goal
    let (_, body) = call(&app, Method::POST, "/timer/reset", None).await;
    assert!(body["timer"]["selected_task"].is_null());
    let (_, body) = call(&app, Method::GET, "/timer", None).await;
    assert!(body["goal_title"].is_null());
}

#[tokio::test]
async fn prompt_can_be_skipped_or_cancelled() {
    let backend = Backend {
        tasks: vec![todo(1, "Outline chapter", None)],
        ..Default::default()
    };
    let (_, _, app) = setup(backend, TimerState::default());

    call(&app, Method::POST, "/timer/start", None).await;
    let (status, body) = call(&app, Method::POST, "/timer/select/cancel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "idle");

    call(&app, Method::POST, "/timer/start", None).await;
    let (status, body) = call(&app, Method::POST, "/timer/select", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["running"], true);
    assert!(body["timer"]["selected_task"].is_null());
}

#[tokio::test]
async fn provider_failure_starts_without_prompt() {
    let backend = Backend {
        tasks_fail: true,
        ..Default::default()
    };
    let (_, _, app) = setup(backend, TimerState::default());

    let (status, body) = call(&app, Method::POST, "/timer/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");

    let (_, body) = call(&app, Method::GET, "/notices", None).await;
    assert_eq!(body["notices"][0]["kind"], "provider_unavailable");

    let (_, body) = call(&app, Method::DELETE, "/notices", None).await;
    assert!(body["notices"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn illegal_transitions_conflict() {
    let (_, _, app) = setup(Backend::default(), TimerState::default());

    let (status, body) = call(&app, Method::POST, "/timer/pause", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    let (status, _) = call(&app, Method::POST, "/timer/select", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn settings_validate_and_apply_while_stopped() {
    let (_, _, app) = setup(Backend::default(), TimerState::default());

    let bad = json!({
        "work_minutes": 0,
        "short_break_minutes": 5,
        "long_break_minutes": 15,
        "sessions_before_long_break": 4
    });
    let (status, _) = call(&app, Method::PUT, "/timer/config", Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = call(&app, Method::GET, "/notices", None).await;
    assert_eq!(body["notices"][0]["kind"], "invalid_config");

    let good = json!({
        "work_minutes": 50,
        "short_break_minutes": 10,
        "long_break_minutes": 30,
        "sessions_before_long_break": 3
    });
    let (status, body) = call(&app, Method::PUT, "/timer/config", Some(good)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_seconds"], 3000);
    assert_eq!(body["timer"]["clock"], "50:00");

    call(&app, Method::POST, "/timer/start", None).await;
    let (status, _) = call(&app, Method::DELETE, "/timer/config", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    call(&app, Method::POST, "/timer/pause", None).await;
    let (status, body) = call(&app, Method::DELETE, "/timer/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_seconds"], 1500);
}

#[tokio::test]
async fn custom_mode_uses_custom_duration() {
    let (_, _, app) = setup(Backend::default(), TimerState::default());

    let (status, _) = call(&app, Method::PUT, "/timer/custom", Some(json!({ "minutes": 45 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::POST, "/timer/mode", Some(json!({ "mode": "custom" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["mode"], "custom");
    assert_eq!(body["timer"]["session"], "focus");
    assert_eq!(body["timer"]["remaining_seconds"], 2700);

    let (status, _) = call(&app, Method::PUT, "/timer/custom", Some(json!({ "minutes": 0 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_reports_version() {
    let (_, _, app) = setup(Backend::default(), TimerState::default());
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

fn one_minute_timer() -> TimerState {
    TimerState::new(TimerConfig::new(1, 1, 2, 4).unwrap(), 1)
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn driver_completes_focus_and_logs_session() {
    let (state, backend, _) = setup(Backend::default(), one_minute_timer());
    let driver = tokio::spawn(timer_driver_task(Arc::clone(&state)));

    state.start(Vec::new()).unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(state.snapshot().unwrap().remaining_seconds, 30);

    tokio::time::sleep(Duration::from_secs(31)).await;
    settle().await;

    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.session, SessionKind::Break);
    assert_eq!(snapshot.remaining_seconds, 60);
    assert_eq!(snapshot.completed_sessions, 1);
    assert!(!snapshot.running);

    let logged = backend.logged.lock().unwrap().clone();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].duration_minutes, 1);
    assert!(state.notices().unwrap().is_empty());

    driver.abort();
}

#[tokio::test(start_paused = true)]
async fn failed_log_does_not_block_transition() {
    let backend = Backend {
        log_fails: true,
        ..Default::default()
    };
    let (state, backend, _) = setup(backend, one_minute_timer());
    let driver = tokio::spawn(timer_driver_task(Arc::clone(&state)));

    state.start(Vec::new()).unwrap();
    tokio::time::sleep(Duration::from_secs(61)).await;
    settle().await;

    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.session, SessionKind::Break);
    assert_eq!(snapshot.remaining_seconds, 60);
    assert_eq!(snapshot.completed_sessions, 1);
    assert_eq!(backend.logged.lock().unwrap().len(), 1);

    let notices = state.notices().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::LogFailure);

    // the break can start right away
    state.start(Vec::new()).unwrap();
    tokio::time::sleep(Duration::from_secs(61)).await;
    settle().await;
    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.session, SessionKind::Focus);
    assert_eq!(snapshot.remaining_seconds, 60);

    driver.abort();
}

#[tokio::test(start_paused = true)]
async fn pause_stops_ticking() {
    let (state, _, _) = setup(Backend::default(), one_minute_timer());
    let driver = tokio::spawn(timer_driver_task(Arc::clone(&state)));

    state.start(Vec::new()).unwrap();
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    state.pause().unwrap();
    let paused_at = state.snapshot().unwrap().remaining_seconds;
    assert_eq!(paused_at, 50);

    tokio::time::sleep(Duration::from_secs(20)).await;
    settle().await;
    assert_eq!(state.snapshot().unwrap().remaining_seconds, paused_at);

    state.start(Vec::new()).unwrap();
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert_eq!(state.snapshot().unwrap().remaining_seconds, paused_at - 5);

    driver.abort();
}
