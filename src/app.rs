use axum::{
    Form, Json, Router,
    extract::{
        Path, State,
        rejection::{FormRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::NavigationError;
use crate::navigation::{NavigationEntry, NavigationStack};
use crate::saving;
use crate::session::SessionStore;

/// Name of the cookie that carries the session id
pub const SESSION_COOKIE: &str = "nav_session";

pub struct AppState {
    pub sessions: SessionStore,
}

#[derive(Deserialize)]
pub struct NavForm {
    url: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Serialize)]
struct StackResponse {
    count: usize,
    entries: Vec<NavigationEntry>,
}

#[derive(Serialize)]
struct ChangeResponse {
    changed: bool,
    count: usize,
}

#[derive(Serialize)]
struct EntryResponse {
    index: usize,
    url: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/nav", get(get_stack))
        .route("/nav/start", post(start_url))
        .route("/nav/add", post(add_url))
        .route("/nav/back", post(go_back))
        .route("/nav/current", get(current_url))
        .route("/nav/previous", get(previous_url))
        .route("/nav/entry/:index", get(entry_url))
        .route("/nav/clear", post(clear_stack))
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let sessions_file = config.sessions_file();
    let sessions = saving::load_store(&sessions_file, config.session_duration)?;
    let state = Arc::new(AppState { sessions });

    let app = router(state.clone());
    let sweeper = tokio::spawn(sweep_sessions(state.clone()));

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on http://{}", config.bind_address());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    state.sessions.purge_expired();
    saving::save_store(&state.sessions, &sessions_file)?;
    info!("Session snapshot written to {}", sessions_file.display());

    Ok(())
}

// Drop expired sessions while the server runs
async fn sweep_sessions(state: Arc<AppState>) {
    let period = state.sessions.purge_interval().max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);
    // first tick completes immediately
    interval.tick().await;
    loop {
        interval.tick().await;
        state.sessions.purge_expired();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

// Stack of the cookie's session, or a fresh session if there is none
fn open_session(state: &AppState, jar: CookieJar) -> (CookieJar, String, NavigationStack) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let session_id = cookie.value().to_string();
        if let Some(navigation) = state.sessions.load(&session_id) {
            return (jar, session_id, navigation);
        }
    }

    let session_id = state.sessions.create_session();
    let cookie = Cookie::build((SESSION_COOKIE, session_id.clone()))
        .path("/")
        .http_only(true)
        .build();

    (jar.add(cookie), session_id, NavigationStack::new())
}

/// Load the session stack, run `op` on it and save the stack back.
fn with_navigation<F>(state: &AppState, jar: CookieJar, op: F) -> Response
where
    F: FnOnce(&mut NavigationStack) -> Result<Response, NavigationError>,
{
    let (jar, session_id, mut navigation) = open_session(state, jar);
    let result = op(&mut navigation);
    state.sessions.save(&session_id, navigation);

    match result {
        Ok(response) => (jar, response).into_response(),
        Err(e) => {
            warn!("navigation request failed for session {}: {}", session_id, e);
            (jar, error_response(&e)).into_response()
        }
    }
}

fn error_response(error: &NavigationError) -> Response {
    let status = match error {
        NavigationError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        NavigationError::EmptyStack => StatusCode::CONFLICT,
        NavigationError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
    };

    json_error(status, error.to_string())
}

fn json_error(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            message,
        }),
    )
        .into_response()
}

fn form_rejection(rejection: FormRejection) -> Response {
    warn!("rejected navigation form: {}", rejection.body_text());
    json_error(rejection.status(), rejection.body_text())
}

async fn get_stack(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    with_navigation(&state, jar, |nav| {
        Ok(Json(StackResponse {
            count: nav.count(),
            entries: nav.stack().to_vec(),
        })
        .into_response())
    })
}

async fn start_url(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<NavForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return form_rejection(rejection),
    };
    with_navigation(&state, jar, |nav| {
        nav.add_start_url(&form.url, &form.text, &form.icon)?;
        Ok(Json(ChangeResponse {
            changed: true,
            count: nav.count(),
        })
        .into_response())
    })
}

async fn add_url(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<NavForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return form_rejection(rejection),
    };
    with_navigation(&state, jar, |nav| {
        let changed = nav.add_url(&form.url, &form.text, &form.icon)?;
        Ok(Json(ChangeResponse {
            changed,
            count: nav.count(),
        })
        .into_response())
    })
}

async fn go_back(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    with_navigation(&state, jar, |nav| {
        nav.delete_last_url();
        Ok(Redirect::to(nav.url()?).into_response())
    })
}

async fn current_url(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    with_navigation(&state, jar, |nav| Ok(Redirect::to(nav.url()?).into_response()))
}

async fn previous_url(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    with_navigation(&state, jar, |nav| {
        Ok(Redirect::to(nav.previous_url()?).into_response())
    })
}

async fn entry_url(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    index: Result<Path<usize>, PathRejection>,
) -> Response {
    let Path(index) = match index {
        Ok(index) => index,
        Err(rejection) => return json_error(rejection.status(), rejection.body_text()),
    };
    with_navigation(&state, jar, |nav| {
        let url = nav.stack_entry_url(index)?.to_string();
        Ok(Json(EntryResponse { index, url }).into_response())
    })
}

async fn clear_stack(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    with_navigation(&state, jar, |nav| {
        nav.clear();
        Ok(StatusCode::NO_CONTENT.into_response())
    })
}
