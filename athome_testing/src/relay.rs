//! Mimics a hosted form relay that forwards posted forms as emails.
//!
//! Forms are posted either to `/ajax/{token}` (answered with JSON) or to
//! `/{token}` (answered with a redirect to a thank you page). Accepted forms
//! are recorded and can be listed via `GET /submissions`.

use std::{collections::BTreeMap, net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing, Form, Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub type RelayForm = BTreeMap<String, String>;

#[derive(Debug)]
pub struct RelayState {
    token: String,
    ajax_enabled: bool,
    submissions: RwLock<Vec<RelaySubmission>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelaySubmission {
    pub endpoint: RelayEndpoint,
    pub form: RelayForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayEndpoint {
    Ajax,
    Form,
}

impl RelayState {
    pub fn new(token: impl Into<String>, ajax_enabled: bool) -> Arc<Self> {
        Arc::new(Self {
            token: token.into(),
            ajax_enabled,
            submissions: Default::default(),
        })
    }

    pub async fn submissions(&self) -> Vec<RelaySubmission> {
        self.submissions.read().await.clone()
    }
}

pub fn router(state: Arc<RelayState>) -> Router<()> {
    Router::new()
        .route("/submissions", routing::get(submissions))
        .route("/thanks", routing::get(thanks))
        .route("/ajax/:token", routing::post(ajax))
        .route("/:token", routing::post(form))
        .with_state(state)
}

pub async fn start_server(
    host: IpAddr,
    port: u16,
    token: String,
    ajax_enabled: bool,
) -> anyhow::Result<()> {
    info!("Starting form relay testing server on {host}:{port}");
    info!("Relay url: http://{host}:{port}/");
    info!("Token: {token:?}");
    if !ajax_enabled {
        info!("The ajax endpoint is disabled, only the form endpoint accepts submissions");
    }

    let router = router(RelayState::new(token, ajax_enabled));

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router)
        .await
        .context("Failed to start HTTP server")
}

#[derive(Serialize)]
struct AjaxResponse {
    success: &'static str,
    message: &'static str,
}

async fn ajax(
    state: State<Arc<RelayState>>,
    Path(token): Path<String>,
    Form(form): Form<RelayForm>,
) -> Response {
    if !state.ajax_enabled {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    if token != state.token {
        return (
            StatusCode::NOT_FOUND,
            Json(AjaxResponse {
                success: "false",
                message: "This form does not exist.",
            }),
        )
            .into_response();
    }

    record(&state, RelayEndpoint::Ajax, form).await;

    Json(AjaxResponse {
        success: "true",
        message: "The form was submitted successfully.",
    })
    .into_response()
}

async fn form(
    state: State<Arc<RelayState>>,
    Path(token): Path<String>,
    Form(form): Form<RelayForm>,
) -> Response {
    if token != state.token {
        return (StatusCode::NOT_FOUND, Html("<h1>Form not found</h1>")).into_response();
    }

    record(&state, RelayEndpoint::Form, form).await;

    Redirect::to("/thanks").into_response()
}

async fn thanks() -> Html<&'static str> {
    Html("<h1>Thanks!</h1><p>The form was submitted successfully.</p>")
}

async fn submissions(state: State<Arc<RelayState>>) -> Json<Vec<RelaySubmission>> {
    Json(state.submissions().await)
}

async fn record(state: &RelayState, endpoint: RelayEndpoint, form: RelayForm) {
    info!(?endpoint, ?form, "received form");
    state
        .submissions
        .write()
        .await
        .push(RelaySubmission { endpoint, form });
}
