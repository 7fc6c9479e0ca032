use crate::infra::{AppState, LeadDesk};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use campus_leads::catalog::{Institution, InstitutionSummary, RouteResolution, INDIAN_STATES};
use campus_leads::error::AppError;
use campus_leads::leads::{Brochure, LeadDraft, SessionSnapshot, SubmitOutcome};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct OpenSessionRequest {
    pub(crate) slug: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionView {
    pub(crate) id: String,
    #[serde(flatten)]
    pub(crate) snapshot: SessionSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitResponse {
    pub(crate) outcome: &'static str,
    #[serde(flatten)]
    pub(crate) session: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) brochure_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FormOptions {
    pub(crate) states: &'static [&'static str],
    pub(crate) courses: Vec<String>,
    pub(crate) intake_years: Vec<String>,
    pub(crate) defaults: LeadDraft,
}

pub(crate) fn site_router(desk: LeadDesk) -> Router {
    Router::new()
        .route("/api/v1/institutions", get(list_institutions))
        .route("/api/v1/institutions/:slug", get(institution_detail))
        .route(
            "/api/v1/institutions/:slug/brochure",
            get(institution_brochure),
        )
        .route("/api/v1/form-options/:slug", get(form_options))
        .route("/api/v1/sessions", post(open_session))
        .route(
            "/api/v1/sessions/:id",
            get(session_status).delete(close_session),
        )
        .route("/api/v1/sessions/:id/draft", put(replace_draft))
        .route("/api/v1/sessions/:id/submit", post(submit_session))
        .route("/api/v1/sessions/:id/brochure", get(session_brochure))
        .fallback(institution_redirect)
        .with_state(desk)
}

pub(crate) fn with_site_routes(desk: LeadDesk) -> Router {
    site_router(desk)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_institutions(State(desk): State<LeadDesk>) -> Json<Vec<InstitutionSummary>> {
    Json(desk.catalog.summaries())
}

pub(crate) async fn institution_detail(
    State(desk): State<LeadDesk>,
    Path(slug): Path<String>,
) -> Result<Json<Institution>, AppError> {
    let institution = desk.catalog.get(&slug)?;
    Ok(Json(institution.as_ref().clone()))
}

pub(crate) async fn institution_brochure(
    State(desk): State<LeadDesk>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let institution = desk.catalog.get(&slug)?;
    Ok(brochure_download(Brochure::for_institution(&institution)))
}

pub(crate) async fn form_options(
    State(desk): State<LeadDesk>,
    Path(slug): Path<String>,
) -> Result<Json<FormOptions>, AppError> {
    let institution = desk.catalog.get(&slug)?;
    let calendar = desk.calendar();
    Ok(Json(FormOptions {
        states: &INDIAN_STATES,
        courses: institution.course_names().map(str::to_string).collect(),
        intake_years: calendar.years().to_vec(),
        defaults: LeadDraft::defaults_for(&institution, &calendar),
    }))
}

pub(crate) async fn open_session(
    State(desk): State<LeadDesk>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let (id, entry) = desk.open_session(&request.slug)?;
    let view = SessionView {
        id,
        snapshot: entry.session.snapshot(),
    };
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn session_status(
    State(desk): State<LeadDesk>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let entry = desk.session(&id)?;
    let snapshot = entry.session.snapshot();
    Ok(Json(SessionView { id, snapshot }))
}

pub(crate) async fn replace_draft(
    State(desk): State<LeadDesk>,
    Path(id): Path<String>,
    Json(draft): Json<LeadDraft>,
) -> Result<Json<SessionView>, AppError> {
    let entry = desk.session(&id)?;
    entry.session.replace_draft(draft)?;
    let snapshot = entry.session.snapshot();
    Ok(Json(SessionView { id, snapshot }))
}

pub(crate) async fn submit_session(
    State(desk): State<LeadDesk>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let entry = desk.session(&id)?;
    let outcome = entry.session.submit().await?;

    let (status, label) = match &outcome {
        SubmitOutcome::Accepted { .. } => (StatusCode::OK, "accepted"),
        SubmitOutcome::Invalid(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid"),
        SubmitOutcome::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "not_configured"),
        SubmitOutcome::Failed => (StatusCode::BAD_GATEWAY, "failed"),
        SubmitOutcome::Discarded => (StatusCode::GONE, "discarded"),
    };
    let brochure_url = match outcome {
        SubmitOutcome::Accepted {
            brochure: Some(_), ..
        } => Some(format!("/api/v1/sessions/{id}/brochure")),
        _ => None,
    };

    let snapshot = entry.session.snapshot();
    let body = SubmitResponse {
        outcome: label,
        session: SessionView { id, snapshot },
        brochure_url,
    };
    Ok((status, Json(body)).into_response())
}

pub(crate) async fn session_brochure(
    State(desk): State<LeadDesk>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let entry = desk.session(&id)?;
    match entry.brochures.latest() {
        Some(brochure) => Ok(brochure_download(brochure)),
        None => {
            let payload = json!({ "error": "no brochure available for this session yet" });
            Ok((StatusCode::NOT_FOUND, Json(payload)).into_response())
        }
    }
}

pub(crate) async fn close_session(
    State(desk): State<LeadDesk>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    desk.close_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sends the root path and unknown paths to an institution page.
pub(crate) async fn institution_redirect(State(desk): State<LeadDesk>, uri: Uri) -> Redirect {
    let resolution = desk.catalog.resolve_route(uri.path());
    if let RouteResolution::Redirect(_) = &resolution {
        debug!(path = uri.path(), "unknown path; sending to default institution");
    }
    Redirect::permanent(&format!(
        "/api/v1/institutions/{}",
        resolution.institution().slug
    ))
}

fn brochure_download(brochure: Brochure) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", brochure.filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        brochure.content,
    )
        .into_response()
}
