use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use mks_core::Store;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::expiry::ExpiryOption;
use crate::page::{self, PageView, Stats};

/// Maximum accepted link length
pub const MAX_LINK_LENGTH: usize = 2048;

/// Truncates a slug or link for logging
fn truncate_for_log(text: &str) -> String {
    const MAX_LOG_LEN: usize = 32;
    match text.char_indices().nth(MAX_LOG_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Validates a submitted link; its content is otherwise stored verbatim
fn validate_link(link: &str) -> Result<(), AppError> {
    if link.trim().is_empty() {
        return Err(AppError::EmptyLink);
    }
    if link.len() > MAX_LINK_LENGTH {
        return Err(AppError::LinkTooLong);
    }
    Ok(())
}

/// Fields posted by the page's form
#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    link: Option<String>,
    #[serde(rename = "expiresIn")]
    expires_in: Option<String>,
}

struct AppStateInner {
    store: Store,
    config: ServerConfig,
    started_at: Instant,
}

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(store: Store, config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                config,
                started_at: Instant::now(),
            }),
        }
    }

    fn stats(&self) -> Option<Stats> {
        self.inner.config.render_stats.then(|| Stats {
            links: self.inner.store.len(),
            uptime: self.inner.started_at.elapsed(),
        })
    }

    fn render(&self, status: StatusCode, view: PageView) -> Response {
        let view = view.with_stats(self.stats());
        let html = page::render(&self.inner.config.public_url, &view);
        (status, Html(html)).into_response()
    }

    fn render_error(&self, err: AppError) -> Response {
        self.render(err.status(), PageView::error(err.to_string()))
    }

    fn create(
        &self,
        form: Result<Form<CreateLinkForm>, FormRejection>,
    ) -> Result<String, AppError> {
        let Form(form) = form.map_err(|rejection| {
            tracing::debug!("CREATE rejected: {}", rejection);
            AppError::BadForm
        })?;
        let link = form.link.ok_or(AppError::BadForm)?;
        validate_link(&link)?;

        let expiry = ExpiryOption::from_token(form.expires_in.as_deref().unwrap_or_default());
        tracing::debug!("CREATE {} (expires in: {})", truncate_for_log(&link), expiry.token());

        let slug = self.inner.store.insert(link, expiry.duration());
        Ok(self.inner.config.short_url(&slug))
    }

    fn resolve(&self, slug: &str) -> Result<HeaderValue, AppError> {
        let link = self.inner.store.get(slug).ok_or(AppError::NotFound)?;
        tracing::debug!("RESOLVE {} -> {}", truncate_for_log(slug), truncate_for_log(&link));

        HeaderValue::from_str(&link).map_err(|_| {
            tracing::warn!(
                "Stored link for {} is not a valid Location header",
                truncate_for_log(slug)
            );
            AppError::BadRedirectTarget
        })
    }
}

/// Builds the service router
///
/// - `GET /` renders the form
/// - `POST /` shortens the submitted link
/// - `GET /:slug` redirects to the stored link
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(create_link).fallback(method_not_allowed))
        .route("/:slug", get(resolve_link).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Response {
    state.render(StatusCode::OK, PageView::default())
}

async fn create_link(
    State(state): State<AppState>,
    form: Result<Form<CreateLinkForm>, FormRejection>,
) -> Response {
    match state.create(form) {
        Ok(short_url) => state.render(StatusCode::CREATED, PageView::success(short_url)),
        Err(err) => state.render_error(err),
    }
}

async fn resolve_link(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.resolve(&slug) {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(err) => state.render_error(err),
    }
}

async fn method_not_allowed(State(state): State<AppState>) -> Response {
    state.render_error(AppError::MethodNotAllowed)
}

async fn not_found(State(state): State<AppState>) -> Response {
    state.render_error(AppError::NotFound)
}
