//! URL table: named routes for building links and redirects, and the axum
//! router that maps each path to its view.
use axum::{
    Form as FormBody, Router,
    extract::{Path, State},
    http::Uri,
    routing::get,
};
use llog_core::{EntryForm, FormState, TopicForm};

use crate::{AppState, error::AppError, views, views::Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    Page,
    Topics,
    Topic(i64),
    NewTopic,
    NewEntry(i64),
    EditEntry(i64),
}

impl Route {
    pub fn url(&self) -> String {
        match self {
            Route::Index => "/".to_string(),
            Route::Page => "/page/".to_string(),
            Route::Topics => "/topics/".to_string(),
            Route::Topic(topic_id) => format!("/topics/{topic_id}/"),
            Route::NewTopic => "/new_topic/".to_string(),
            Route::NewEntry(topic_id) => format!("/new_entry/{topic_id}/"),
            Route::EditEntry(entry_id) => format!("/edit_entry/{entry_id}/"),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/page/", get(page))
        .route("/topics/", get(topics))
        .route("/topics/{topic_id}/", get(topic))
        .route("/new_topic/", get(new_topic_form).post(new_topic_submit))
        .route(
            "/new_entry/{topic_id}/",
            get(new_entry_form).post(new_entry_submit),
        )
        .route(
            "/edit_entry/{entry_id}/",
            get(edit_entry_form).post(edit_entry_submit),
        )
        .fallback(no_route)
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Outcome {
    views::index(&state)
}

async fn page(State(state): State<AppState>) -> Outcome {
    views::page(&state)
}

async fn topics(State(state): State<AppState>) -> Result<Outcome, AppError> {
    blocking(state, views::topics).await
}

async fn topic(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<Outcome, AppError> {
    blocking(state, move |state| views::topic(state, topic_id)).await
}

async fn new_topic_form(State(state): State<AppState>) -> Result<Outcome, AppError> {
    blocking(state, |state| views::new_topic(state, FormState::Blank)).await
}

async fn new_topic_submit(
    State(state): State<AppState>,
    FormBody(form): FormBody<TopicForm>,
) -> Result<Outcome, AppError> {
    blocking(state, move |state| {
        views::new_topic(state, FormState::Submitted(form))
    })
    .await
}

async fn new_entry_form(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<Outcome, AppError> {
    blocking(state, move |state| {
        views::new_entry(state, topic_id, FormState::Blank)
    })
    .await
}

async fn new_entry_submit(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
    FormBody(form): FormBody<EntryForm>,
) -> Result<Outcome, AppError> {
    blocking(state, move |state| {
        views::new_entry(state, topic_id, FormState::Submitted(form))
    })
    .await
}

async fn edit_entry_form(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> Result<Outcome, AppError> {
    blocking(state, move |state| {
        views::edit_entry(state, entry_id, FormState::Blank)
    })
    .await
}

async fn edit_entry_submit(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
    FormBody(form): FormBody<EntryForm>,
) -> Result<Outcome, AppError> {
    blocking(state, move |state| {
        views::edit_entry(state, entry_id, FormState::Submitted(form))
    })
    .await
}

/// Views hit the store synchronously, so they run on the blocking pool rather
/// than on a runtime worker.
async fn blocking<F>(state: AppState, view: F) -> Result<Outcome, AppError>
where
    F: FnOnce(&AppState) -> Result<Outcome, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || view(&state)).await?
}

async fn no_route(uri: Uri) -> AppError {
    AppError::NoRoute(uri.path().to_string())
}
