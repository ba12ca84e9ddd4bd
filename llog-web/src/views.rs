//! Request handlers, independent of the HTTP framework.
//!
//! Each view takes the shared [`AppState`], its path parameters and, for the
//! write views, a [`FormState`]. A blank form is rendered; a submitted one is
//! validated, then either persisted (answering with a redirect) or rendered
//! again with its field errors.
use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use llog_core::{EntryForm, FieldErrors, Form, FormState, TopicForm};

use crate::{AppState, error::AppError, routes::Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A rendered HTML page.
    Page(String),
    /// A successful write; answered with `302 Found`.
    Redirect(Route),
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Page(html) => Html(html).into_response(),
            Outcome::Redirect(route) => {
                (StatusCode::FOUND, [(header::LOCATION, route.url())]).into_response()
            }
        }
    }
}

pub fn index(state: &AppState) -> Outcome {
    Outcome::Page(state.renderer.index())
}

pub fn page(state: &AppState) -> Outcome {
    Outcome::Page(state.renderer.page())
}

pub fn topics(state: &AppState) -> Result<Outcome, AppError> {
    let topics = state.store.list_topics()?;
    tracing::debug!(count = topics.len(), "listing topics");
    Ok(Outcome::Page(state.renderer.topics(&topics)))
}

pub fn topic(state: &AppState, topic_id: i64) -> Result<Outcome, AppError> {
    let topic = state.store.get_topic(topic_id)?;
    let entries = state.store.list_entries(topic_id)?;
    tracing::debug!(topic_id, entries = entries.len(), "showing topic");
    Ok(Outcome::Page(state.renderer.topic(&topic, &entries)))
}

pub fn new_topic(state: &AppState, form: FormState<TopicForm>) -> Result<Outcome, AppError> {
    let (form, errors) = match form {
        FormState::Blank => (TopicForm::default(), FieldErrors::default()),
        FormState::Submitted(form) => match form.validate(&state.limits) {
            Ok(fields) => {
                let topic = state.store.create_topic(&fields.text)?;
                tracing::info!(topic_id = topic.id, "created topic");
                return Ok(Outcome::Redirect(Route::Topics));
            }
            Err(errors) => (form, errors),
        },
    };
    Ok(Outcome::Page(state.renderer.new_topic(&form, &errors)))
}

pub fn new_entry(
    state: &AppState,
    topic_id: i64,
    form: FormState<EntryForm>,
) -> Result<Outcome, AppError> {
    // The owning topic comes from the path, never from the submitted fields.
    let topic = state.store.get_topic(topic_id)?;

    let (form, errors) = match form {
        FormState::Blank => (EntryForm::default(), FieldErrors::default()),
        FormState::Submitted(form) => match form.validate(&state.limits) {
            Ok(fields) => {
                let entry = state.store.create_entry(topic.id, &fields.text)?;
                tracing::info!(topic_id = topic.id, entry_id = entry.id, "created entry");
                return Ok(Outcome::Redirect(Route::Topic(topic.id)));
            }
            Err(errors) => (form, errors),
        },
    };
    Ok(Outcome::Page(state.renderer.new_entry(&topic, &form, &errors)))
}

pub fn edit_entry(
    state: &AppState,
    entry_id: i64,
    form: FormState<EntryForm>,
) -> Result<Outcome, AppError> {
    let entry = state.store.get_entry(entry_id)?;
    let topic = state.store.get_topic(entry.topic_id)?;

    let (form, errors) = match form {
        FormState::Blank => (EntryForm::from(&entry), FieldErrors::default()),
        FormState::Submitted(form) => match form.validate(&state.limits) {
            Ok(fields) => {
                state.store.update_entry(entry.id, &fields.text)?;
                tracing::info!(topic_id = topic.id, entry_id = entry.id, "updated entry");
                return Ok(Outcome::Redirect(Route::Topic(topic.id)));
            }
            Err(errors) => (form, errors),
        },
    };
    Ok(Outcome::Page(
        state.renderer.edit_entry(&topic, &entry, &form, &errors),
    ))
}
