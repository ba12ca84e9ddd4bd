use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use llog_core::StoreError;

use crate::render::{not_found_page, server_error_page};

/// Failures that end a request. Form validation problems are not errors here;
/// they re-render the form.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no page at {0}")]
    NoRoute(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::NoRoute(_) => true,
            AppError::Store(err) => err.is_not_found(),
            AppError::Task(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_not_found() {
            tracing::debug!(error = %self, "not found");
            let page = not_found_page(&self.to_string());
            (StatusCode::NOT_FOUND, Html(page)).into_response()
        } else {
            tracing::error!(error = %self, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(server_error_page())).into_response()
        }
    }
}
