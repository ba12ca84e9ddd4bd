pub mod error;
pub mod render;
pub mod routes;
pub mod views;

use llog_core::{Config, FormLimits, RecordStore};
use std::sync::Arc;

pub use error::AppError;
pub use render::Renderer;
pub use routes::{Route, router};
pub use views::Outcome;

/// Shared by every request: the record store, the page renderer and the form limits.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub renderer: Arc<Renderer>,
    pub limits: FormLimits,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        Self {
            store,
            renderer: Arc::new(Renderer::new(config.date_format.clone())),
            limits: config.limits,
        }
    }
}
