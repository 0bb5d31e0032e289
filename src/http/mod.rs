//! HTTP API surface: three routes mapping onto the dispatch pipeline.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::cipher::AddressCipher;
use crate::dispatch::Dispatcher;
use crate::store::RecipientStore;

/// Per-process state handed to every handler.
///
/// Built once in `main` from the startup [`Config`](crate::Config);
/// handlers never reach into the environment themselves.
pub struct AppState {
    pub store: Arc<dyn RecipientStore>,
    pub dispatcher: Dispatcher,
    pub cipher: AddressCipher,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/emails/send", post(handlers::send_email))
        .route("/emails/broadcast", post(handlers::broadcast))
        .route("/emails/reminders", post(handlers::reminders))
        .with_state(state)
}
