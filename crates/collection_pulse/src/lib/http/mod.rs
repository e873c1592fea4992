//! HTTP surface: summaries, text-to-speech and speech-to-text

pub mod auth;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use collection_datastore::DataStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    speech::{Synthesizer, Transcriber},
    summary::SummaryService,
    TextGenerator,
};

/// Largest accepted request body (audio uploads included)
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Anything that can both speak and listen
pub trait SpeechBackend: Synthesizer + Transcriber + Send + Sync + 'static {}

impl<T> SpeechBackend for T where T: Synthesizer + Transcriber + Send + Sync + 'static {}

pub struct AppState<D, G, S>
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    S: SpeechBackend,
{
    pub summaries: Arc<SummaryService<D, G>>,
    pub speech: Arc<S>,
}

impl<D, G, S> AppState<D, G, S>
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    S: SpeechBackend,
{
    pub fn new(summaries: SummaryService<D, G>, speech: S) -> Self {
        Self {
            summaries: Arc::new(summaries),
            speech: Arc::new(speech),
        }
    }
}

impl<D, G, S> Clone for AppState<D, G, S>
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    S: SpeechBackend,
{
    fn clone(&self) -> Self {
        Self {
            summaries: Arc::clone(&self.summaries),
            speech: Arc::clone(&self.speech),
        }
    }
}

/// Builds the application router. `api_key` of `None` disables the API key
/// check.
pub fn create_router<D, G, S>(state: AppState<D, G, S>, api_key: Option<Arc<str>>) -> Router
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    S: SpeechBackend,
{
    let api = Router::new()
        .route(
            "/summarize/:collection_id",
            post(routes::summarize::<D, G, S>),
        )
        .route("/tts", post(routes::tts::<D, G, S>))
        .route("/stt", post(routes::stt::<D, G, S>));

    Router::new()
        .route("/health", get(routes::health))
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            let expected = api_key.clone();
            async move { auth::check(req, next, expected).await }
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
