//! HTTP surface for the dialogue framework.
//!
//! - `POST /webhook`: run a custom action (action server protocol)
//! - `POST /process`: run the language detection stage over messages
//! - `GET /actions`, `GET /health`, `GET /metrics`

use crate::actions::{ActionCall, ActionRegistry};
use crate::config::Config;
use crate::conversation::{Event, SlotMap};
use crate::detection::{load_language_model, LanguageIdentifier};
use crate::i18n::{MetricsReport, TranslationMetrics};
use crate::localizer::ResponseLocalizer;
use crate::message::Message;
use crate::normalizer::TextNormalizer;
use crate::pipeline::{LanguageDetectionComponent, PipelineComponent};
use crate::security::token_allows;
use crate::translation::{GoogleTranslateClient, Translator};
use anyhow::{Context, Result};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<LanguageDetectionComponent>,
    pub actions: Arc<ActionRegistry>,
    pub metrics: Arc<TranslationMetrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        pipeline: LanguageDetectionComponent,
        actions: ActionRegistry,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            actions: Arc::new(actions),
            metrics,
        }
    }

    /// Build every component from configuration.
    ///
    /// Fails if the language model cannot be loaded.
    pub fn from_config(config: Config) -> Result<Self> {
        let metrics = Arc::new(TranslationMetrics::new());
        let reference = config.reference_language.clone();

        let model = load_language_model(&config).context("Failed to load language model")?;
        let translator: Arc<dyn Translator> = Arc::new(
            GoogleTranslateClient::from_config(&config)
                .context("Failed to build translation client")?,
        );

        let identifier =
            LanguageIdentifier::new(model, reference.clone()).with_metrics(Arc::clone(&metrics));
        let normalizer = TextNormalizer::new(Arc::clone(&translator), reference.clone())
            .with_metrics(Arc::clone(&metrics));
        let localizer =
            ResponseLocalizer::new(translator, reference).with_metrics(Arc::clone(&metrics));

        let pipeline = LanguageDetectionComponent::new(identifier, normalizer);
        let actions = ActionRegistry::with_default_actions(Arc::new(localizer));

        info!(
            "Components ready: model={}, reference language={}, actions={}",
            pipeline.identifier().model_name(),
            config.reference_language,
            actions.names().len()
        );

        Ok(Self::new(config, pipeline, actions, metrics))
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/actions", get(list_actions))
        .route("/metrics", get(metrics_report))
        .route("/webhook", post(run_action))
        .route("/process", post(process_messages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Invalid or missing token"})),
    )
        .into_response()
}

fn authorized(state: &AppState, query: &TokenQuery) -> bool {
    token_allows(
        state.config.action_server_token.as_deref(),
        query.token.as_deref(),
    )
}

async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn list_actions(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(
        state
            .actions
            .names()
            .into_iter()
            .map(|name| json!({"name": name}))
            .collect(),
    )
}

async fn metrics_report(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.metrics.report())
}

async fn run_action(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    Json(call): Json<ActionCall>,
) -> Response {
    if !authorized(&state, &query) {
        warn!("Rejected action call with invalid token");
        return unauthorized();
    }

    match state.actions.run(&call).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            warn!("{}", e);
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": e.to_string(), "action_name": e.0})),
            )
                .into_response()
        }
    }
}

/// Messages to run through the language detection stage, with the
/// conversation's current slots.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub slots: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub messages: Vec<Message>,
    /// Slot events for the framework to apply to the tracker
    pub events: Vec<Event>,
}

async fn process_messages(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    Json(request): Json<ProcessRequest>,
) -> Response {
    if !authorized(&state, &query) {
        warn!("Rejected process call with invalid token");
        return unauthorized();
    }

    let mut slots = SlotMap::from_slots(request.slots);
    let messages = state.pipeline.process(request.messages, &mut slots).await;

    Json(ProcessResponse {
        messages,
        events: slots.events(),
    })
    .into_response()
}
