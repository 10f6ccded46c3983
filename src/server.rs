use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{response::Html, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use url::form_urlencoded;
use uuid::Uuid;

use crate::config::Config;
use crate::error::display_error;
use crate::openai::{CompletionClient, OpenAiClient};
use crate::page::render_page;
use crate::prompt::AnalysisForm;

#[derive(Clone)]
pub struct AppState {
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(completion: impl CompletionClient + 'static) -> Self {
        AppState {
            completion: Arc::new(completion),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_form).post(analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn show_form() -> Html<String> {
    Html(render_page(None))
}

async fn analyze(State(state): State<AppState>, request: Request) -> Html<String> {
    let request_id = Uuid::new_v4();
    let span = info_span!("analysis", %request_id);

    let result = async {
        let form = read_form(request).await;
        let prompt = form.build_prompt();
        info!(
            topic_len = form.topic.len(),
            concepts_len = form.concepts.len(),
            explanation_len = form.explanation.len(),
            "requesting gap analysis"
        );
        match state.completion.request_completion(&prompt).await {
            Ok(text) => {
                info!(reply_len = text.len(), "gap analysis complete");
                text
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "completion request failed");
                display_error(&err)
            }
        }
    }
    .instrument(span)
    .await;

    Html(render_page(Some(&result)))
}

/// Reads the posted fields without ever rejecting the request. Multipart bodies are
/// read field by field; anything else is parsed as urlencoded, whatever its content type.
async fn read_form(request: Request) -> AnalysisForm {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let mut multipart = match Multipart::from_request(request, &()).await {
            Ok(multipart) => multipart,
            Err(rejection) => {
                warn!(error = %rejection, "unreadable multipart body");
                return AnalysisForm::default();
            }
        };
        let mut pairs = Vec::new();
        loop {
            match multipart.next_field().await {
                Ok(Some(field)) => {
                    let Some(name) = field.name().map(str::to_string) else {
                        continue;
                    };
                    match field.text().await {
                        Ok(value) => pairs.push((name, value)),
                        Err(err) => warn!(field = %name, error = %err, "skipping multipart field"),
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "multipart body ended early");
                    break;
                }
            }
        }
        return AnalysisForm::from_pairs(pairs);
    }

    match Bytes::from_request(request, &()).await {
        Ok(body) => AnalysisForm::from_pairs(form_urlencoded::parse(&body).into_owned()),
        Err(rejection) => {
            warn!(error = %rejection, "unreadable form body");
            AnalysisForm::default()
        }
    }
}

/// Builds the OpenAI client, binds the listener and serves until the process exits.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let client = OpenAiClient::new(&config)?;
    let app = router(AppState::new(client));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %listener.local_addr()?, model = %config.model, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
