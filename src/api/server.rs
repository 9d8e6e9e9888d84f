use std::sync::{Arc, RwLock};

use anyhow::{Error, Result};
use axum::middleware;
use axum::{Router, extract::Request, response::Response};
use http::{HeaderValue, header};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;
use super::sessions::BotFactory;
use crate::ai::chat::{Variant, open_store};
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::openai::OpenAIChatModel;

async fn set_static_cache_control(request: Request, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

pub fn app(shared_state: Arc<RwLock<AppState>>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        // API routes
        .nest("/api", routes::router())
        // Static server of the chat page in ./web-ui
        .fallback_service(
            ServiceBuilder::new()
                .layer(middleware::from_fn(set_static_cache_control))
                .service(ServeDir::new("./web-ui")),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

/// Builds the factory for the chosen chatbot. For RAG this opens the
/// vector store, indexing the documents on the first run.
pub async fn bot_factory(config: &AppConfig, variant: Variant) -> Result<BotFactory, Error> {
    let model = Arc::new(OpenAIChatModel::new(
        &config.openai_api_hostname,
        &config.openai_api_key,
        &config.openai_model,
        config.openai_temperature,
    ));

    let factory = match variant {
        Variant::Plain => BotFactory::plain(model),
        Variant::Rag => BotFactory::rag(model, open_store(config).await?),
    };
    Ok(factory)
}

/// Runs the server. Expects the caller to have set up tracing.
pub async fn serve(
    host: String,
    port: String,
    config: AppConfig,
    variant: Variant,
) -> Result<(), Error> {
    let factory = bot_factory(&config, variant).await?;
    let app_state = AppState::new(factory);
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::info!(
        "Serving {:?} chatbot. Listening on {}",
        variant,
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
