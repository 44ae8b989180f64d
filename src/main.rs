mod agents;
mod api;
mod config;
mod llm;
mod runtime;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use api::handlers::{generate, inquiry};
use api::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Read configuration
    let settings = config::Settings::from_env().expect("Invalid configuration");

    // Build the generative model client shared by agents and handlers
    let model: Arc<dyn llm::GenerativeModel> = Arc::new(
        llm::GeminiClient::new(
            settings.gemini_api_key.clone(),
            settings.text_model.clone(),
            settings.image_model.clone(),
            settings.llm_timeout,
        )
        .expect("Failed to build Gemini client"),
    );

    // Bridge between the client engagement agent and blocked inquiry callers
    let (responses_tx, responses_rx) = runtime::bridge::channel(runtime::bridge::DEFAULT_CAPACITY);

    // Register and start the agent roster
    tracing::info!("Initializing agent system...");
    let mut registry = agents::build_registry(Arc::clone(&model), responses_tx)
        .expect("Failed to register agents");
    registry.start_all();
    tracing::info!("Agents started successfully");

    let state = AppState {
        resolver: registry.resolver(),
        responses: Arc::new(responses_rx),
        model,
        inquiry_timeout: settings.inquiry_timeout,
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health check
        .route("/", get(inquiry::welcome))
        // Workflow entry point
        .route("/client_inquiry", post(inquiry::client_inquiry))
        // Direct model access
        .route("/generate_text", post(generate::generate_text))
        .route("/generate_image", post(generate::generate_image))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state);

    // Start server
    let addr = settings.bind_addr;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    // Let every agent finish its in-flight work before the process exits
    tracing::info!("Stopping agents...");
    registry.stop_all().await;
    tracing::info!("Agents stopped successfully");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
