use crate::prelude::{eprintln, *};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const MESSAGE_PATH: &str = "/message";

pub async fn run_sse(options: super::cli::SseOptions, global: crate::Global) -> Result<()> {
    let addr = format!("{}:{}", options.host, options.port);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app_router = Router::new()
        .route("/sse", get(sse_handler))
        .route(MESSAGE_PATH, post(message_handler))
        .layer(cors)
        .with_state(Arc::new(global.clone()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    if global.verbose {
        eprintln!("MCP server listening on http://{addr}");
        eprintln!("SSE endpoint: http://{addr}/sse");
        eprintln!("Message endpoint: http://{addr}/message");
    }

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

/// Announce where to POST JSON-RPC messages, then hold the stream open.
async fn sse_handler() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let endpoint = Event::default().event("endpoint").data(MESSAGE_PATH);
    let stream = stream::once(async move { Ok(endpoint) }).chain(stream::pending());

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn message_handler(
    State(global): State<Arc<crate::Global>>,
    Json(request): Json<serde_json::Value>,
) -> Response {
    match super::handle_request(&request.to_string(), &global).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
