//! HTTP API server

use anyhow::Result;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::content::PostRepository;
use crate::error::{self, BlogError};
use crate::render::Renderer;
use crate::BlogApi;

/// Server state shared by every request.
///
/// Read-only: requests never coordinate with each other.
pub struct ServerState {
    repository: PostRepository,
    renderer: Arc<dyn Renderer>,
    expose_errors: bool,
}

impl ServerState {
    pub fn new(repository: PostRepository, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            repository,
            renderer,
            expose_errors: false,
        }
    }

    pub fn from_api(api: &BlogApi) -> Self {
        Self {
            repository: api.repository(),
            renderer: api.renderer(),
            expose_errors: api.config.expose_errors,
        }
    }

    pub fn expose_errors(mut self, expose: bool) -> Self {
        self.expose_errors = expose;
        self
    }
}

/// Build the API router: `GET /posts` and `GET /posts/:slug`, any origin allowed
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/posts", get(list_posts_handler))
        .route("/posts/:slug", get(get_post_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Start the API server
pub async fn start(api: &BlogApi, ip: &str, port: u16) -> Result<()> {
    let app = router(ServerState::from_api(api));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!(
        "Serving {:?} ({:?} mode)",
        api.posts_dir,
        api.config.render
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Blog API running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Front-matter of every post
async fn list_posts_handler(State(state): State<Arc<ServerState>>) -> Response {
    let repository = state.repository.clone();
    match run_blocking(move || repository.list_posts()).await {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => e.into_response_with(state.expose_errors),
    }
}

/// One post, raw or compiled depending on the renderer
async fn get_post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let task_state = state.clone();
    let result = run_blocking(move || {
        crate::load_post(&task_state.repository, task_state.renderer.as_ref(), &slug)
    })
    .await;

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response_with(state.expose_errors),
    }
}

/// Disk reads and compilation run off the async workers
async fn run_blocking<T, F>(f: F) -> error::Result<T>
where
    F: FnOnce() -> error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BlogError::Task(e.to_string()))?
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
