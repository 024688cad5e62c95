use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::core::{NewTodo, Todo, TodoError, TodoId, TodoPatch};
use crate::storage::Storage;
use crate::transport::configure_tls;

#[cfg(feature = "tracing")]
use tower_http::trace::TraceLayer;
#[cfg(feature = "tracing")]
use tracing::{debug, info};

/// Shared handler state. The store is injected here and nowhere else.
pub struct AppState<S: Storage + 'static> {
    pub storage: Arc<S>,
}

impl<S: Storage + 'static> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

pub async fn list_todos<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Todo>>, TodoError> {
    let todos = state.storage.list_all().await?;
    #[cfg(feature = "tracing")]
    debug!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

pub async fn create_todo<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), TodoError> {
    let Json(body) = body?;
    let text = body
        .text
        .ok_or_else(|| TodoError::Validation("text is required".into()))?;
    let todo = state.storage.create(&text).await?;
    #[cfg(feature = "tracing")]
    debug!(id = %todo.id, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Todo>, TodoError> {
    let Json(patch) = body?;
    let todo = state.storage.update_by_id(&TodoId::from(id), &patch).await?;
    #[cfg(feature = "tracing")]
    debug!(id = %todo.id, completed = todo.completed, "Updated todo");
    Ok(Json(todo))
}

pub async fn delete_todo<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, TodoError> {
    let id = TodoId::from(id);
    state.storage.delete_by_id(&id).await?;
    #[cfg(feature = "tracing")]
    debug!(id = %id, "Deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_all_todos<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> Result<StatusCode, TodoError> {
    state.storage.delete_all().await?;
    #[cfg(feature = "tracing")]
    debug!("Deleted all todos");
    Ok(StatusCode::NO_CONTENT)
}

async fn health_route() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

fn api_routes<S: Storage + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/todos",
            get(list_todos::<S>)
                .post(create_todo::<S>)
                .delete(delete_all_todos::<S>),
        )
        .route(
            "/todos/{id}",
            axum::routing::patch(update_todo::<S>).delete(delete_todo::<S>),
        )
}

/// Cross-origin policy: only `origin` may call the API from a browser.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("invalid client origin: {origin}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Full application router: `/health` plus the todo API under `/api`.
pub fn router<S: Storage + 'static>(storage: Arc<S>, cors: CorsLayer) -> Router {
    let state = AppState { storage };
    let router = Router::new()
        .route("/health", get(health_route))
        .nest("/api", api_routes::<S>())
        .layer(cors);

    #[cfg(feature = "tracing")]
    let router = router.layer(TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    ));

    router.with_state(state)
}

/// Binds the IPv6 unspecified address (dual-stack, so IPv4 clients connect
/// too), falling back to IPv4 on hosts with IPv6 disabled.
async fn bind(port: u16) -> anyhow::Result<net::TcpListener> {
    let v6 = SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], port));
    match net::TcpListener::bind(&v6).await {
        Ok(listener) => Ok(listener),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            debug!(error = %_e, "IPv6 bind failed, using IPv4");
            let v4 = SocketAddr::from(([0, 0, 0, 0], port));
            net::TcpListener::bind(&v4)
                .await
                .with_context(|| format!("failed to listen on port {port}"))
        }
    }
}

pub struct HttpServer {
    router: Router,
    listener: net::TcpListener,
    tls: Option<RustlsConfig>,
}

impl HttpServer {
    pub async fn new<S: Storage + 'static>(
        storage: Arc<S>,
        config: &ServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(storage, cors_layer(&config.client_origin)?);
        let tls = match &config.tls {
            Some(paths) => Some(configure_tls(paths).await?),
            None => None,
        };

        let listener = bind(config.port).await?;

        Ok(Self {
            router,
            listener,
            tls,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        #[cfg(feature = "tracing")]
        info!(addr = ?self.listener.local_addr().ok(), tls = self.tls.is_some(), "HTTP server started");
        match self.tls {
            Some(tls) => {
                let listener = self
                    .listener
                    .into_std()
                    .context("failed to hand listener to TLS server")?;
                axum_server::from_tcp_rustls(listener, tls)
                    .serve(self.router.into_make_service())
                    .await
                    .context("received error from running TLS server")?;
            }
            None => {
                axum::serve(self.listener, self.router)
                    .await
                    .context("received error from running server")?;
            }
        }
        Ok(())
    }
}
