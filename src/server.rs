use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Extension, Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::persons::handlers::*;
use crate::persons::protocol::{ENDPOINT_INFO, ENDPOINT_PERSON, ENDPOINT_PERSONS};
use crate::persons::store::PersonStore;

/// Request bodies larger than this are refused before reaching a handler.
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(store: Arc<PersonStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(ENDPOINT_INFO, get(handle_info))
        .route(ENDPOINT_PERSONS, get(handle_list).post(handle_create))
        .route(
            ENDPOINT_PERSON,
            get(handle_get).put(handle_update).delete(handle_delete),
        )
        .fallback(handle_unknown_endpoint)
        .layer(Extension(store))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
}

/// Logs `method uri status elapsed body`, with the body shown for POST only.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("{} {} rejected: {}", method, uri, e);
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };
    let logged_body = if method == Method::POST {
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        "-".to_string()
    };

    let started = Instant::now();
    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    info!(
        "{} {} {} - {} ms {}",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed().as_millis(),
        logged_body
    );
    response
}

pub async fn open_store(config: &Config) -> anyhow::Result<Arc<PersonStore>> {
    let store = match &config.data_file {
        Some(path) => {
            info!("Opening phonebook snapshot {}", path.display());
            PersonStore::open(path).await?
        }
        None => {
            info!("PHONEBOOK_DATA_FILE not set, keeping persons in memory");
            PersonStore::in_memory()
        }
    };
    Ok(Arc::new(store))
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let app = router(store);

    let address = config.bind_address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
}
