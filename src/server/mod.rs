//! HTTP server for the task REST API.

mod routes;

pub use routes::build_router;

use std::net::SocketAddr;

use anyhow::Result;
use tokio::sync::oneshot;
use tracing::info;

use crate::service::TaskService;

/// Start the HTTP server on the specified port.
///
/// Returns a oneshot sender that can be used to signal shutdown, and the
/// actual address the server is bound to.
pub async fn start_server(
    service: TaskService,
    port: u16,
) -> Result<(oneshot::Sender<()>, SocketAddr)> {
    let app = build_router(service);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Task API listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Task API shutting down");
            })
            .await
        {
            tracing::error!("Task API server error: {}", e);
        }
    });

    Ok((shutdown_tx, bound_addr))
}
