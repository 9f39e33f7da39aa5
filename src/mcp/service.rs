//! MCP transports
//!
//! stdio is the default. The Streamable HTTP service can be nested into an
//! Axum router or served standalone with [`serve_http`].

use std::net::IpAddr;

use axum::Router;
use rmcp::ServiceExt;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::client::TodoistClient;

use super::server::TodoistServer;

/// Create the MCP Streamable HTTP service.
///
/// Every session gets its own [`TodoistServer`]; they share the client's
/// connection pool.
///
/// # Example
/// ```no_run
/// use axum::Router;
/// use tokio_util::sync::CancellationToken;
/// # use todoist_mcp::client::TodoistClient;
/// # use todoist_mcp::config::Config;
/// # use todoist_mcp::mcp::create_mcp_service;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let client = TodoistClient::new(&Config::new("token")?)?;
///
/// let ct = CancellationToken::new();
/// let app: Router = Router::new().nest_service("/mcp", create_mcp_service(client, ct));
/// # Ok(())
/// # }
/// ```
pub fn create_mcp_service(
    client: TodoistClient,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<TodoistServer, LocalSessionManager> {
    // rmcp expects the factory to fail with io::Error
    let service_factory =
        move || -> Result<TodoistServer, std::io::Error> { Ok(TodoistServer::new(client.clone())) };

    let config = StreamableHttpServerConfig::default()
        .with_sse_keep_alive(None)
        .with_stateful_mode(true)
        .with_cancellation_token(cancellation_token);

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}

/// Router with the MCP endpoint mounted at `/mcp`.
pub fn mcp_router(client: TodoistClient, cancellation_token: CancellationToken) -> Router {
    Router::new().nest_service("/mcp", create_mcp_service(client, cancellation_token))
}

/// Serve over stdin/stdout until the peer disconnects.
pub async fn serve_stdio(client: TodoistClient) -> std::io::Result<()> {
    info!("Serving MCP over stdio");
    let service = TodoistServer::new(client)
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    service
        .waiting()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(())
}

/// Serve Streamable HTTP on `host:port` until Ctrl-C.
pub async fn serve_http(client: TodoistClient, host: IpAddr, port: u16) -> std::io::Result<()> {
    let ct = CancellationToken::new();
    let app = mcp_router(client, ct.clone());

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("MCP server listening on http://{}/mcp", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
            ct.cancel();
        })
        .await
}
