use axum::extract::DefaultBodyLimit;
use devprofile_backend::{
    bootstrap::{self, LogTarget},
    middleware::cors::cors_layer,
    routes,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ctx = bootstrap::start(LogTarget::Stdout).await?;
    let config = ctx.config;

    let mut app = routes::router();

    // Only a path-style MEDIA_URL is served locally; an absolute URL points at external storage.
    let media_mount = format!("/{}", config.media_url.trim_matches('/'));
    if config.media_url.starts_with('/') && media_mount != "/" {
        info!(
            "Serving media from {} at {}",
            config.media_root.display(),
            media_mount
        );
        app = app.nest_service(&media_mount, ServeDir::new(&config.media_root));
    }

    let app = app
        .with_state(ctx.state())
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ctx.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
