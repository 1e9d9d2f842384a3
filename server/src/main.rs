mod clock;
mod config;
mod db;
mod models;
mod rpc;
mod services;
mod store;

use std::sync::Arc;

use forum_contracts::ForumServer;
use tonic::transport::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");

    let client = db::connect(&config).await.expect("mongodb client init failed");
    let (topics, messages) = db::open_collections(&client, &config.database);
    let service = services::forum::ForumService::new(Arc::new(topics), Arc::new(messages));
    let rpc = rpc::ForumRpc::new(service, config.redact_internal_errors);

    if config.redact_internal_errors {
        tracing::info!("internal error text redacted from responses");
    }
    tracing::info!(addr = %config.listen_addr, database = %config.database, "forum listening");

    Server::builder()
        .trace_fn(|req| tracing::info_span!("grpc", path = %req.uri().path()))
        .add_service(ForumServer::new(rpc))
        .serve_with_shutdown(config.listen_addr, shutdown_signal())
        .await
        .expect("server failed");

    tracing::info!("forum stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
