use std::sync::Arc;

use ava_mcp_server::{
    backend::MockTalentBackend, build_app, config::Config, domain::registry::Registry, logging,
    AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let registry = Arc::new(Registry::standard()?);
    let state = AppState::new(registry.clone(), Arc::new(MockTalentBackend::new()));
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.listen_address()).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );
    info!(
        tools = %join_names(registry.tools().iter().map(|tool| tool.name.as_str())),
        resources = %join_names(registry.resources().iter().map(|resource| resource.uri.as_str())),
        prompts = %join_names(registry.prompts().iter().map(|prompt| prompt.name.as_str())),
        "capabilities registered"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutting down");
    Ok(())
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
