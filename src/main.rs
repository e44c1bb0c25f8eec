use clap::Parser;
use knowledge_base_mcp::config::ServerConfig;
use knowledge_base_mcp::router::create_app_router;
use knowledge_base_mcp::state::AppState;
use knowledge_base_mcp::stdio;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_tracing(config.log_json);

    // Initialize application state
    let state = AppState::initialize(&config).await?;

    if config.stdio {
        let engine = state.new_engine();
        tokio::spawn(async move {
            let stdin = BufReader::new(tokio::io::stdin());
            if let Err(e) = stdio::serve(engine, stdin, tokio::io::stdout()).await {
                tracing::error!(error = %e, "stdio transport failed");
            }
        });
    }

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    // Start the server
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Initialize tracing subscriber with environment filter.
///
/// Logs go to stderr so stdout stays free for the stdio transport.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("knowledge_base_mcp=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
