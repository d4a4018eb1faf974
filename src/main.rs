use dotenvy::dotenv;
use gatehouse::router::init_router;
use gatehouse::state::init_app_state;
use gatehouse_config::AppConfig;
use gatehouse_observability::{init_metrics, init_tracing, shutdown_tracer};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.environment.as_str());

    if let Err(e) = run(config).await {
        error!(error = ?e, "Server stopped with an error");
        shutdown_tracer().await;
        std::process::exit(1);
    }

    shutdown_tracer().await;
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let state = init_app_state(&config).await?;
    let metrics = init_metrics();
    let app = init_router(state, metrics);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        %addr,
        environment = %config.environment,
        token_expiration_ms = config.auth.token_expiration.as_millis() as u64,
        "Server running"
    );
    info!("Swagger UI available at http://{addr}/swagger-ui");
    info!("Scalar UI available at http://{addr}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
