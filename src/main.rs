use household_kpi::config::Config;
use household_kpi::server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "household_kpi=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        version = household_kpi::VERSION,
        regional = %config.regional,
        "Starting household KPI service on {}",
        config.address()
    );

    let host = config.host.clone();
    let port = config.port;
    let (_state, app) = server::build_app(config)?;
    let (actual_port, handle) = server::serve(app, &host, port).await?;

    tracing::info!("Listening on http://{}:{}", host, actual_port);

    handle.await?;
    Ok(())
}
