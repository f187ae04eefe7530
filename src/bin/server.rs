use clap::Parser;
use std::path::Path;
use std::time::Duration;
use users_etl::core::ConfigProvider;
use users_etl::server::{create_router, shutdown_signal, AppState};
use users_etl::utils::{logger, validation::Validate};
use users_etl::{Converter, HttpDelivery, ServiceConfig};

#[derive(Parser)]
#[command(name = "users-etl-server")]
#[command(about = "HTTP service that converts XML user batches and relays them as JSON")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "users-etl.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match ServiceConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let _log_guard =
        logger::init_service_logger(&config.logging.level, config.logging.file.as_deref().map(Path::new));

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    tracing::info!("✅ Configuration loaded from {}", args.config);

    let mut converter = Converter::new(config.rules);
    if let Some(workers) = config.workers() {
        converter = converter.with_max_workers(workers);
    }
    let delivery = HttpDelivery::from_config(&config)?;
    tracing::info!("✅ Delivering to {}", delivery.endpoint());

    let state = AppState::new(converter, delivery, config.auth_key()?);
    // Leave room for the downstream call to time out first.
    let request_timeout = config.request_timeout() + Duration::from_secs(5);
    let app = create_router(state, request_timeout);

    let addr = config.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("✅ Server stopped");
    Ok(())
}
