//! Stand-in collector for manual end-to-end runs: accepts the JSON batch and
//! echoes it back with a short summary.

use axum::{
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::Serialize;
use users_etl::utils::logger;
use users_etl::OutputUser;

#[derive(Parser)]
#[command(name = "users-collector")]
#[command(about = "Test collector that receives converted users")]
struct Args {
    #[arg(long, default_value = "0.0.0.0:8081")]
    listen: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct CollectorResponse {
    status: &'static str,
    message: String,
    received_at: String,
    processed_by: &'static str,
    user_count: usize,
    users: Vec<OutputUser>,
}

const PROCESSED_BY: &str = "users-collector";

async fn receive_users(Json(users): Json<Vec<OutputUser>>) -> impl IntoResponse {
    tracing::info!("Received {} users", users.len());
    for (i, user) in users.iter().enumerate() {
        tracing::debug!(
            "#{} id={} name={} email={} group={}",
            i + 1,
            user.id,
            user.full_name,
            user.email,
            user.age_group
        );
    }

    let response = CollectorResponse {
        status: "success",
        message: format!("Received {} users", users.len()),
        received_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        processed_by: PROCESSED_BY,
        user_count: users.len(),
        users,
    };

    (
        [(
            HeaderName::from_static("x-processed-by"),
            HeaderValue::from_static(PROCESSED_BY),
        )],
        Json(response),
    )
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": PROCESSED_BY,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    let _log_guard = logger::init_service_logger(level, None);

    let app = Router::new()
        .route("/users", post(receive_users))
        .route("/health", get(health));

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    tracing::info!("🚀 Collector listening on {}", args.listen);
    axum::serve(listener, app).await?;
    Ok(())
}
