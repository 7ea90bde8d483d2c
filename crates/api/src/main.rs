use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newhire_api::audit::AuditSink;
use newhire_api::config::ServerConfig;
use newhire_api::pdf::PdfClient;
use newhire_api::router::build_app_router;
use newhire_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newhire_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = newhire_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    newhire_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    newhire_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Email ---
    let mailer = match newhire_mailer::EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!("SMTP configured; onboarding notices will be sent");
            Some(Arc::new(newhire_mailer::Mailer::new(email_config)))
        }
        None => {
            tracing::warn!("SMTP not configured; onboarding notices will be logged and skipped");
            None
        }
    };

    // --- PDF collaborator ---
    let pdf = Arc::new(PdfClient::new(config.pdf_service_url.clone()));
    if pdf.is_configured() {
        tracing::info!("PDF service configured");
    } else {
        tracing::warn!("PDF service not configured; generation jobs will fail immediately");
    }

    // --- State & router ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        mailer,
        audit: AuditSink::new(pool),
        pdf,
    };
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT combination");
    tracing::info!(%addr, "Starting onboarding API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
