use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use leasehold_api::auth::jwt::TokenVerifier;
use leasehold_api::config::{LogFormat, ServerConfig};
use leasehold_api::router::build_app_router;
use leasehold_api::state::AppState;
use leasehold_db::DbPool;
use leasehold_providers::{Geocoder, NominatimGeocoder, PaymentGateway, PaystackClient};

const DEFAULT_LOG_FILTER: &str = "leasehold_api=debug,leasehold_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();
    init_tracing(config.log_format);

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = connect_database(&database_url).await;
    let state = build_state(pool.clone(), &config);
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Leasehold API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Draining database pool");
    pool.close().await;
    tracing::info!("Shutdown complete");
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Connect, probe and migrate. Any failure aborts startup.
async fn connect_database(url: &str) -> DbPool {
    let pool = leasehold_db::create_pool(url)
        .await
        .expect("Failed to connect to database");
    leasehold_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    leasehold_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");
    pool
}

/// Wire the provider clients. Missing credentials disable the features that
/// need them instead of stopping the server.
fn build_state(pool: DbPool, config: &ServerConfig) -> AppState {
    let token_verifier = match config.identity.jwt_public_key.as_deref() {
        Some(pem) => Some(Arc::new(
            TokenVerifier::from_rsa_pem(pem).expect("CLERK_JWT_PUBLIC_KEY must be an RSA PEM key"),
        )),
        None => {
            tracing::warn!("CLERK_JWT_PUBLIC_KEY not set; authenticated routes will answer 401");
            None
        }
    };

    if config.identity.webhook_secret.is_none() {
        tracing::warn!("CLERK_WEBHOOK_SECRET not set; identity webhooks will be refused");
    }

    let payment_gateway = match &config.payments.secret_key {
        Some(key) => {
            let client = PaystackClient::new(&config.payments.base_url, key.clone())
                .expect("Failed to build payment gateway client");
            Some(Arc::new(client) as Arc<dyn PaymentGateway>)
        }
        None => {
            tracing::warn!("PAYSTACK_SECRET_KEY not set; payment endpoints are disabled");
            None
        }
    };

    let geocoder: Arc<dyn Geocoder> = Arc::new(
        NominatimGeocoder::new(&config.geocoder.base_url, &config.geocoder.user_agent)
            .expect("Failed to build geocoder client"),
    );

    AppState {
        pool,
        config: Arc::new(config.clone()),
        token_verifier,
        payment_gateway,
        geocoder,
    }
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
