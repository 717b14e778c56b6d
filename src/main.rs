//! Membership checkout server.

use std::error::Error;
use std::sync::Arc;

use axum::http::HeaderName;
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use membership_checkout::adapters::postgres::{
    PostgresActivationTokenRepository, PostgresCredentialRepository, PostgresIntentRepository,
    PostgresMembershipRepository, PostgresPaymentAuditRepository,
};
use membership_checkout::adapters::{api_router, AppState, FlowGatewayAdapter, ResendMailer};
use membership_checkout::config::AppConfig;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let gateway = FlowGatewayAdapter::new(config.gateway.flow_config())?;
    let mailer = ResendMailer::new(config.resend_config());
    if config.email.api_key().is_none() {
        info!("No Resend API key configured, activation emails will be skipped");
    }

    let state = AppState {
        gateway: Arc::new(gateway),
        intents: Arc::new(PostgresIntentRepository::new(pool.clone())),
        memberships: Arc::new(PostgresMembershipRepository::new(pool.clone())),
        payment_audit: Arc::new(PostgresPaymentAuditRepository::new(pool.clone())),
        activation_tokens: Arc::new(PostgresActivationTokenRepository::new(pool.clone())),
        credentials: Arc::new(PostgresCredentialRepository::new(pool)),
        mailer: Arc::new(mailer),
        checkout: config.checkout_settings(),
        notification_verifier: config.gateway.inbound_verifier(),
    };

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let app = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        test_mode = config.gateway.test_mode,
        "Membership checkout listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
