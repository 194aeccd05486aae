use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use room_sensor_dialog::adapters::http::{app_router, ConversationAppState, ProfileAppState};
use room_sensor_dialog::adapters::{
    RestDialogConfig, RestDialogService, RestTelemetryConfig, RestTelemetryService,
    UnboundTelemetryService,
};
use room_sensor_dialog::application::{
    ConversationSettings, GetProfileHandler, HandleConversationHandler, SharedDeviceDirectory,
};
use room_sensor_dialog::config::{AppConfig, ConfigError};
use room_sensor_dialog::ports::{DialogService, TelemetryService};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info", false);
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.server.log_level, config.server.json_logs());

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server stopped");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (dialog_id, source) = config.dialog.resolve_dialog_id();
    tracing::info!(dialog_id = %dialog_id, source = %source, "Using dialog");

    let dialog: Arc<dyn DialogService> = Arc::new(RestDialogService::new(
        RestDialogConfig::from_config(&config.dialog, dialog_id),
    )?);

    let telemetry: Arc<dyn TelemetryService> =
        match RestTelemetryConfig::from_config(&config.telemetry) {
            Some(telemetry_config) => {
                tracing::info!(base_url = %telemetry_config.base_url, "Telemetry platform bound");
                Arc::new(RestTelemetryService::new(telemetry_config)?)
            }
            None => {
                tracing::warn!("No telemetry credentials configured; device lookups will be unavailable");
                Arc::new(UnboundTelemetryService)
            }
        };

    let conversation = HandleConversationHandler::new(
        dialog.clone(),
        telemetry,
        SharedDeviceDirectory::new(),
        ConversationSettings::from(&config.conversation),
    );
    let profile = GetProfileHandler::new(dialog);

    let app = app_router(
        ConversationAppState::new(Arc::new(conversation)),
        ProfileAppState::new(Arc::new(profile)),
        &config.server,
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
