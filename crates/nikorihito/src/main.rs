//! nikorihito Discord persona bot.
//!
//! Wires the gateway, the persona brain, the periodic jobs and a small
//! keep-alive HTTP endpoint together, and runs until Ctrl+C.

mod config;
mod routes;
mod state;

use std::sync::Arc;

use broadcaster::Broadcaster;
use database::Database;
use discord_gateway::{DiscordGateway, GatewayConfig};
use gemini_brain::{GeminiBrain, GoogleSpeech, GoogleSpeechConfig};
use message_listener::{MessageProcessor, ProcessorConfig};
use persona_brain::{FatigueLadder, PersonaBrain, PersonaConfig};
use scheduler::{MorningBroadcast, ReminderScheduler, SchedulerConfig};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .nikorihito / .env files if present
    let _ = dotenvy::from_filename(".nikorihito");
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let persona_config = PersonaConfig::from_env()?;
    let scheduler_config = SchedulerConfig::from_env()?;
    let gateway_config = GatewayConfig::from_env()?;
    info!(data_dir = %config.data_dir.display(), "Starting nikorihito");

    let db = Arc::new(Database::open(&config.data_dir)?);

    // Persona
    let generator = GeminiBrain::from_env()?;
    info!(model = %generator.config().model, "Using Gemini backend");
    let fatigue = Arc::new(FatigueLadder::new());
    let brain = PersonaBrain::new(generator, db.clone(), fatigue.clone(), persona_config);

    // Discord
    let (gateway, client, events) = DiscordGateway::connect(gateway_config).await?;
    let gateway_shutdown = gateway.shutdown_handle();

    let mut processor =
        MessageProcessor::new(brain, client.clone(), db.clone(), ProcessorConfig::default());
    match GoogleSpeechConfig::from_env(config.data_dir.join("tts")) {
        Some(speech_config) => {
            info!("Speech synthesis enabled");
            processor = processor.with_speech(Arc::new(GoogleSpeech::new(speech_config)?));
        }
        None => info!("GOOGLE_TTS_API_KEY not set, replies are text only"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Periodic jobs
    let reminders = ReminderScheduler::new(db.clone(), Broadcaster::new(client.clone()));
    let morning = MorningBroadcast::new(
        db.clone(),
        fatigue,
        Broadcaster::new(client),
        scheduler_config.morning_time,
    );
    let tick = scheduler_config.tick;
    let reminder_task = tokio::spawn({
        let rx = shutdown_rx.clone();
        async move { reminders.run_with_shutdown(tick, stopped(rx)).await }
    });
    let morning_task = tokio::spawn({
        let rx = shutdown_rx.clone();
        async move { morning.run_with_shutdown(tick, stopped(rx)).await }
    });

    // Keep-alive server
    let health_task = match config.health_addr {
        Some(addr) => {
            let app = routes::router().with_state(AppState::new(db.clone()));
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(addr = %addr, "Health endpoint listening");
            let rx = shutdown_rx.clone();
            Some(tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(stopped(rx))
                    .await
            }))
        }
        None => None,
    };

    let gateway_task = tokio::spawn(gateway.run());

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Ctrl+C received, shutting down");
    };
    if let Err(e) = processor.run_with_shutdown(events, ctrl_c).await {
        warn!("Message processor stopped: {}", e);
    }

    let _ = shutdown_tx.send(true);
    gateway_shutdown.shutdown().await;

    if let Err(e) = reminder_task.await {
        error!("Reminder loop panicked: {}", e);
    }
    if let Err(e) = morning_task.await {
        error!("Morning loop panicked: {}", e);
    }
    if let Some(task) = health_task {
        match task.await {
            Ok(Err(e)) => error!("Health server failed: {}", e),
            Err(e) => error!("Health server panicked: {}", e),
            Ok(Ok(())) => {}
        }
    }
    match gateway_task.await {
        Ok(Err(e)) => error!("Discord gateway failed: {}", e),
        Err(e) => error!("Discord gateway panicked: {}", e),
        Ok(Ok(())) => {}
    }

    info!("nikorihito stopped");
    Ok(())
}

/// Resolves once shutdown has been requested.
async fn stopped(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
