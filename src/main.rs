//! Access Flow demo driver
//!
//! Plays a scripted signup followed by a login against the simulated
//! backends and logs every presentation event the workflow emits.

use access_flow::gateway::{ChannelGateway, PresentationEvent};
use access_flow::probe::SimulatedDirectory;
use access_flow::state::FlowKind;
use access_flow::storage::JsonFileStore;
use access_flow::submit::SimulatedAuthority;
use access_flow::{FlowConfig, FormSession, SessionPorts};
use anyhow::Result;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "access_flow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = FlowConfig::load()?;
    let (gateway, mut events) = ChannelGateway::new();

    // Stand-in renderer
    let renderer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            log_event(&event);
        }
    });

    let demo = config.demo_accounts().into_iter().next();
    let ports = SessionPorts {
        gateway: Arc::new(gateway),
        directory: Arc::new(SimulatedDirectory::new(
            config.reserved_usernames(),
            config.probe_latency(),
        )),
        authority: Arc::new(SimulatedAuthority::new(
            config.demo_accounts(),
            config.remote_latency(),
        )),
        store: Arc::new(JsonFileStore::new(config.storage_path())),
    };

    run_signup(&config, ports.clone()).await?;

    if let Some(account) = demo {
        let mut session = FormSession::new(&config, FlowKind::Login, ports)?;
        session.set_text("email", &account.email)?;
        session.set_text("password", &account.password)?;
        let result = session.submit().await?;
        tracing::info!("Login finished: {result:?}");
    }

    // Let the renderer catch up, then stop it
    tokio::time::sleep(Duration::from_millis(50)).await;
    renderer.abort();
    Ok(())
}

async fn run_signup(config: &FlowConfig, ports: SessionPorts) -> Result<()> {
    let mut session = FormSession::new(config, FlowKind::Signup, ports)?;

    session.set_text("first_name", "Ada")?;
    session.set_text("last_name", "Lovelace")?;
    // Keystroke by keystroke; only the last edit gets probed
    let typed = "admin";
    for end in 1..=typed.len() {
        session.set_text("username", &typed[..end])?;
    }
    tokio::time::sleep(config.debounce() + config.probe_latency()).await;
    tracing::info!("Username status: {:?}", session.availability());

    session.set_text("username", "countess")?;
    session.go_to_step(2)?;

    session.set_text("email", "ada@engine.io")?;
    let feedback = session.set_text("password", "Analytical#Engine1843")?;
    if let Some(strength) = feedback.strength {
        tracing::info!("Password strength: {}", strength.label().as_str());
    }
    session.set_text("confirm_password", "Analytical#Engine1843")?;
    session.go_to_step(3)?;

    session.set_checked("terms", true)?;
    let result = session.submit().await?;
    tracing::info!("Signup finished: {result:?}");
    Ok(())
}

fn log_event(event: &PresentationEvent) {
    match event {
        PresentationEvent::Notify { message, severity } => {
            tracing::info!(?severity, "notify: {message}");
        }
        PresentationEvent::Redirect { target } => tracing::info!("redirect -> {target}"),
        other => tracing::debug!("{other:?}"),
    }
}
