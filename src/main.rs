use anyhow::Result;
use axum::{routing::get, Router};
use dotenvy::dotenv;
use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use crate::clock::{Clock, SystemClock};
use crate::reminders::InboxSink;
use crate::store::Store;

mod clock;
mod models;
mod phase;
mod reminders;
mod routes;
mod store;

/// Shared handles every route module extracts.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub clock: Arc<dyn Clock>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let addr: SocketAddr = env::var("CYCLECARE_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3050".to_string())
        .parse()?;
    let lead_minutes = env::var("REMINDER_LEAD_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(reminders::DEFAULT_LEAD_MINUTES);
    let tick_seconds = env::var("REMINDER_TICK_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(reminders::DEFAULT_TICK_SECONDS);

    let store = Store::new();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState {
        store: store.clone(),
        clock: clock.clone(),
    };

    let sink = Arc::new(InboxSink::new(store.clone(), clock.clone()));
    let scheduler = reminders::spawn(
        store,
        clock,
        sink,
        lead_minutes,
        Duration::from_secs(tick_seconds),
    );

    let app = Router::new()
        .merge(routes::cycle::routes(state.clone()))
        .merge(routes::symptoms::routes(state.clone()))
        .merge(routes::medications::routes(state.clone()))
        .merge(routes::notifications::routes(state.clone()))
        .merge(routes::insights::routes(state))
        .route("/health", get(|| async { "✅ Backend up" }));

    tracing::info!("🧠 Server running at {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("⏹️ Shutdown signal received");
    })
    .await?;

    scheduler.shutdown().await;

    Ok(())
}
