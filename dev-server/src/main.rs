//! Development server for UI work
//!
//! Runs the in-memory mock backend on a fixed port with a sample dataset so
//! the UI has documents, summaries and stats to show.
//!
//! Usage: cargo run -p dev-server
//!
//! Reads `IP_ADDRESS`, `PORT` and `ALLOWED_ORIGINS` from the environment or
//! a `.env` file.

use actix_web::web;
use anyhow::Result;
use payloads::{APIClient, ClientConfig};
use test_helpers::mock::DevDataset;
use test_helpers::{MockConfig, Store, TestApp, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber);

    info!("🚀 Starting mock document backend");

    let mut config = MockConfig::from_env()?;
    let store = web::Data::new(Store::default());
    let server = test_helpers::build(&mut config, store.clone())?;
    let server = tokio::spawn(server);

    let address = format!("http://{}:{}", config.ip, config.port);
    info!("✅ API server running on {address}");

    let app = TestApp {
        port: config.port,
        client: APIClient::new(ClientConfig::new(address.clone())),
        address: address.clone(),
        store,
    };

    info!("📊 Setting up development data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🎯 Development server ready!");
    info!("   API: {address}");
    info!("   UI:  cd ui && BACKEND_URL={address} trunk serve");
    dataset.print_summary();
    info!("👋 Press Ctrl+C to shutdown");

    tokio::select! {
        result = server => result??,
        result = tokio::signal::ctrl_c() => result?,
    }
    info!("🛑 Shutting down development server");
    Ok(())
}
