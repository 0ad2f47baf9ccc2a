//! Tradedesk - headless account-management core
//!
//! Loads the authenticated user's trading accounts and, in mock mode, walks
//! the newest account through the full sync and mode-change workflows.
//!
//! # Usage
//! ```sh
//! MODE=mock cargo run
//! ```
//!
//! # Environment Variables
//! - `MODE` - 'mock' (default) or 'rest'
//! - `SESSION_USER_ID` - authenticated user id (mock mode defaults to a demo user)
//! - `BACKEND_BASE_URL` / `BACKEND_API_KEY` / `BACKEND_API_SECRET` - rest mode credentials

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

use tradedesk::application::system::Application;
use tradedesk::config::{Config, Mode};
use tradedesk::domain::types::TradingMode;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Tradedesk {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!("Configuration loaded: Mode={:?}", config.mode);

    let app = Application::build(config.clone()).await?;

    // Initial dashboard load.
    app.store.fetch_accounts().await;
    let accounts = app.store.accounts().await;
    info!("Loaded {} accounts.", accounts.len());
    for account in &accounts {
        info!(
            "  {} [{}] active={} mode={} risk={} balance={}",
            account.name,
            account.id,
            account.is_active,
            account.trading_mode,
            account.risk_level,
            account.balance
        );
    }

    if config.mode == Mode::Mock {
        // Demonstration pass over the newest account: exchange sync, then a
        // round trip through demo mode and back into real mode.
        if let Some(account) = accounts.first() {
            app.sync.sync_account(&account.id).await;
            app.mode
                .change_trading_mode(&account.id, TradingMode::Demo)
                .await;
            app.mode
                .change_trading_mode(&account.id, TradingMode::Real)
                .await;

            if let Some(analysis) = app.analyst.last_analysis().await {
                info!(
                    "Latest analysis: affects_real_money={}",
                    analysis.affects_real_money
                );
            }
        }
    }

    info!("Done.");
    Ok(())
}
