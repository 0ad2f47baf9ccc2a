use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::application::account_store::AccountStore;
use crate::application::analyst::RiskAnalyst;
use crate::application::mode::ModeCoordinator;
use crate::application::sync::SyncCoordinator;
use crate::config::{Config, Mode};
use crate::domain::ports::{AccountDirectory, ExchangeGateway, Notifier, SessionProvider};
use crate::infrastructure::mock::{MockAccountDirectory, MockBrokerageState, MockExchangeGateway};
use crate::infrastructure::notification_hub::NotificationHub;
use crate::infrastructure::rest::RestBackendClient;
use crate::infrastructure::session::StaticSessionProvider;

/// Fully wired account-management core: one store, one analyst, the two
/// coordinators, and the notification hub they all publish into.
pub struct Application {
    pub config: Config,
    pub notifications: Arc<NotificationHub>,
    pub store: Arc<AccountStore>,
    pub analyst: Arc<RiskAnalyst>,
    pub sync: Arc<SyncCoordinator>,
    pub mode: Arc<ModeCoordinator>,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self> {
        info!("Building tradedesk application (Mode: {:?})...", config.mode);

        let hub = Arc::new(NotificationHub::new());
        let notifier: Arc<dyn Notifier> = hub.clone();

        let (directory, gateway, sessions): (
            Arc<dyn AccountDirectory>,
            Arc<dyn ExchangeGateway>,
            Arc<dyn SessionProvider>,
        ) = match config.mode {
            Mode::Mock => {
                let user_id = config
                    .session_user_id
                    .clone()
                    .unwrap_or_else(|| "demo-user".to_string());
                let state = Arc::new(MockBrokerageState::seeded(&user_id).await);
                (
                    Arc::new(MockAccountDirectory::new(state.clone())),
                    Arc::new(MockExchangeGateway::new(state)),
                    Arc::new(StaticSessionProvider::with_user(user_id)),
                )
            }
            Mode::Rest => {
                let client = Arc::new(RestBackendClient::new(
                    config.backend_base_url.clone(),
                    config.backend_api_key.clone(),
                    config.backend_api_secret.clone(),
                ));
                let sessions: Arc<dyn SessionProvider> = match &config.session_user_id {
                    Some(user_id) => Arc::new(StaticSessionProvider::with_user(user_id.clone())),
                    None => Arc::new(StaticSessionProvider::signed_out()),
                };
                (
                    client.clone() as Arc<dyn AccountDirectory>,
                    client as Arc<dyn ExchangeGateway>,
                    sessions,
                )
            }
        };

        let store = Arc::new(AccountStore::new(directory, sessions, notifier.clone()));
        let analyst = Arc::new(RiskAnalyst::new(gateway.clone(), notifier.clone()));
        let sync = Arc::new(SyncCoordinator::new(
            gateway.clone(),
            store.clone(),
            analyst.clone(),
            notifier.clone(),
        ));
        let mode = Arc::new(ModeCoordinator::new(
            gateway,
            store.clone(),
            analyst.clone(),
            notifier,
        ));

        Ok(Self {
            config,
            notifications: hub,
            store,
            analyst,
            sync,
            mode,
        })
    }
}
