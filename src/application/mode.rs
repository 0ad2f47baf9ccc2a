use crate::application::account_store::AccountStore;
use crate::application::analyst::RiskAnalyst;
use crate::application::busy::OpFlag;
use crate::domain::ports::{ExchangeGateway, Notifier};
use crate::domain::types::{Notification, TradingMode};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const REAL_MODE_ACTIVE_TEXT: &str =
    "Real trading is now active. Orders placed on this account will affect real funds.";

/// Orchestrates a simulated/real mode switch. Entering real mode arms two
/// separate warnings: the mode-entry warning, and the analysis-confirmed
/// warning if the follow-up analysis reports real-money exposure.
pub struct ModeCoordinator {
    gateway: Arc<dyn ExchangeGateway>,
    store: Arc<AccountStore>,
    analyst: Arc<RiskAnalyst>,
    notifier: Arc<dyn Notifier>,
    changing: OpFlag,
}

impl ModeCoordinator {
    pub fn new(
        gateway: Arc<dyn ExchangeGateway>,
        store: Arc<AccountStore>,
        analyst: Arc<RiskAnalyst>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            store,
            analyst,
            notifier,
            changing: OpFlag::new(),
        }
    }

    pub fn is_changing_mode(&self) -> bool {
        self.changing.is_set()
    }

    /// Eligibility is the backend's call; this coordinator only adds the
    /// mandatory warning and analysis when the destination mode is real.
    pub async fn change_trading_mode(&self, account_id: &str, mode: TradingMode) {
        let _busy = self.changing.raise();
        info!(
            "ModeCoordinator: switching account {} to {} mode...",
            account_id, mode
        );

        match self.gateway.change_trading_mode(account_id, mode).await {
            Ok(outcome) if outcome.success => {
                self.notifier
                    .notify(Notification::info(
                        "Trading mode changed",
                        format!("{} is now enabled for this account", mode.label()),
                    ))
                    .await;
                self.store.fetch_accounts().await;

                if mode == TradingMode::Real {
                    self.notifier
                        .notify(Notification::real_trading_warning(REAL_MODE_ACTIVE_TEXT))
                        .await;
                    // A failure in here is the analyst's problem, never a
                    // mode-change failure: the switch already happened.
                    self.analyst.analyze(account_id).await;
                }
            }
            Ok(outcome) => {
                let message = outcome
                    .message
                    .unwrap_or_else(|| "Mode change rejected by the exchange".to_string());
                warn!(
                    "ModeCoordinator: mode change rejected for {}: {}",
                    account_id, message
                );
                self.notifier
                    .notify(Notification::destructive("Mode change failed", message))
                    .await;
            }
            Err(e) => {
                error!(
                    "ModeCoordinator: mode change failed for {}: {:#}",
                    account_id, e
                );
                self.notifier
                    .notify(Notification::destructive("Mode change failed", e.to_string()))
                    .await;
            }
        }
    }
}
