use crate::application::account_store::AccountStore;
use crate::application::analyst::RiskAnalyst;
use crate::application::busy::OpFlag;
use crate::domain::ports::{ExchangeGateway, Notifier};
use crate::domain::types::Notification;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Orchestrates one account's exchange refresh: sync, then store re-fetch,
/// then the mandatory real-trading analysis.
pub struct SyncCoordinator {
    gateway: Arc<dyn ExchangeGateway>,
    store: Arc<AccountStore>,
    analyst: Arc<RiskAnalyst>,
    notifier: Arc<dyn Notifier>,
    syncing: OpFlag,
}

impl SyncCoordinator {
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
            syncing: OpFlag::new(),
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.is_set()
    }

    /// Errors from the gateway never propagate past this method; every exit
    /// path surfaces its outcome as a notification instead.
    pub async fn sync_account(&self, account_id: &str) {
        let _busy = self.syncing.raise();
        info!("SyncCoordinator: syncing account {}...", account_id);

        match self.gateway.sync_account(account_id).await {
            Ok(outcome) if outcome.success => {
                self.notifier
                    .notify(Notification::info(
                        "Account synced",
                        "Balances and positions updated from the exchange",
                    ))
                    .await;
                self.store.fetch_accounts().await;
                // Sync always re-assesses real-money exposure, whatever the
                // account's current mode.
                self.analyst.analyze(account_id).await;
            }
            Ok(outcome) => {
                let message = outcome
                    .message
                    .unwrap_or_else(|| "Sync rejected by the exchange".to_string());
                warn!(
                    "SyncCoordinator: sync rejected for {}: {}",
                    account_id, message
                );
                self.notifier
                    .notify(Notification::destructive("Sync failed", message))
                    .await;
            }
            Err(e) => {
                error!("SyncCoordinator: sync failed for {}: {:#}", account_id, e);
                self.notifier
                    .notify(Notification::destructive("Sync failed", e.to_string()))
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{AccountDirectory, ExchangeGateway, SessionProvider};
    use crate::domain::types::{
        AccountRecord, NotificationKind, RealTradingAnalysis, ServiceOutcome, Session, TradingMode,
    };
    use crate::infrastructure::mock::RecordingNotifier;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum SyncBehavior {
        Ok,
        Rejected(&'static str),
        Error(&'static str),
    }

    struct ScriptedGateway {
        sync: SyncBehavior,
        affects_real_money: bool,
        sync_calls: AtomicUsize,
        analyze_calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(sync: SyncBehavior, affects_real_money: bool) -> Self {
            Self {
                sync,
                affects_real_money,
                sync_calls: AtomicUsize::new(0),
                analyze_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ExchangeGateway for ScriptedGateway {
        async fn sync_account(&self, _account_id: &str) -> Result<ServiceOutcome> {
            self.sync_calls.fetch_add(1, Ordering::SeqCst);
            match self.sync {
                SyncBehavior::Ok => Ok(ServiceOutcome::ok()),
                SyncBehavior::Rejected(msg) => Ok(ServiceOutcome::fail(msg)),
                SyncBehavior::Error(msg) => Err(anyhow::anyhow!("{}", msg)),
            }
        }

        async fn change_trading_mode(
            &self,
            _account_id: &str,
            _mode: TradingMode,
        ) -> Result<ServiceOutcome> {
            Ok(ServiceOutcome::ok())
        }

        async fn analyze_real_trading_readiness(
            &self,
            _account_id: &str,
        ) -> Result<RealTradingAnalysis> {
            self.analyze_calls.fetch_add(1, Ordering::SeqCst);
            Ok(RealTradingAnalysis {
                affects_real_money: self.affects_real_money,
                details: serde_json::Map::new(),
            })
        }
    }

    struct OneUserSession;

    #[async_trait]
    impl SessionProvider for OneUserSession {
        async fn current_session(&self) -> Result<Option<Session>> {
            Ok(Some(Session {
                user_id: "user-1".to_string(),
            }))
        }
    }

    struct CountingDirectory {
        fetch_calls: AtomicUsize,
    }

    #[async_trait]
    impl AccountDirectory for CountingDirectory {
        async fn fetch_accounts_for_user(&self, _user_id: &str) -> Result<Vec<AccountRecord>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![AccountRecord {
                id: "acc-1".to_string(),
                user_id: "user-1".to_string(),
                name: "Main".to_string(),
                is_active: true,
                risk_level: Some("low".to_string()),
                trading_mode: Some("real".to_string()),
                balance: None,
                created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                metadata: serde_json::Map::new(),
            }])
        }

        async fn set_account_active(&self, _account_id: &str, _active: bool) -> Result<()> {
            Ok(())
        }
    }

    fn build(
        sync: SyncBehavior,
        affects_real_money: bool,
    ) -> (
        SyncCoordinator,
        Arc<ScriptedGateway>,
        Arc<CountingDirectory>,
        Arc<RecordingNotifier>,
        Arc<RiskAnalyst>,
    ) {
        let gateway = Arc::new(ScriptedGateway::new(sync, affects_real_money));
        let directory = Arc::new(CountingDirectory {
            fetch_calls: AtomicUsize::new(0),
        });
        let notifier = Arc::new(RecordingNotifier::new());
        let store = Arc::new(AccountStore::new(
            directory.clone(),
            Arc::new(OneUserSession),
            notifier.clone(),
        ));
        let analyst = Arc::new(RiskAnalyst::new(gateway.clone(), notifier.clone()));
        let coordinator = SyncCoordinator::new(
            gateway.clone(),
            store,
            analyst.clone(),
            notifier.clone(),
        );
        (coordinator, gateway, directory, notifier, analyst)
    }

    #[tokio::test]
    async fn successful_sync_refreshes_then_analyzes_once() {
        let (coordinator, gateway, directory, notifier, analyst) =
            build(SyncBehavior::Ok, false);

        assert!(!coordinator.is_syncing());
        coordinator.sync_account("acc-1").await;

        assert_eq!(gateway.sync_calls.load(Ordering::SeqCst), 1);
        assert_eq!(directory.fetch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.analyze_calls.load(Ordering::SeqCst), 1);
        assert!(analyst.last_analysis().await.is_some());

        let sent = notifier.all();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::Info);
        assert!(!coordinator.is_syncing());
    }

    #[tokio::test]
    async fn sync_analyzes_even_when_account_affects_real_money() {
        let (coordinator, _, _, notifier, _) = build(SyncBehavior::Ok, true);

        coordinator.sync_account("acc-1").await;

        assert_eq!(notifier.real_trading_warnings(), 1);
    }

    #[tokio::test]
    async fn rejected_sync_skips_refresh_and_analysis() {
        let (coordinator, gateway, directory, notifier, _) =
            build(SyncBehavior::Rejected("exchange busy"), true);

        coordinator.sync_account("acc-1").await;

        assert_eq!(directory.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.analyze_calls.load(Ordering::SeqCst), 0);

        let sent = notifier.all();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::Destructive);
        assert!(sent[0].description.contains("exchange busy"));
        assert!(!coordinator.is_syncing());
    }

    #[tokio::test]
    async fn thrown_sync_error_is_caught_and_surfaced() {
        let (coordinator, gateway, directory, notifier, _) =
            build(SyncBehavior::Error("connection reset"), true);

        coordinator.sync_account("acc-1").await;

        assert_eq!(directory.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.analyze_calls.load(Ordering::SeqCst), 0);

        let sent = notifier.all();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::Destructive);
        assert!(sent[0].description.contains("connection reset"));
        assert!(!coordinator.is_syncing());
    }
}
