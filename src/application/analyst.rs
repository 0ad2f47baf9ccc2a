use crate::application::busy::OpFlag;
use crate::domain::ports::{ExchangeGateway, Notifier};
use crate::domain::types::{Notification, RealTradingAnalysis};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn};

pub const REAL_TRADING_WARNING_TEXT: &str =
    "This account is configured for real trading. Orders will affect real funds.";

/// Shared real-trading analysis sub-step, run after every successful sync and
/// after every switch into real mode.
///
/// Best-effort by contract: the primary operation already succeeded when this
/// runs, so an analysis failure is logged and swallowed, never surfaced as a
/// user-facing error and never allowed to abort the caller's flow.
pub struct RiskAnalyst {
    gateway: Arc<dyn ExchangeGateway>,
    notifier: Arc<dyn Notifier>,
    analyzing: OpFlag,
    last_analysis: RwLock<Option<RealTradingAnalysis>>,
}

impl RiskAnalyst {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            analyzing: OpFlag::new(),
            last_analysis: RwLock::new(None),
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.is_set()
    }

    /// Most recent analysis for the most recently analyzed account.
    /// Overwritten on each run, never accumulated.
    pub async fn last_analysis(&self) -> Option<RealTradingAnalysis> {
        self.last_analysis.read().await.clone()
    }

    pub async fn analyze(&self, account_id: &str) -> Option<RealTradingAnalysis> {
        let _busy = self.analyzing.raise();

        match self.gateway.analyze_real_trading_readiness(account_id).await {
            Ok(analysis) => {
                if analysis.affects_real_money {
                    warn!("RiskAnalyst: account {} affects real money", account_id);
                    self.notifier
                        .notify(Notification::real_trading_warning(REAL_TRADING_WARNING_TEXT))
                        .await;
                }
                *self.last_analysis.write().await = Some(analysis.clone());
                Some(analysis)
            }
            Err(e) => {
                error!(
                    "RiskAnalyst: analysis failed for {}: {:#}. Continuing without it.",
                    account_id, e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ServiceOutcome, TradingMode};
    use crate::infrastructure::mock::RecordingNotifier;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubGateway {
        affects_real_money: bool,
        fail: AtomicBool,
    }

    #[async_trait]
    impl ExchangeGateway for StubGateway {
        async fn sync_account(&self, _account_id: &str) -> Result<ServiceOutcome> {
            Ok(ServiceOutcome::ok())
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
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("analysis backend down");
            }
            Ok(RealTradingAnalysis {
                affects_real_money: self.affects_real_money,
                details: serde_json::Map::new(),
            })
        }
    }

    #[tokio::test]
    async fn real_money_analysis_emits_extended_warning() {
        let notifier = Arc::new(RecordingNotifier::new());
        let analyst = RiskAnalyst::new(
            Arc::new(StubGateway {
                affects_real_money: true,
                fail: AtomicBool::new(false),
            }),
            notifier.clone(),
        );

        let analysis = analyst.analyze("acc-1").await;

        assert!(analysis.unwrap().affects_real_money);
        let sent = notifier.all();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].is_real_trading_warning());
        assert!(sent[0].duration.is_some());
        assert!(!analyst.is_analyzing());
    }

    #[tokio::test]
    async fn demo_analysis_stays_silent() {
        let notifier = Arc::new(RecordingNotifier::new());
        let analyst = RiskAnalyst::new(
            Arc::new(StubGateway {
                affects_real_money: false,
                fail: AtomicBool::new(false),
            }),
            notifier.clone(),
        );

        analyst.analyze("acc-1").await;

        assert!(notifier.all().is_empty());
        assert!(analyst.last_analysis().await.is_some());
    }

    #[tokio::test]
    async fn analysis_failure_is_swallowed() {
        let notifier = Arc::new(RecordingNotifier::new());
        let analyst = RiskAnalyst::new(
            Arc::new(StubGateway {
                affects_real_money: true,
                fail: AtomicBool::new(true),
            }),
            notifier.clone(),
        );

        let analysis = analyst.analyze("acc-1").await;

        assert!(analysis.is_none());
        assert!(notifier.all().is_empty());
        assert!(analyst.last_analysis().await.is_none());
        assert!(!analyst.is_analyzing());
    }
}
