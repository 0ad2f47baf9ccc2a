use crate::domain::types::{
    AccountRecord, Notification, RealTradingAnalysis, ServiceOutcome, Session, TradingMode,
};
use anyhow::Result;
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// All accounts owned by the given user, in whatever order the backing
    /// store returns them. Callers own the listing order.
    async fn fetch_accounts_for_user(&self, user_id: &str) -> Result<Vec<AccountRecord>>;

    async fn set_account_active(&self, account_id: &str, active: bool) -> Result<()>;
}

#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Pull current balances/positions for the account from the exchange.
    async fn sync_account(&self, account_id: &str) -> Result<ServiceOutcome>;

    async fn change_trading_mode(
        &self,
        account_id: &str,
        mode: TradingMode,
    ) -> Result<ServiceOutcome>;

    /// May fail independently of sync/mode-change; callers treat failure as
    /// non-fatal.
    async fn analyze_real_trading_readiness(&self, account_id: &str)
    -> Result<RealTradingAnalysis>;
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `None` when no user is authenticated.
    async fn current_session(&self) -> Result<Option<Session>>;
}

/// Injected notification capability. Fire-and-forget: implementations must
/// never block the caller on rendering.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}
