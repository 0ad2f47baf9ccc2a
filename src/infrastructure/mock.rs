use crate::domain::errors::AccountError;
use crate::domain::ports::{AccountDirectory, ExchangeGateway, Notifier};
use crate::domain::types::{
    AccountRecord, Notification, RealTradingAnalysis, ServiceOutcome, TradingMode,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Shared in-memory backend state. The mock directory and mock gateway both
/// point at the same records, so a mode change is visible on the next fetch
/// exactly like it would be against the real backend.
pub struct MockBrokerageState {
    records: RwLock<Vec<AccountRecord>>,
    exchange_balances: RwLock<HashMap<String, Decimal>>,
}

impl MockBrokerageState {
    pub fn new(records: Vec<AccountRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            exchange_balances: RwLock::new(HashMap::new()),
        }
    }

    /// Demo dataset for running without credentials: three accounts of mixed
    /// mode and risk, plus pending exchange balances a sync will pull in.
    pub async fn seeded(user_id: &str) -> Self {
        let now = Utc::now();
        let mk = |name: &str, days_old: i64, mode: Option<&str>, risk: &str, active: bool| {
            AccountRecord {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                name: name.to_string(),
                is_active: active,
                risk_level: Some(risk.to_string()),
                trading_mode: mode.map(str::to_string),
                balance: Some(Decimal::new(10_000, 2)),
                created_at: now - Duration::days(days_old),
                metadata: serde_json::Map::new(),
            }
        };

        let records = vec![
            mk("Swing trading", 90, Some("demo"), "low", true),
            mk("Scalping", 30, Some("real"), "high", true),
            // Legacy row from before the mode column existed.
            mk("Long term", 365, None, "medium", false),
        ];

        let state = Self::new(records);
        {
            let records = state.records.read().await;
            let mut balances = state.exchange_balances.write().await;
            for record in records.iter() {
                balances.insert(record.id.clone(), Decimal::new(12_345, 2));
            }
        }
        state
    }

    pub async fn records(&self) -> Vec<AccountRecord> {
        self.records.read().await.clone()
    }

    pub async fn set_exchange_balance(&self, account_id: &str, balance: Decimal) {
        self.exchange_balances
            .write()
            .await
            .insert(account_id.to_string(), balance);
    }
}

pub struct MockAccountDirectory {
    state: Arc<MockBrokerageState>,
}

impl MockAccountDirectory {
    pub fn new(state: Arc<MockBrokerageState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl AccountDirectory for MockAccountDirectory {
    async fn fetch_accounts_for_user(&self, user_id: &str) -> Result<Vec<AccountRecord>> {
        let records = self.state.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn set_account_active(&self, account_id: &str, active: bool) -> Result<()> {
        let mut records = self.state.records.write().await;
        match records.iter_mut().find(|r| r.id == account_id) {
            Some(record) => {
                record.is_active = active;
                info!("MockDirectory: account {} -> active={}", account_id, active);
                Ok(())
            }
            None => Err(AccountError::AccountNotFound {
                account_id: account_id.to_string(),
            }
            .into()),
        }
    }
}

pub struct MockExchangeGateway {
    state: Arc<MockBrokerageState>,
}

impl MockExchangeGateway {
    pub fn new(state: Arc<MockBrokerageState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl ExchangeGateway for MockExchangeGateway {
    async fn sync_account(&self, account_id: &str) -> Result<ServiceOutcome> {
        let balances = self.state.exchange_balances.read().await;
        let Some(balance) = balances.get(account_id).copied() else {
            return Ok(ServiceOutcome::fail(format!(
                "Exchange has no data for account {}",
                account_id
            )));
        };
        drop(balances);

        let mut records = self.state.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.id == account_id) {
            record.balance = Some(balance);
        }
        info!("MockGateway: synced account {} (balance {})", account_id, balance);
        Ok(ServiceOutcome::ok())
    }

    async fn change_trading_mode(
        &self,
        account_id: &str,
        mode: TradingMode,
    ) -> Result<ServiceOutcome> {
        let mut records = self.state.records.write().await;
        match records.iter_mut().find(|r| r.id == account_id) {
            Some(record) => {
                record.trading_mode = Some(mode.as_str().to_string());
                info!("MockGateway: account {} -> {} mode", account_id, mode);
                Ok(ServiceOutcome::ok())
            }
            None => Ok(ServiceOutcome::fail(format!(
                "Unknown account {}",
                account_id
            ))),
        }
    }

    async fn analyze_real_trading_readiness(
        &self,
        account_id: &str,
    ) -> Result<RealTradingAnalysis> {
        let records = self.state.records.read().await;
        let record = records
            .iter()
            .find(|r| r.id == account_id)
            .ok_or_else(|| AccountError::AccountNotFound {
                account_id: account_id.to_string(),
            })?;

        let mode = TradingMode::from_raw(record.trading_mode.as_deref());
        let mut details = serde_json::Map::new();
        details.insert("mode".to_string(), serde_json::json!(mode.as_str()));
        details.insert("active".to_string(), serde_json::json!(record.is_active));

        Ok(RealTradingAnalysis {
            affects_real_money: record.is_active && mode == TradingMode::Real,
            details,
        })
    }
}

/// Captures every emitted notification for assertions. The injected-notifier
/// seam exists precisely so tests can swap this in for the real hub.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn real_trading_warnings(&self) -> usize {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.is_real_trading_warning())
            .count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
