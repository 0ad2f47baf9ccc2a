use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Extended display window for real-money warnings. Regular notifications
/// use the renderer's default when `duration` is `None`.
pub const REAL_TRADING_WARNING_DURATION: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lenient normalization for raw directory records. Unknown or missing
    /// values land on `Medium` rather than dropping the account.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_lowercase()).as_deref() {
            Some("low") => RiskLevel::Low,
            Some("high") => RiskLevel::High,
            _ => RiskLevel::Medium,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Real,
    Demo,
}

impl TradingMode {
    /// Missing mode on a raw record normalizes to `Real`. The directory
    /// schema predates the mode column; treating an unset account as
    /// real-money keeps every downstream warning path armed.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_lowercase()).as_deref() {
            Some("demo") | Some("simulated") => TradingMode::Demo,
            _ => TradingMode::Real,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradingMode::Real => "real",
            TradingMode::Demo => "demo",
        }
    }

    /// Human-readable label for notifications.
    pub fn label(&self) -> &'static str {
        match self {
            TradingMode::Real => "Real trading",
            TradingMode::Demo => "Demo trading",
        }
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw account row as returned by the account directory, before
/// normalization. Unknown backing-store columns are carried in `metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub trading_mode: Option<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    #[serde(default, flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// One user-owned brokerage account, normalized for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingAccount {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub is_active: bool,
    pub risk_level: RiskLevel,
    pub trading_mode: TradingMode,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl TradingAccount {
    pub fn from_record(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            is_active: record.is_active,
            risk_level: RiskLevel::from_raw(record.risk_level.as_deref()),
            trading_mode: TradingMode::from_raw(record.trading_mode.as_deref()),
            balance: record.balance.unwrap_or(Decimal::ZERO),
            created_at: record.created_at,
            metadata: record.metadata,
        }
    }
}

/// Derived judgment of whether an account is currently configured to place
/// real-money trades. Produced fresh on every sync or switch into real mode,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealTradingAnalysis {
    pub affects_real_money: bool,
    #[serde(default, flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Business-result envelope returned by the exchange gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Destructive,
}

/// A single user-facing toast. Fire-and-forget: the core emits these and
/// never reads anything back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            title: title.into(),
            description: description.into(),
            duration: None,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Destructive,
            title: title.into(),
            description: description.into(),
            duration: None,
        }
    }

    /// High-salience real-money warning with the extended display window.
    pub fn real_trading_warning(description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Destructive,
            title: "Real trading warning".to_string(),
            description: description.into(),
            duration: Some(REAL_TRADING_WARNING_DURATION),
        }
    }

    pub fn is_real_trading_warning(&self) -> bool {
        self.kind == NotificationKind::Destructive && self.title == "Real trading warning"
    }
}
