use crate::application::busy::OpFlag;
use crate::domain::ports::{AccountDirectory, Notifier, SessionProvider};
use crate::domain::types::{Notification, TradingAccount};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Owner of the session-scoped account list. Coordinators never mutate the
/// list directly; they ask the store to re-fetch and read the result.
pub struct AccountStore {
    directory: Arc<dyn AccountDirectory>,
    sessions: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
    accounts: RwLock<Vec<TradingAccount>>,
    selected: RwLock<Option<String>>,
    loading: OpFlag,
}

impl AccountStore {
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        sessions: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            directory,
            sessions,
            notifier,
            accounts: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            loading: OpFlag::new(),
        }
    }

    /// Current snapshot of the list. Each `fetch_accounts` resolution fully
    /// replaces it; callers must treat the snapshot as authoritative, not as
    /// a delta.
    pub async fn accounts(&self) -> Vec<TradingAccount> {
        self.accounts.read().await.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub async fn select_account(&self, account_id: impl Into<String>) {
        *self.selected.write().await = Some(account_id.into());
    }

    pub async fn selected_account(&self) -> Option<TradingAccount> {
        let selected = self.selected.read().await;
        let id = selected.as_deref()?;
        self.accounts.read().await.iter().find(|a| a.id == id).cloned()
    }

    /// Reload every account owned by the authenticated user, newest first.
    ///
    /// Session absence is a guarded precondition, not an error: it produces
    /// an "invalid session" notification and leaves the list untouched.
    pub async fn fetch_accounts(&self) {
        let _busy = self.loading.raise();

        let session = match self.sessions.current_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!("AccountStore: fetch requested without an authenticated session");
                self.notifier
                    .notify(Notification::destructive(
                        "Invalid session",
                        "Sign in again to load your trading accounts",
                    ))
                    .await;
                return;
            }
            Err(e) => {
                error!("AccountStore: session lookup failed: {:#}", e);
                self.notifier
                    .notify(Notification::destructive("Invalid session", e.to_string()))
                    .await;
                return;
            }
        };

        match self
            .directory
            .fetch_accounts_for_user(&session.user_id)
            .await
        {
            Ok(records) => {
                let mut list: Vec<TradingAccount> =
                    records.into_iter().map(TradingAccount::from_record).collect();
                // Newest first; id as secondary key keeps equal timestamps stable.
                list.sort_by(|a, b| {
                    b.created_at
                        .cmp(&a.created_at)
                        .then_with(|| b.id.cmp(&a.id))
                });

                info!(
                    "AccountStore: loaded {} accounts for user {}",
                    list.len(),
                    session.user_id
                );

                let mut selected = self.selected.write().await;
                if let Some(id) = selected.as_deref()
                    && !list.iter().any(|a| a.id == id)
                {
                    *selected = None;
                }
                drop(selected);

                *self.accounts.write().await = list;
            }
            Err(e) => {
                error!("AccountStore: account query failed: {:#}", e);
                self.notifier
                    .notify(Notification::destructive(
                        "Failed to load accounts",
                        e.to_string(),
                    ))
                    .await;
            }
        }
    }

    /// Flip the active flag for one account, then re-derive the whole list
    /// from the directory. No optimistic local patch: on failure the list is
    /// exactly what it was.
    pub async fn toggle_account_status(&self, account_id: &str, current_status: bool) {
        let target = !current_status;

        match self.directory.set_account_active(account_id, target).await {
            Ok(()) => {
                let description = if target {
                    "Account activated"
                } else {
                    "Account deactivated"
                };
                info!("AccountStore: account {} -> active={}", account_id, target);
                self.notifier
                    .notify(Notification::info("Account updated", description))
                    .await;
                self.fetch_accounts().await;
            }
            Err(e) => {
                error!(
                    "AccountStore: status toggle failed for {}: {:#}",
                    account_id, e
                );
                self.notifier
                    .notify(Notification::destructive(
                        "Failed to update account",
                        e.to_string(),
                    ))
                    .await;
            }
        }
    }
}
