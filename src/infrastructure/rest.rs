use crate::domain::errors::GatewayError;
use crate::domain::ports::{AccountDirectory, ExchangeGateway};
use crate::domain::types::{AccountRecord, RealTradingAnalysis, ServiceOutcome, TradingMode};
use anyhow::{Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::debug;

/// Signed client for the brokerage backend REST API. Implements both the
/// account directory and the exchange gateway: the backend exposes the two
/// behind one authenticated surface.
pub struct RestBackendClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl RestBackendClient {
    pub fn new(base_url: String, api_key: String, api_secret: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_secret,
        }
    }

    /// Generate HMAC-SHA256 signature over the canonical query string.
    fn sign_request(&self, query_string: &str) -> String {
        type HmacSha256 = Hmac<Sha256>;

        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(query_string.as_bytes());
        let result = mac.finalize();
        hex::encode(result.into_bytes())
    }

    fn signed_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let timestamp = chrono::Utc::now().timestamp_millis();

        let mut all_params: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        all_params.push(("timestamp".to_string(), timestamp.to_string()));

        let query_string: String = all_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let signature = self.sign_request(&query_string);
        format!(
            "{}{}?{}&signature={}",
            self.base_url, path, query_string, signature
        )
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::BadStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response.json::<T>().await.map_err(|e| {
            GatewayError::MalformedResponse {
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.signed_url(path, params);
        debug!("RestBackend: GET {}", path);

        let response = self
            .client
            .get(&url)
            .header("X-TD-APIKEY", &self.api_key)
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;

        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.signed_url(path, params);
        debug!("RestBackend: POST {}", path);

        let response = self
            .client
            .post(&url)
            .header("X-TD-APIKEY", &self.api_key)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;

        Self::decode(response).await
    }
}

#[async_trait]
impl AccountDirectory for RestBackendClient {
    async fn fetch_accounts_for_user(&self, user_id: &str) -> Result<Vec<AccountRecord>> {
        self.get_json(
            "/v1/accounts",
            &[("user_id", user_id.to_string())],
        )
        .await
    }

    async fn set_account_active(&self, account_id: &str, active: bool) -> Result<()> {
        let path = format!("/v1/accounts/{}/active", account_id);
        let _: serde_json::Value = self
            .post_json(&path, &[("active", active.to_string())])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ExchangeGateway for RestBackendClient {
    async fn sync_account(&self, account_id: &str) -> Result<ServiceOutcome> {
        let path = format!("/v1/accounts/{}/sync", account_id);
        self.post_json(&path, &[]).await
    }

    async fn change_trading_mode(
        &self,
        account_id: &str,
        mode: TradingMode,
    ) -> Result<ServiceOutcome> {
        let path = format!("/v1/accounts/{}/mode", account_id);
        self.post_json(&path, &[("mode", mode.as_str().to_string())])
            .await
    }

    async fn analyze_real_trading_readiness(
        &self,
        account_id: &str,
    ) -> Result<RealTradingAnalysis> {
        let path = format!("/v1/accounts/{}/real-trading-analysis", account_id);
        self.get_json(&path, &[]).await
    }
}
