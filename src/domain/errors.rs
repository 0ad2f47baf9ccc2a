use thiserror::Error;

/// Errors related to account directory access
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: String },
}

/// Errors related to the exchange backend
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Backend returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Malformed backend response: {reason}")]
    MalformedResponse { reason: String },
}
