use crate::domain::actor::Role;
use crate::domain::money::Balance;
use crate::domain::transaction::TransactionKind;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Login failed [{status}]: {body}")]
    AuthenticationFailure { status: u16, body: String },
    #[error("Failed to create {role} [{status}]: {body}")]
    ActorCreationFailure {
        role: Role,
        status: u16,
        body: String,
    },
    #[error("{kind} failed [{status}]: {body}")]
    TransactionFailure {
        kind: TransactionKind,
        status: u16,
        body: String,
    },
    #[error("Failed to check balance of {phone} [{status}]: {body}")]
    BalanceCheckFailure {
        phone: String,
        status: u16,
        body: String,
    },
    #[error("Balance mismatch for {phone}: expected {expected}, got {actual}")]
    BalanceMismatch {
        phone: String,
        expected: Balance,
        actual: Balance,
    },
    #[error("Created {0} has no platform id")]
    MissingActorId(Role),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Scenario did not finish within {0:?}")]
    Timeout(Duration),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
