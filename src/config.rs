use crate::error::{PlatformError, Result};
use crate::infrastructure::json_file::DEFAULT_ACCOUNTS_FILE;
use clap::Args;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dmoney.roadtocareer.net";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@roadtocareer.net";
pub const DEFAULT_ADMIN_PASSWORD: &str = "1234";
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 60;

/// How the scenario obtains its session token.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A pre-authenticated bearer token.
    Token(String),
    /// Admin credentials exchanged for a token via `/user/login`.
    Login { email: String, password: String },
}

impl Credentials {
    /// Prefers a non-empty token and falls back to the login credentials.
    pub fn resolve(token: Option<String>, email: String, password: String) -> Self {
        match token.filter(|t| !t.trim().is_empty()) {
            Some(token) => Credentials::Token(token),
            None => Credentials::Login { email, password },
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Credentials::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Everything a scenario run needs to know about its environment.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Platform endpoint root, without a trailing slash.
    pub base_url: String,
    pub credentials: Credentials,
    pub accounts_file: PathBuf,
    /// Deadline for the whole scenario.
    pub run_timeout: Duration,
    /// Seed for identity generation; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl ScenarioConfig {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            credentials,
            accounts_file: PathBuf::from(DEFAULT_ACCOUNTS_FILE),
            run_timeout: Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS),
            seed: None,
        })
    }

    pub fn with_accounts_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.accounts_file = path.into();
        self
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| PlatformError::ConfigError(format!("Invalid base URL '{raw}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PlatformError::ConfigError(format!(
            "Base URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

/// Environment-backed settings; each variable can be overridden by its flag.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Platform endpoint root
    #[arg(long, global = true, env = "BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Pre-authenticated admin bearer token. Skips login when set.
    #[arg(long, global = true, env = "ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Admin email used when no token is configured
    #[arg(long, global = true, env = "ADMIN_EMAIL", default_value = DEFAULT_ADMIN_EMAIL)]
    pub admin_email: String,

    /// Admin password used when no token is configured
    #[arg(long, global = true, env = "ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD, hide_env_values = true)]
    pub admin_password: String,

    /// JSON file collecting the actors created by a run
    #[arg(long, global = true, env = "ACCOUNTS_FILE", default_value = DEFAULT_ACCOUNTS_FILE)]
    pub accounts_file: PathBuf,

    /// Deadline for the whole scenario, in seconds
    #[arg(long, global = true, env = "RUN_TIMEOUT_SECS", default_value_t = DEFAULT_RUN_TIMEOUT_SECS)]
    pub run_timeout_secs: u64,

    /// Seed for reproducible actor identities
    #[arg(long, global = true, env = "SCENARIO_SEED")]
    pub seed: Option<u64>,
}

impl ConfigArgs {
    pub fn into_config(self) -> Result<ScenarioConfig> {
        if self.run_timeout_secs == 0 {
            return Err(PlatformError::ConfigError(
                "Run timeout must be at least one second".to_string(),
            ));
        }
        let credentials =
            Credentials::resolve(self.admin_token, self.admin_email, self.admin_password);
        Ok(ScenarioConfig::new(&self.base_url, credentials)?
            .with_accounts_file(self.accounts_file)
            .with_run_timeout(Duration::from_secs(self.run_timeout_secs))
            .with_seed(self.seed))
    }
}
