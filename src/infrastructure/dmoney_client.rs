use crate::config::ScenarioConfig;
use crate::domain::actor::{Actor, Role};
use crate::domain::identity::IdentityGenerator;
use crate::domain::money::{Amount, Balance};
use crate::domain::ports::{AccountStore, AccountStoreRef, PlatformApi};
use crate::domain::transaction::{TransactionKind, TransactionReceipt};
use crate::error::{PlatformError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Static partner secret the platform expects on every authenticated call.
pub const AUTH_SECRET_HEADER: &str = "X-AUTH-SECRET-KEY";
pub const AUTH_SECRET_KEY: &str = "ROADTOSDET";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    phone_number: &'a str,
    nid: &'a str,
    role: Role,
}

#[derive(Deserialize)]
struct CreateUserResponse {
    user: Option<Value>,
}

/// Platform id of a created user, given as a number or a numeric string.
fn created_id(user: &Value) -> Option<u64> {
    match &user["id"] {
        Value::Number(id) => id.as_u64(),
        Value::String(id) => id.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Serialize)]
struct TransferRequest<'a> {
    from_account: &'a str,
    to_account: &'a str,
    #[serde(serialize_with = "serialize_amount")]
    amount: Decimal,
}

#[derive(Deserialize)]
struct BalanceResponse {
    balance: Option<Balance>,
}

/// Whole amounts go out as JSON integers, fractional ones as floats.
fn serialize_amount<S>(amount: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if amount.fract().is_zero()
        && let Some(whole) = amount.to_i64()
    {
        return serializer.serialize_i64(whole);
    }
    match amount.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_str(&amount.to_string()),
    }
}

/// Status and decoded body of a platform response.
///
/// Bodies that are not JSON are kept verbatim as a JSON string so failures can
/// still surface them.
struct PlatformResponse {
    status: StatusCode,
    body: Value,
}

impl PlatformResponse {
    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(Self { status, body })
    }

    fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    fn extract<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.body.clone()).ok()
    }

    fn body_text(&self) -> String {
        match &self.body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Typed HTTP client for the Dmoney platform.
///
/// Holds the session token for the duration of a run and records every actor
/// it creates in the injected account store.
pub struct DmoneyClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    store: AccountStoreRef,
    identities: IdentityGenerator,
}

impl DmoneyClient {
    /// Creates a client rooted at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, store: AccountStoreRef) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token: None,
            store,
            identities: IdentityGenerator::new(),
        })
    }

    pub fn from_config(config: &ScenarioConfig, store: AccountStoreRef) -> Result<Self> {
        Ok(Self::new(config.base_url.clone(), store)?
            .with_identities(IdentityGenerator::from_seed(config.seed)))
    }

    pub fn with_identities(mut self, identities: IdentityGenerator) -> Self {
        self.identities = identities;
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(self.token.as_deref().unwrap_or_default())
            .header(AUTH_SECRET_HEADER, AUTH_SECRET_KEY)
    }
}

#[async_trait]
impl PlatformApi for DmoneyClient {
    async fn login(&mut self, email: &str, password: &str) -> Result<String> {
        let response = self
            .http
            .post(self.url("/user/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let response = PlatformResponse::read(response).await?;

        let token = response
            .extract::<LoginResponse>()
            .and_then(|r| r.token)
            .filter(|t| !t.is_empty() && response.is_ok());
        match token {
            Some(token) => {
                self.token = Some(token.clone());
                eprintln!("Successfully logged in as: {email}");
                Ok(token)
            }
            None => Err(PlatformError::AuthenticationFailure {
                status: response.status.as_u16(),
                body: response.body_text(),
            }),
        }
    }

    fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    async fn create_actor(&mut self, role: Role) -> Result<Actor> {
        let mut actor = self.identities.actor(role);
        let request = CreateUserRequest {
            name: &actor.name,
            email: &actor.email,
            password: &actor.password,
            phone_number: &actor.phone,
            nid: &actor.nid,
            role,
        };
        let response = self
            .authorized(self.http.post(self.url("/user/create")))
            .json(&request)
            .send()
            .await?;
        let response = PlatformResponse::read(response).await?;

        let created = response
            .extract::<CreateUserResponse>()
            .and_then(|r| r.user)
            .filter(|_| response.is_ok());
        let Some(created) = created else {
            eprintln!(
                "Create {role} failed [{}]: {}",
                response.status.as_u16(),
                response.body_text()
            );
            return Err(PlatformError::ActorCreationFailure {
                role,
                status: response.status.as_u16(),
                body: response.body_text(),
            });
        };

        actor.id = created_id(&created);
        self.store.append(actor.clone()).await?;
        eprintln!("Created {role}: {} | Phone: {}", actor.name, actor.phone);
        Ok(actor)
    }

    async fn transact(
        &self,
        kind: TransactionKind,
        from: &str,
        to: &str,
        amount: Amount,
    ) -> Result<TransactionReceipt> {
        let request = TransferRequest {
            from_account: from,
            to_account: to,
            amount: amount.value(),
        };
        let response = self
            .authorized(self.http.post(self.url(kind.path())))
            .json(&request)
            .send()
            .await?;
        let response = PlatformResponse::read(response).await?;

        if !response.is_ok() {
            eprintln!(
                "{kind} failed [{}]: {}",
                response.status.as_u16(),
                response.body_text()
            );
            return Err(PlatformError::TransactionFailure {
                kind,
                status: response.status.as_u16(),
                body: response.body_text(),
            });
        }

        eprintln!("{kind}: {from} -> {to} | Amount: {amount} TK");
        Ok(TransactionReceipt {
            kind,
            payload: response.body,
        })
    }

    async fn check_balance(&self, phone: &str) -> Result<Balance> {
        let path = format!("/transaction/balance/{phone}");
        let response = self
            .authorized(self.http.get(self.url(&path)))
            .send()
            .await?;
        let response = PlatformResponse::read(response).await?;

        let balance = response
            .extract::<BalanceResponse>()
            .and_then(|r| r.balance)
            .filter(|_| response.is_ok());
        match balance {
            Some(balance) => {
                eprintln!("Balance for {phone}: {balance} TK");
                Ok(balance)
            }
            None => Err(PlatformError::BalanceCheckFailure {
                phone: phone.to_string(),
                status: response.status.as_u16(),
                body: response.body_text(),
            }),
        }
    }
}
