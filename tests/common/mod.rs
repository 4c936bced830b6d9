#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

pub const ADMIN_EMAIL: &str = "admin@roadtocareer.net";
pub const ADMIN_PASSWORD: &str = "1234";
pub const ADMIN_TOKEN: &str = "stub-admin-token";
pub const SECRET_KEY: &str = "ROADTOSDET";
/// Flat fee the stub charges the payer of a merchant payment.
pub const PAYMENT_FEE: i64 = 5;

/// Knobs for making the stub misbehave.
#[derive(Clone, Default)]
pub struct StubBehavior {
    pub reject_create: bool,
    pub omit_token: bool,
    pub empty_token: bool,
    pub omit_balance: bool,
    /// Replaces the numeric id in create responses.
    pub user_id: Option<Value>,
    /// Holds every balance response back this long.
    pub balance_delay: Option<Duration>,
}

/// A request as the stub saw it.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub secret: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct Ledger {
    next_id: u64,
    balances: HashMap<String, i64>,
}

#[derive(Clone)]
struct StubState {
    behavior: StubBehavior,
    ledger: Arc<Mutex<Ledger>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the Dmoney platform, served on an ephemeral port.
pub struct PlatformStub {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    ledger: Arc<Mutex<Ledger>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl PlatformStub {
    pub fn spawn() -> Self {
        Self::spawn_with(StubBehavior::default())
    }

    pub fn spawn_with(behavior: StubBehavior) -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = StubState {
            behavior,
            ledger: Arc::new(Mutex::new(Ledger::default())),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let ledger = Arc::clone(&state.ledger);
        let requests = Arc::clone(&state.requests);

        let app = Router::new()
            .route("/user/login", post(login))
            .route("/user/create", post(create_user))
            .route("/transaction/deposit", post(deposit))
            .route("/transaction/withdraw", post(withdraw))
            .route("/transaction/sendMoney", post(send_money))
            .route("/transaction/payment", post(payment))
            .route("/transaction/balance/:phone", get(balance))
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let join = thread::spawn(move || {
            let runtime = Builder::new_current_thread().enable_all().build().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                let _ = server.await;
            });
        });

        Self {
            base_url,
            shutdown: Some(shutdown_tx),
            join: Some(join),
            ledger,
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn balance_of(&self, phone: &str) -> Option<i64> {
        self.ledger.lock().unwrap().balances.get(phone).copied()
    }

    pub fn fund(&self, phone: &str, amount: i64) {
        *self
            .ledger
            .lock()
            .unwrap()
            .balances
            .entry(phone.to_string())
            .or_default() += amount;
    }
}

impl Drop for PlatformStub {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn record(state: &StubState, path: &str, headers: &HeaderMap, body: &Bytes) -> Value {
    let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest {
        path: path.to_string(),
        authorization: header(headers, "authorization"),
        secret: header(headers, "x-auth-secret-key"),
        body: body.clone(),
    });
    body
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, axum::Json(body)).into_response()
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let bearer = header(headers, "authorization");
    let secret = header(headers, "x-auth-secret-key");
    let expected = format!("Bearer {ADMIN_TOKEN}");
    if bearer.as_deref() != Some(expected.as_str()) {
        return Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({"message": "Token expired!"}),
        ));
    }
    if secret.as_deref() != Some(SECRET_KEY) {
        return Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({"message": "Secret key required"}),
        ));
    }
    Ok(())
}

async fn login(State(state): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    let body = record(&state, "/user/login", &headers, &body);
    if body["email"] != ADMIN_EMAIL || body["password"] != ADMIN_PASSWORD {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({"message": "Password incorrect"}),
        );
    }
    if state.behavior.omit_token {
        return reply(StatusCode::OK, json!({"message": "Login successful"}));
    }
    if state.behavior.empty_token {
        return reply(
            StatusCode::OK,
            json!({"message": "Login successful", "token": ""}),
        );
    }
    reply(
        StatusCode::OK,
        json!({"message": "Login successful", "token": ADMIN_TOKEN, "role": "Admin"}),
    )
}

async fn create_user(State(state): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    let body = record(&state, "/user/create", &headers, &body);
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    if state.behavior.reject_create {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "User already exists"}),
        );
    }
    let Some(phone) = body["phone_number"].as_str() else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "phone_number is required"}),
        );
    };

    let mut ledger = state.ledger.lock().unwrap();
    ledger.next_id += 1;
    let id = state.behavior.user_id.clone().unwrap_or(json!(ledger.next_id));
    ledger.balances.insert(phone.to_string(), 0);
    reply(
        StatusCode::CREATED,
        json!({
            "message": "User created",
            "user": {
                "id": id,
                "name": body["name"],
                "email": body["email"],
                "phone_number": phone,
                "nid": body["nid"],
                "role": body["role"],
            }
        }),
    )
}

async fn deposit(state: State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    transfer(state, headers, body, "/transaction/deposit", 0, "Deposit successful").await
}

async fn withdraw(state: State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    transfer(state, headers, body, "/transaction/withdraw", 0, "Withdraw successful").await
}

async fn send_money(state: State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    transfer(state, headers, body, "/transaction/sendMoney", 0, "Send money successful").await
}

async fn payment(state: State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    transfer(
        state,
        headers,
        body,
        "/transaction/payment",
        PAYMENT_FEE,
        "Payment successful",
    )
    .await
}

async fn transfer(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: Bytes,
    path: &str,
    fee: i64,
    confirmation: &str,
) -> Response {
    let body = record(&state, path, &headers, &body);
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let (Some(from), Some(to), Some(amount)) = (
        body["from_account"].as_str(),
        body["to_account"].as_str(),
        body["amount"].as_i64(),
    ) else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "from_account, to_account and amount are required"}),
        );
    };

    let mut ledger = state.ledger.lock().unwrap();
    if !ledger.balances.contains_key(to) {
        return reply(
            StatusCode::NOT_FOUND,
            json!({"message": "Account does not exist"}),
        );
    }
    if from != "SYSTEM" {
        let Some(available) = ledger.balances.get(from).copied() else {
            return reply(
                StatusCode::NOT_FOUND,
                json!({"message": "Account does not exist"}),
            );
        };
        if available < amount + fee {
            return reply(
                StatusCode::BAD_REQUEST,
                json!({"message": "Insufficient balance", "currentBalance": available}),
            );
        }
        ledger.balances.insert(from.to_string(), available - amount - fee);
    }
    *ledger.balances.entry(to.to_string()).or_default() += amount;

    reply(
        StatusCode::CREATED,
        json!({"message": confirmation, "trnxId": format!("TXN{}", ledger.balances.len()), "fee": fee}),
    )
}

async fn balance(
    State(state): State<StubState>,
    Path(phone): Path<String>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/transaction/balance/{phone}");
    record(&state, &path, &headers, &Bytes::new());
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    if let Some(delay) = state.behavior.balance_delay {
        tokio::time::sleep(delay).await;
    }
    let Some(balance) = state.ledger.lock().unwrap().balances.get(&phone).copied() else {
        return reply(StatusCode::NOT_FOUND, json!({"message": "User not found"}));
    };
    if state.behavior.omit_balance {
        return reply(StatusCode::OK, json!({"message": "User balance"}));
    }
    reply(
        StatusCode::OK,
        json!({"message": "User balance", "balance": balance}),
    )
}
