use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Money movements exposed by the platform's `/transaction` endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    SendMoney,
    Payment,
}

impl TransactionKind {
    pub fn path(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "/transaction/deposit",
            TransactionKind::Withdraw => "/transaction/withdraw",
            TransactionKind::SendMoney => "/transaction/sendMoney",
            TransactionKind::Payment => "/transaction/payment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
            TransactionKind::SendMoney => "Send Money",
            TransactionKind::Payment => "Payment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw payload returned by a successful transaction call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReceipt {
    pub kind: TransactionKind,
    pub payload: Value,
}

impl TransactionReceipt {
    pub fn message(&self) -> Option<&str> {
        self.payload.get("message").and_then(Value::as_str)
    }
}
