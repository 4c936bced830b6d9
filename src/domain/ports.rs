use super::actor::{AccountDocument, Actor, Role};
use super::money::{Amount, Balance};
use super::transaction::{TransactionKind, TransactionReceipt};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Bookkeeping of the actors created against the platform.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Returns the persisted document, or an empty one when nothing usable is stored.
    async fn load_all(&self) -> Result<AccountDocument>;
    async fn append(&self, actor: Actor) -> Result<()>;
    async fn clear_all(&self) -> Result<()>;

    async fn get_by_role(&self, role: Role, index: usize) -> Result<Option<Actor>> {
        let document = self.load_all().await?;
        Ok(document.get(role, index).cloned())
    }
}

pub type AccountStoreRef = Arc<dyn AccountStore>;

/// The remote operations the transaction scenario drives.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn login(&mut self, email: &str, password: &str) -> Result<String>;
    fn set_token(&mut self, token: String);
    async fn create_actor(&mut self, role: Role) -> Result<Actor>;
    async fn transact(
        &self,
        kind: TransactionKind,
        from: &str,
        to: &str,
        amount: Amount,
    ) -> Result<TransactionReceipt>;
    async fn check_balance(&self, phone: &str) -> Result<Balance>;

    async fn create_customer(&mut self) -> Result<Actor> {
        self.create_actor(Role::Customer).await
    }

    async fn create_agent(&mut self) -> Result<Actor> {
        self.create_actor(Role::Agent).await
    }

    async fn create_merchant(&mut self) -> Result<Actor> {
        self.create_actor(Role::Merchant).await
    }

    async fn deposit(&self, from: &str, to: &str, amount: Amount) -> Result<TransactionReceipt> {
        self.transact(TransactionKind::Deposit, from, to, amount)
            .await
    }

    async fn withdraw(&self, from: &str, to: &str, amount: Amount) -> Result<TransactionReceipt> {
        self.transact(TransactionKind::Withdraw, from, to, amount)
            .await
    }

    async fn send_money(&self, from: &str, to: &str, amount: Amount) -> Result<TransactionReceipt> {
        self.transact(TransactionKind::SendMoney, from, to, amount)
            .await
    }

    async fn payment(&self, from: &str, to: &str, amount: Amount) -> Result<TransactionReceipt> {
        self.transact(TransactionKind::Payment, from, to, amount)
            .await
    }
}
