use crate::domain::actor::{AccountDocument, Actor};
use crate::domain::ports::AccountStore;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory account store.
///
/// Nothing survives the process. Useful for tests and for runs that should not
/// touch the shared accounts file.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    document: Arc<RwLock<AccountDocument>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn load_all(&self) -> Result<AccountDocument> {
        Ok(self.document.read().await.clone())
    }

    async fn append(&self, actor: Actor) -> Result<()> {
        self.document.write().await.push(actor);
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        *self.document.write().await = AccountDocument::default();
        Ok(())
    }
}
