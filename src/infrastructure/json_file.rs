use crate::domain::actor::{AccountDocument, Actor};
use crate::domain::ports::AccountStore;
use crate::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Default location of the accounts document, relative to the working directory.
pub const DEFAULT_ACCOUNTS_FILE: &str = "data/users.json";

/// Account store persisted as a single pretty-printed JSON document.
///
/// Every mutation rewrites the whole file. The internal mutex serializes
/// read-modify-write cycles of writers sharing this instance; separate
/// processes must use separate paths.
pub struct JsonFileAccountStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileAccountStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> AccountDocument {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return AccountDocument::default(),
            Err(e) => {
                eprintln!(
                    "WARNING: Could not read {}: {}. Starting from an empty account list.",
                    self.path.display(),
                    e
                );
                return AccountDocument::default();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            eprintln!(
                "WARNING: {} is not a valid accounts document ({}). Starting from an empty account list.",
                self.path.display(),
                e
            );
            AccountDocument::default()
        })
    }

    async fn write_document(&self, document: &AccountDocument) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl Default for JsonFileAccountStore {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNTS_FILE)
    }
}

#[async_trait]
impl AccountStore for JsonFileAccountStore {
    async fn load_all(&self) -> Result<AccountDocument> {
        Ok(self.read_document().await)
    }

    async fn append(&self, actor: Actor) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await;
        let (role, name, phone) = (actor.role, actor.name.clone(), actor.phone.clone());
        document.push(actor);
        self.write_document(&document).await?;
        eprintln!("Saved {role}: {name} ({phone})");
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_document(&AccountDocument::default()).await?;
        eprintln!("Cleared all users");
        Ok(())
    }
}
