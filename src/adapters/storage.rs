use crate::core::{Delivery, Storage};
use crate::domain::model::{DeliveryReceipt, OutputUser};
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

/// Writes the converted batch as pretty JSON into storage instead of posting it.
#[derive(Debug, Clone)]
pub struct FileDelivery<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> FileDelivery<S> {
    pub const DEFAULT_FILE_NAME: &'static str = "users.json";

    pub fn new(storage: S) -> Self {
        Self {
            storage,
            file_name: Self::DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

impl<S: Storage> Delivery for FileDelivery<S> {
    async fn deliver(&self, users: &[OutputUser]) -> Result<DeliveryReceipt> {
        let json = serde_json::to_vec_pretty(users)?;
        tracing::debug!("Writing {} users ({} bytes) to {}", users.len(), json.len(), self.file_name);
        self.storage.write_file(&self.file_name, &json).await?;

        Ok(DeliveryReceipt {
            destination: self.file_name.clone(),
            status: None,
            body: String::new(),
        })
    }
}
