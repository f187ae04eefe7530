use crate::domain::model::{BatchResult, DeliveryReceipt, OutputUser, RawUser};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Hands a converted batch to whatever sits downstream.
pub trait Delivery: Send + Sync {
    fn deliver(
        &self,
        users: &[OutputUser],
    ) -> impl std::future::Future<Output = Result<DeliveryReceipt>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn delivery_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    /// Upper bound on converter threads; `None` means available parallelism.
    fn workers(&self) -> Option<usize>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, payload: Vec<u8>) -> Result<Vec<RawUser>>;
    async fn transform(&self, users: Vec<RawUser>) -> Result<BatchResult>;
    async fn load(&self, users: &[OutputUser]) -> Result<DeliveryReceipt>;
}
