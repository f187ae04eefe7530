use crate::core::{ConfigProvider, Delivery};
use crate::domain::model::{DeliveryReceipt, OutputUser};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs converted users as a JSON array to the collector.
#[derive(Debug, Clone)]
pub struct HttpDelivery {
    endpoint: String,
    client: Client,
}

impl HttpDelivery {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.delivery_endpoint(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Delivery for HttpDelivery {
    async fn deliver(&self, users: &[OutputUser]) -> Result<DeliveryReceipt> {
        tracing::debug!("Posting {} users to {}", users.len(), self.endpoint);
        let response = self.client.post(&self.endpoint).json(users).send().await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Collector responded {}: {}", status, body);

        if !status.is_success() {
            return Err(EtlError::DeliveryStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(DeliveryReceipt {
            destination: self.endpoint.clone(),
            status: Some(status.as_u16()),
            body,
        })
    }
}
