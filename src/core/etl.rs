use crate::core::aggregate::ValidationErrors;
use crate::core::Pipeline;
use crate::domain::model::DeliveryReceipt;
use crate::utils::error::{EtlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every record was valid and delivered.
    Complete,
    /// Some records were dropped; the rest were delivered.
    Partial,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub delivered: usize,
    pub dropped: Option<ValidationErrors>,
    pub receipt: DeliveryReceipt,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self, payload: Vec<u8>) -> Result<RunReport> {
        tracing::info!("Starting ETL run ({} bytes)", payload.len());

        let users = self.pipeline.extract(payload).await?;
        tracing::info!("Extracted {} users", users.len());

        let batch = self.pipeline.transform(users).await?;
        if batch.outputs.is_empty() {
            if let Some(errors) = &batch.errors {
                tracing::error!("All {} users failed validation: {}", errors.len(), errors);
                return Err(EtlError::AllRecordsInvalid(errors.clone()));
            }
        }

        let outcome = match &batch.errors {
            Some(errors) => {
                tracing::warn!(
                    "Dropped {} of {} users: {}",
                    errors.len(),
                    batch.total(),
                    errors
                );
                RunOutcome::Partial
            }
            None => RunOutcome::Complete,
        };
        tracing::info!("Transformed {} users", batch.outputs.len());

        let receipt = self.pipeline.load(&batch.outputs).await?;
        tracing::info!("Delivered {} users to {}", batch.outputs.len(), receipt.destination);

        Ok(RunReport {
            outcome,
            delivered: batch.outputs.len(),
            dropped: batch.errors,
            receipt,
        })
    }
}
