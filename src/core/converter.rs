use crate::core::aggregate::{ValidationErrors, ValidationFailure};
use crate::core::classify::classify;
use crate::core::normalize::normalize;
use crate::core::rules::RuleTable;
use crate::core::validate::validate;
use crate::domain::model::{BatchResult, OutputUser, RawUser};
use crate::utils::error::{EtlError, Result};
use crossbeam_channel::bounded;
use std::num::NonZeroUsize;
use std::thread;

type Outcome = std::result::Result<OutputUser, ValidationFailure>;

/// Runs the normalize, validate and classify steps for a batch on a pool of
/// worker threads. Output order always follows input order, whatever the pool
/// size.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    rules: RuleTable,
    max_workers: Option<NonZeroUsize>,
}

impl Converter {
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            max_workers: None,
        }
    }

    /// Caps the pool size. `0` falls back to available parallelism.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = NonZeroUsize::new(workers);
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn worker_count(&self, batch_len: usize) -> usize {
        let limit = self.max_workers.unwrap_or_else(|| {
            thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
        });
        limit.get().min(batch_len).max(1)
    }

    pub fn convert(&self, batch: Vec<RawUser>) -> Result<BatchResult> {
        if batch.is_empty() {
            return Err(EtlError::NoRecords);
        }

        let total = batch.len();
        let workers = self.worker_count(total);
        tracing::debug!("Converting {} records with {} workers", total, workers);

        // The queue holds the whole batch, so enqueueing never waits on workers.
        let (job_tx, job_rx) = bounded::<(usize, RawUser)>(total);
        for job in batch.into_iter().enumerate() {
            job_tx.send(job).map_err(|_| EtlError::WorkerPool {
                message: "job queue closed before dispatch finished".to_string(),
            })?;
        }
        drop(job_tx);

        let (result_tx, result_rx) = bounded::<(usize, Outcome)>(total);
        let rules = &self.rules;

        let panicked = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let jobs = job_rx.clone();
                    let results = result_tx.clone();
                    scope.spawn(move || {
                        for (index, raw) in jobs.iter() {
                            let outcome = convert_one(index, raw, rules);
                            if results.send((index, outcome)).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(std::result::Result::is_err)
                .count()
        });
        drop(result_tx);

        if panicked > 0 {
            return Err(EtlError::WorkerPool {
                message: format!("{} worker(s) panicked", panicked),
            });
        }

        // Dense by index, then one pass in batch order.
        let mut slots: Vec<Option<Outcome>> = (0..total).map(|_| None).collect();
        for (index, outcome) in result_rx.try_iter() {
            slots[index] = Some(outcome);
        }

        let mut outputs = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(Ok(user)) => outputs.push(user),
                Some(Err(failure)) => failures.push(failure),
                None => {
                    return Err(EtlError::WorkerPool {
                        message: format!("no result for record {}", index),
                    })
                }
            }
        }

        tracing::debug!(
            "Converted batch: {} valid, {} rejected",
            outputs.len(),
            failures.len()
        );

        Ok(BatchResult {
            outputs,
            errors: ValidationErrors::from_failures(failures),
        })
    }

    /// Same as [`Converter::convert`], run on tokio's blocking pool.
    pub async fn convert_async(&self, batch: Vec<RawUser>) -> Result<BatchResult> {
        let converter = *self;
        tokio::task::spawn_blocking(move || converter.convert(batch))
            .await
            .map_err(|e| EtlError::WorkerPool {
                message: format!("conversion task failed: {}", e),
            })?
    }
}

fn convert_one(index: usize, raw: RawUser, rules: &RuleTable) -> Outcome {
    let user = validate(index, normalize(raw), rules)?;
    Ok(OutputUser {
        age_group: classify(user.age, rules),
        id: user.id,
        full_name: user.name,
        email: user.email,
    })
}
