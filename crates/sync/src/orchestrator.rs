//! Parallel sync orchestrator.
//!
//! Runs one workflow per asset (optional delete, then upload), bounded by
//! an admission gate, and streams progress and failures to the caller.
//! A failing asset never stops its siblings.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::backend::ReleaseBackend;
use crate::error::{SyncError, TransferError};
use crate::types::{
    Asset, AssetFailure, Operation, Step, SyncConfig, SyncOutcome, SyncProgress, SyncSummary,
    UploadStatus,
};

/// Stream buffer per unit of parallelism.
const STREAM_SLOTS_PER_WORKER: usize = 4;

/// Live result streams of a sync run.
///
/// Both streams must be drained while the run is in progress: they are
/// bounded, and workers block on a full stream. They close once every
/// workflow has finished, after which `done` resolves exactly once.
pub struct SyncHandle {
    pub progress: mpsc::Receiver<SyncProgress>,
    pub errors: mpsc::Receiver<AssetFailure>,
    pub done: oneshot::Receiver<SyncSummary>,
}

impl SyncHandle {
    /// Drains both streams concurrently until they close, then waits for
    /// the completion signal.
    pub async fn drain(
        mut self,
        mut on_progress: impl FnMut(SyncProgress),
        mut on_error: impl FnMut(AssetFailure),
    ) -> Result<SyncSummary, SyncError> {
        let mut progress_open = true;
        let mut errors_open = true;

        while progress_open || errors_open {
            tokio::select! {
                msg = self.progress.recv(), if progress_open => match msg {
                    Some(p) => on_progress(p),
                    None => progress_open = false,
                },
                msg = self.errors.recv(), if errors_open => match msg {
                    Some(e) => on_error(e),
                    None => errors_open = false,
                },
            }
        }

        self.done.await.map_err(|_| SyncError::Interrupted)
    }
}

/// Orchestrates the upload of many assets to one release.
pub struct SyncOrchestrator {
    config: SyncConfig,
}

impl SyncOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Starts a workflow task for every asset and returns the result streams.
    ///
    /// All tasks are spawned immediately; the admission gate only limits
    /// how many of them transfer at once. Must be called from within a
    /// tokio runtime.
    ///
    /// Fails before spawning anything if parallelism is zero or above
    /// [`Semaphore::MAX_PERMITS`], or if two assets share a name.
    pub fn start(
        &self,
        assets: Vec<Asset>,
        backend: Arc<dyn ReleaseBackend>,
    ) -> Result<SyncHandle, SyncError> {
        if self.config.parallel == 0 || self.config.parallel > Semaphore::MAX_PERMITS {
            return Err(SyncError::InvalidParallelism);
        }
        ensure_unique_names(&assets)?;

        let capacity = self
            .config
            .parallel
            .saturating_mul(STREAM_SLOTS_PER_WORKER)
            .min(Semaphore::MAX_PERMITS);
        let (progress_tx, progress_rx) = mpsc::channel(capacity);
        let (errors_tx, errors_rx) = mpsc::channel(capacity);
        let (done_tx, done_rx) = oneshot::channel();
        let gate = Arc::new(Semaphore::new(self.config.parallel));

        info!(
            target_release = %backend.target(),
            assets = assets.len(),
            parallel = self.config.parallel,
            replace = self.config.replace,
            "starting sync"
        );

        let names: Vec<String> = assets.iter().map(|a| a.name.clone()).collect();
        let mut workers = JoinSet::new();
        for (index, asset) in assets.into_iter().enumerate() {
            let worker = AssetWorker {
                backend: Arc::clone(&backend),
                gate: Arc::clone(&gate),
                progress: progress_tx.clone(),
                errors: errors_tx.clone(),
                replace: self.config.replace,
            };
            workers.spawn(async move { (index, worker.run(asset).await) });
        }

        // Streams close when the last worker drops its senders.
        drop(progress_tx);
        drop(errors_tx);

        tokio::spawn(async move {
            let mut summary = SyncSummary {
                outcomes: names
                    .into_iter()
                    .map(|n| (n, SyncOutcome::Failed("workflow aborted".into())))
                    .collect(),
                errors: 0,
            };

            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok((index, report)) => {
                        summary.errors += report.errors;
                        summary.outcomes[index].1 = report.outcome;
                    }
                    Err(e) => {
                        error!(error = %e, "asset workflow panicked");
                        summary.errors += 1;
                    }
                }
            }

            info!(
                uploaded = summary.uploaded(),
                replaced = summary.replaced(),
                skipped = summary.skipped(),
                failed = summary.failed(),
                "sync finished"
            );
            let _ = done_tx.send(summary);
        });

        Ok(SyncHandle {
            progress: progress_rx,
            errors: errors_rx,
            done: done_rx,
        })
    }
}

fn ensure_unique_names(assets: &[Asset]) -> Result<(), SyncError> {
    let mut seen = HashSet::with_capacity(assets.len());
    for asset in assets {
        if !seen.insert(asset.name.as_str()) {
            return Err(SyncError::DuplicateAsset(asset.name.clone()));
        }
    }
    Ok(())
}

/// What a single workflow reports back to the barrier.
struct WorkflowReport {
    outcome: SyncOutcome,
    errors: usize,
}

/// Per-asset workflow state.
struct AssetWorker {
    backend: Arc<dyn ReleaseBackend>,
    gate: Arc<Semaphore>,
    progress: mpsc::Sender<SyncProgress>,
    errors: mpsc::Sender<AssetFailure>,
    replace: bool,
}

impl AssetWorker {
    async fn run(self, asset: Asset) -> WorkflowReport {
        // Held until the end of the workflow, on every path.
        let _permit: OwnedSemaphorePermit = match Arc::clone(&self.gate).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                return WorkflowReport {
                    outcome: SyncOutcome::Failed("admission gate closed".into()),
                    errors: 0,
                };
            }
        };

        let mut errors = 0;
        let mut replaced = false;

        if self.replace && asset.is_remote() {
            self.emit(Step::Deleting, &asset).await;
            match self.backend.delete(&asset).await {
                Ok(()) => {
                    debug!(asset = %asset.name, "deleted remote asset");
                    replaced = true;
                }
                Err(e) => {
                    self.fail(Operation::Delete, &asset, &e).await;
                    errors += 1;
                }
            }
        }

        self.emit(Step::Uploading, &asset).await;
        let outcome = match self.backend.upload(&asset).await {
            Ok(UploadStatus::Uploaded) => {
                info!(asset = %asset.name, replaced, "uploaded");
                if replaced {
                    SyncOutcome::Replaced
                } else {
                    SyncOutcome::Uploaded
                }
            }
            Ok(UploadStatus::SkippedEmpty) => {
                warn!(asset = %asset.name, "empty files cannot be uploaded, skipping");
                self.emit(Step::Skipped, &asset).await;
                SyncOutcome::SkippedEmpty
            }
            Err(e) => {
                self.fail(Operation::Upload, &asset, &e).await;
                errors += 1;
                SyncOutcome::Failed(e.to_string())
            }
        };

        WorkflowReport { outcome, errors }
    }

    async fn emit(&self, step: Step, asset: &Asset) {
        let _ = self
            .progress
            .send(SyncProgress {
                step,
                asset: asset.name.clone(),
            })
            .await;
    }

    async fn fail(&self, op: Operation, asset: &Asset, err: &TransferError) {
        error!(asset = %asset.name, op = %op, error = %err, "asset operation failed");
        let _ = self
            .errors
            .send(AssetFailure {
                op,
                asset: asset.name.clone(),
                cause: err.to_string(),
            })
            .await;
    }
}
