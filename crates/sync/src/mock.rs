//! Instrumented in-memory backend shared by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rand::Rng;

use crate::backend::{BackendFuture, ReleaseBackend};
use crate::error::{SyncError, TransferError};
use crate::types::{Asset, RemoteAsset, SyncTarget, UploadStatus};

pub struct MockBackend {
    target: SyncTarget,
    remote: Result<Vec<RemoteAsset>, String>,
    fail_uploads: HashSet<String>,
    fail_deletes: HashSet<String>,
    max_delay_ms: u64,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    transfers: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(remote: Vec<RemoteAsset>) -> Self {
        Self {
            target: SyncTarget::new("octo", "hello", 1),
            remote: Ok(remote),
            fail_uploads: HashSet::new(),
            fail_deletes: HashSet::new(),
            max_delay_ms: 0,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            transfers: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_list(reason: &str) -> Self {
        Self {
            remote: Err(reason.into()),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_random_delay(mut self, max_ms: u64) -> Self {
        self.max_delay_ms = max_ms;
        self
    }

    pub fn fail_upload(mut self, name: &str) -> Self {
        self.fail_uploads.insert(name.into());
        self
    }

    pub fn fail_delete(mut self, name: &str) -> Self {
        self.fail_deletes.insert(name.into());
        self
    }

    /// Highest number of transfers observed in flight at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of transfers that reached the "network".
    pub fn transfers(&self) -> usize {
        self.transfers.load(Ordering::SeqCst)
    }

    /// Recorded calls, e.g. `"delete:a.tar.gz"`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn transfer(&self, call: String) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.transfers.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(call);

        if self.max_delay_ms > 0 {
            let ms = rand::thread_rng().gen_range(1..=self.max_delay_ms);
            tokio::time::sleep(Duration::from_millis(ms)).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ReleaseBackend for MockBackend {
    fn target(&self) -> &SyncTarget {
        &self.target
    }

    fn list_assets(&self) -> BackendFuture<'_, Result<Vec<RemoteAsset>, SyncError>> {
        Box::pin(async move { self.remote.clone().map_err(SyncError::RemoteList) })
    }

    fn upload<'a>(
        &'a self,
        asset: &'a Asset,
    ) -> BackendFuture<'a, Result<UploadStatus, TransferError>> {
        Box::pin(async move {
            let meta = tokio::fs::metadata(&asset.path)
                .await
                .map_err(|e| TransferError::Stat(e.to_string()))?;
            if meta.len() == 0 {
                return Ok(UploadStatus::SkippedEmpty);
            }

            self.transfer(format!("upload:{}", asset.name)).await;
            if self.fail_uploads.contains(&asset.name) {
                return Err(TransferError::Upload("422 Unprocessable Entity".into()));
            }
            Ok(UploadStatus::Uploaded)
        })
    }

    fn delete<'a>(&'a self, asset: &'a Asset) -> BackendFuture<'a, Result<(), TransferError>> {
        Box::pin(async move {
            if asset.remote_id.is_none() {
                return Err(TransferError::MissingRemoteId(asset.name.clone()));
            }

            self.transfer(format!("delete:{}", asset.name)).await;
            if self.fail_deletes.contains(&asset.name) {
                return Err(TransferError::Delete("404 Not Found".into()));
            }
            Ok(())
        })
    }
}

pub fn remote(id: u64, name: &str) -> RemoteAsset {
    RemoteAsset {
        id,
        name: name.into(),
        size: 1,
    }
}
