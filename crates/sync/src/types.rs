//! Data types for the sync flow.

use std::fmt;
use std::path::PathBuf;

/// Default number of assets transferred at once.
pub const DEFAULT_PARALLEL: usize = 4;

/// A local file to synchronize to the release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Local filesystem location.
    pub path: PathBuf,
    /// Asset name on the release (the file's base name). Reconciliation key.
    pub name: String,
    /// ID of the same-named asset already on the release, if any.
    pub remote_id: Option<u64>,
}

impl Asset {
    /// Creates a candidate that is not yet known remotely.
    pub fn new(path: PathBuf, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
            remote_id: None,
        }
    }

    /// Returns true if a same-named asset exists on the release.
    pub fn is_remote(&self) -> bool {
        self.remote_id.is_some()
    }
}

/// An asset as listed by the remote release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAsset {
    pub id: u64,
    pub name: String,
    pub size: u64,
}

/// The release every operation of a run acts against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncTarget {
    pub owner: String,
    pub repo: String,
    pub release_id: u64,
}

impl SyncTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, release_id: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            release_id,
        }
    }
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.release_id)
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Maximum number of per-asset workflows transferring at once.
    pub parallel: usize,
    /// Delete an existing same-named remote asset before uploading.
    pub replace: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            parallel: DEFAULT_PARALLEL,
            replace: false,
        }
    }
}

/// Result of a single upload call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Uploaded,
    /// The local file is empty; releases reject zero-byte assets.
    SkippedEmpty,
}

/// Final result of one asset's workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Uploaded,
    /// Uploaded after the previous remote asset was deleted.
    Replaced,
    SkippedEmpty,
    Failed(String),
}

/// Step announced on the progress stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Deleting,
    Uploading,
    Skipped,
}

impl Step {
    fn verb(self) -> &'static str {
        match self {
            Self::Deleting => "Deleting",
            Self::Uploading => "Uploading",
            Self::Skipped => "Skipped (empty file)",
        }
    }
}

/// Progress stream item: `"<Verb>: <asset>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncProgress {
    pub step: Step,
    pub asset: String,
}

impl fmt::Display for SyncProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step.verb(), self.asset)
    }
}

/// Operation that failed for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Delete,
    Upload,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Delete => "delete",
            Self::Upload => "upload",
        })
    }
}

/// Error stream item: `"<op> <asset> error: <cause>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailure {
    pub op: Operation,
    pub asset: String,
    pub cause: String,
}

impl fmt::Display for AssetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} error: {}", self.op, self.asset, self.cause)
    }
}

/// Payload of the completion signal.
///
/// Outcomes are listed in candidate order, regardless of the order in
/// which workflows finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub outcomes: Vec<(String, SyncOutcome)>,
    /// Number of messages sent on the error stream.
    pub errors: usize,
}

impl SyncSummary {
    fn count(&self, pred: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }

    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Uploaded))
    }

    pub fn replaced(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Replaced))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::SkippedEmpty))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Failed(_)))
    }

    /// True when the error stream stayed empty. Skips are not errors.
    ///
    /// A failed delete followed by a successful upload still counts as
    /// an error here even though the outcome is `Uploaded`.
    pub fn is_success(&self) -> bool {
        self.errors == 0 && self.failed() == 0
    }

    /// Looks up the outcome for an asset name.
    pub fn outcome(&self, name: &str) -> Option<&SyncOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| o)
    }
}
