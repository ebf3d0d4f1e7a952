// Copyright 2025 stoa contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The asset contract: background loading with results drained at a sync
//! point on the engine thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::BoxedError;

/// Identifies one load request for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "asset#{}", self.0)
    }
}

/// Where a load request currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Queued or in flight.
    Pending,
    /// Bytes are available.
    Loaded,
    /// The load failed; see the matching [`AssetEvent::Failed`].
    Failed,
    /// The id was never requested or has been unloaded.
    Unknown,
}

/// A completed load.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    /// The request this fulfils.
    pub id: AssetId,
    /// The path that was read.
    pub path: PathBuf,
    /// The file contents.
    pub bytes: Arc<[u8]>,
}

/// Something the backend finished since the last drain.
#[derive(Debug, Clone)]
pub enum AssetEvent {
    /// A load completed.
    Loaded(LoadedAsset),
    /// A load failed.
    Failed {
        /// The request that failed.
        id: AssetId,
        /// The path that was attempted.
        path: PathBuf,
        /// Backend-reported reason.
        error: String,
    },
    /// A watched path changed on disk.
    Modified {
        /// The path that changed.
        path: PathBuf,
    },
}

/// The asset capability: request loads, poll status, drain completions.
///
/// Looked up as `dyn AssetBackend`. Loading happens off-thread; completions
/// surface only through [`AssetBackend::take_events`], which the owning
/// module calls once per frame.
pub trait AssetBackend: Send + Sync {
    /// Queues a load and returns its id. Requesting the same path twice
    /// yields two independent ids.
    fn request_load(&self, path: &Path) -> AssetId;

    /// Forgets a request and any bytes held for it.
    fn unload(&self, id: AssetId);

    /// Reports where a request currently stands.
    fn status(&self, id: AssetId) -> LoadState;

    /// Drains everything completed since the last call, in completion order.
    fn take_events(&self) -> Vec<AssetEvent>;

    /// Starts watching a path for modification events. Returns `false` when
    /// the backend does not support watching.
    fn watch(&self, path: &Path) -> bool;

    /// Converts a source file into its engine-ready form at `destination`.
    fn cook(&self, source: &Path, destination: &Path) -> Result<(), BoxedError>;

    /// Requests queued or in flight right now.
    fn pending_count(&self) -> usize;
}
