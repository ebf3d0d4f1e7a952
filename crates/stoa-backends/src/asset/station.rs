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

//! File loading on a worker thread, drained at the frame sync point.

use std::any::Any;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use log::{debug, info, warn};

use stoa_core::contract::{AssetBackend, AssetEvent, AssetId, LoadState, LoadedAsset};
use stoa_core::{
    BoxedError, FrameContext, HostContext, Module, ModuleDescriptor, Version, API_VERSION,
};

/// How long the worker waits for a request before polling watched paths.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

enum WorkerRequest {
    Load { id: AssetId, path: PathBuf },
    Watch { path: PathBuf },
}

/// Asset provider backed by one worker thread.
///
/// Requests and completions travel over channels. Completions never touch
/// the bookkeeping directly; `status` and the byte cache advance only when
/// [`AssetBackend::take_events`] drains them on the engine thread, so a
/// frame observes one consistent asset state throughout.
///
/// Watched paths are polled by modification time whenever the request queue
/// goes idle. Cooking is a byte-for-byte copy.
pub struct AssetStation {
    requests: flume::Sender<WorkerRequest>,
    results: flume::Receiver<AssetEvent>,
    state: Mutex<StationState>,
    next_id: AtomicU64,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct StationState {
    statuses: HashMap<AssetId, LoadState>,
    bytes: HashMap<AssetId, Arc<[u8]>>,
}

impl Default for AssetStation {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStation {
    /// Spawns the worker thread and returns the station.
    #[must_use]
    pub fn new() -> Self {
        let (requests, request_rx) = flume::unbounded();
        let (result_tx, results) = flume::unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let worker_flag = Arc::clone(&running);
        let worker = thread::spawn(move || worker_loop(&request_rx, &result_tx, &worker_flag));
        info!("Asset station worker started");
        Self {
            requests,
            results,
            state: Mutex::new(StationState::default()),
            next_id: AtomicU64::new(1),
            running,
            worker: Some(worker),
        }
    }

    /// Bytes for a load that has passed through the sync point.
    #[must_use]
    pub fn bytes(&self, id: AssetId) -> Option<Arc<[u8]>> {
        self.state.lock().unwrap().bytes.get(&id).cloned()
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Asset station worker panicked");
            }
        }
    }
}

impl Drop for AssetStation {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(
    requests: &flume::Receiver<WorkerRequest>,
    results: &flume::Sender<AssetEvent>,
    running: &AtomicBool,
) {
    let mut watched: HashMap<PathBuf, Option<SystemTime>> = HashMap::new();
    while running.load(Ordering::Relaxed) {
        match requests.recv_timeout(POLL_INTERVAL) {
            Ok(WorkerRequest::Load { id, path }) => {
                let event = match fs::read(&path) {
                    Ok(bytes) => AssetEvent::Loaded(LoadedAsset {
                        id,
                        path,
                        bytes: bytes.into(),
                    }),
                    Err(error) => AssetEvent::Failed {
                        id,
                        path,
                        error: error.to_string(),
                    },
                };
                if results.send(event).is_err() {
                    break;
                }
            }
            Ok(WorkerRequest::Watch { path }) => {
                let stamp = modification_time(&path);
                watched.insert(path, stamp);
            }
            Err(flume::RecvTimeoutError::Timeout) => {
                poll_watched(&mut watched, results);
            }
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn poll_watched(
    watched: &mut HashMap<PathBuf, Option<SystemTime>>,
    results: &flume::Sender<AssetEvent>,
) {
    for (path, stamp) in watched.iter_mut() {
        let current = modification_time(path);
        if current != *stamp {
            *stamp = current;
            let _ = results.send(AssetEvent::Modified { path: path.clone() });
        }
    }
}

fn modification_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

impl AssetBackend for AssetStation {
    fn request_load(&self, path: &Path) -> AssetId {
        let id = AssetId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert(id, LoadState::Pending);
        debug!("{id} requested from '{}'", path.display());
        let request = WorkerRequest::Load {
            id,
            path: path.to_path_buf(),
        };
        if self.requests.send(request).is_err() {
            warn!("Asset worker is gone, {id} marked failed");
            self.state
                .lock()
                .unwrap()
                .statuses
                .insert(id, LoadState::Failed);
        }
        id
    }

    fn unload(&self, id: AssetId) {
        let mut state = self.state.lock().unwrap();
        state.statuses.remove(&id);
        state.bytes.remove(&id);
    }

    fn status(&self, id: AssetId) -> LoadState {
        self.state
            .lock()
            .unwrap()
            .statuses
            .get(&id)
            .copied()
            .unwrap_or(LoadState::Unknown)
    }

    fn take_events(&self) -> Vec<AssetEvent> {
        let events: Vec<AssetEvent> = self.results.try_iter().collect();
        if events.is_empty() {
            return events;
        }
        let mut state = self.state.lock().unwrap();
        for event in &events {
            match event {
                AssetEvent::Loaded(asset) => {
                    // Unloaded mid-flight: report the completion but retain
                    // nothing for it.
                    if state.statuses.contains_key(&asset.id) {
                        state.statuses.insert(asset.id, LoadState::Loaded);
                        state.bytes.insert(asset.id, Arc::clone(&asset.bytes));
                    }
                }
                AssetEvent::Failed { id, .. } => {
                    if state.statuses.contains_key(id) {
                        state.statuses.insert(*id, LoadState::Failed);
                    }
                }
                AssetEvent::Modified { .. } => {}
            }
        }
        events
    }

    fn watch(&self, path: &Path) -> bool {
        self.requests
            .send(WorkerRequest::Watch {
                path: path.to_path_buf(),
            })
            .is_ok()
    }

    fn cook(&self, source: &Path, destination: &Path) -> Result<(), BoxedError> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, destination)?;
        debug!(
            "Cooked '{}' into '{}'",
            source.display(),
            destination.display()
        );
        Ok(())
    }

    fn pending_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .statuses
            .values()
            .filter(|status| **status == LoadState::Pending)
            .count()
    }
}

/// Module wrapper that owns an [`AssetStation`] and publishes it as the
/// asset capability.
///
/// Its update is the sync point: completions are drained there once per
/// frame, so every later module in the frame sees the same asset state.
#[derive(Default)]
pub struct AssetModule {
    station: Option<Arc<AssetStation>>,
}

impl AssetModule {
    /// Descriptor under which this module registers.
    #[must_use]
    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("assets", Version::new(0, 1, 0), API_VERSION, "create_assets")
    }

    /// Factory matching the descriptor's entry point.
    #[must_use]
    pub fn create() -> Box<dyn Module> {
        Box::<Self>::default()
    }
}

impl Module for AssetModule {
    fn name(&self) -> &str {
        "assets"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn initialize(&mut self, host: &mut HostContext<'_>) -> Result<(), BoxedError> {
        let station = Arc::new(AssetStation::new());
        host.provide::<dyn AssetBackend>(Arc::clone(&station) as Arc<dyn AssetBackend>);
        self.station = Some(station);
        Ok(())
    }

    fn shutdown(&mut self) {
        // The worker joins when the last Arc clone drops.
        self.station = None;
    }

    fn update(&mut self, _frame: &mut FrameContext<'_>, _dt: Duration) -> Result<(), BoxedError> {
        let Some(station) = self.station.as_ref() else {
            return Ok(());
        };
        for event in station.take_events() {
            match event {
                AssetEvent::Loaded(asset) => debug!(
                    "{} loaded from '{}' ({} bytes)",
                    asset.id,
                    asset.path.display(),
                    asset.bytes.len()
                ),
                AssetEvent::Failed { id, path, error } => {
                    warn!("{id} failed to load from '{}': {error}", path.display());
                }
                AssetEvent::Modified { path } => {
                    info!("Asset '{}' changed on disk", path.display());
                }
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
