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

//! The scripting contract: attach, tick, and detach script instances.

use crate::error::BoxedError;

use super::handle::Handle;

/// Marker for script instances.
pub enum Script {}

/// Handle to a script instance owned by the active script backend.
pub type ScriptHandle = Handle<Script>;

/// The scripting capability: per-entity script instances ticked once per
/// frame.
///
/// Looked up as `dyn ScriptBackend`.
pub trait ScriptBackend: Send + Sync {
    /// Instantiates the named script and returns its handle.
    fn attach(&self, script: &str) -> Result<ScriptHandle, BoxedError>;

    /// Tears an instance down. Stale or unknown handles are ignored.
    fn detach(&self, handle: ScriptHandle);

    /// Runs one frame of the instance.
    fn tick(&self, handle: ScriptHandle, dt: f32) -> Result<(), BoxedError>;

    /// Instances currently attached.
    fn instance_count(&self) -> usize;
}
