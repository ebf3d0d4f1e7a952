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

//! Engine-level notifications published on the event bus.

use crate::registry::FramePhase;

/// Something noteworthy the engine did or observed during a frame.
///
/// Published on the engine's [`EventBus`](stoa_core::event::EventBus);
/// embedders drain them after stepping to react to failures and reloads.
/// Routine per-frame activity is not reported here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A module's update or render returned an error and the module was
    /// unloaded. The rest of the frame ran normally.
    ModuleFailed {
        /// The failed module.
        module: String,
        /// The phase in which it failed.
        phase: FramePhase,
        /// The reported error, stringified.
        error: String,
    },
    /// A hot-reload completed and the fresh instance is active.
    ModuleReloaded {
        /// The reloaded module.
        module: String,
    },
    /// A hot-reload was rejected or its fresh instance failed to
    /// initialize; the previous instance is still active.
    ReloadFailed {
        /// The module whose reload failed.
        module: String,
        /// Why the reload did not happen.
        reason: String,
    },
    /// A reload re-published a capability; holders of the old provider are
    /// now stale and should resolve again.
    CapabilityReplaced {
        /// The capability's type name.
        capability: &'static str,
    },
}
