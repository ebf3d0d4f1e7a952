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

use stoa_core::contract::ScriptHandle;

use crate::ecs::Component;

/// Attaches a named script to an entity.
///
/// The script pass lazily instantiates the script through the active script
/// backend, stores the handle here, and ticks it once per frame while
/// `enabled`. A script that fails to attach or tick is disabled instead of
/// retried every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    /// Name the backend resolves to script code.
    pub script: String,
    /// Backend instance, populated on first successful attach.
    pub handle: Option<ScriptHandle>,
    /// Whether the script pass ticks this entity.
    pub enabled: bool,
}

impl Component for ScriptRef {}

impl ScriptRef {
    /// Creates an enabled, not-yet-attached script reference.
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            handle: None,
            enabled: true,
        }
    }
}
