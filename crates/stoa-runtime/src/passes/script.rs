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

//! Script attachment and per-frame ticking.

use std::time::Duration;

use log::warn;

use stoa_core::contract::ScriptBackend;
use stoa_core::CapabilityRegistry;
use stoa_world::{ScriptRef, World};

use crate::scheduler::System;

/// Ticks every enabled [`ScriptRef`] through the active script backend.
///
/// Scripts are attached lazily on first sight; an attach or tick failure
/// disables the entity's script instead of retrying (and re-failing) every
/// frame. Idles when no script backend is installed.
#[derive(Debug, Default)]
pub struct ScriptPass;

impl System for ScriptPass {
    fn name(&self) -> &str {
        "script"
    }

    fn update(&mut self, world: &mut World, capabilities: &mut CapabilityRegistry, dt: Duration) {
        let Ok(scripts) = capabilities.get::<dyn ScriptBackend>() else {
            return;
        };

        for id in world.entities_with::<ScriptRef>() {
            let Some(script_ref) = world.get_mut::<ScriptRef>(id) else {
                continue;
            };
            if !script_ref.enabled {
                continue;
            }
            if script_ref.handle.is_none() {
                match scripts.attach(&script_ref.script) {
                    Ok(handle) => script_ref.handle = Some(handle),
                    Err(error) => {
                        warn!(
                            "Script '{}' on entity {id} failed to attach, disabling: {error}",
                            script_ref.script
                        );
                        script_ref.enabled = false;
                        continue;
                    }
                }
            }
            let Some(handle) = script_ref.handle else {
                continue;
            };
            if let Err(error) = scripts.tick(handle, dt.as_secs_f32()) {
                warn!(
                    "Script '{}' on entity {id} failed to tick, disabling: {error}",
                    script_ref.script
                );
                script_ref.enabled = false;
            }
        }
    }
}
