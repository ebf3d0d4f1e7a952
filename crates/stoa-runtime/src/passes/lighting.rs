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

//! Light collection and submission.

use std::time::Duration;

use glam::Vec4;

use stoa_core::contract::{FrameLight, RenderBackend};
use stoa_core::CapabilityRegistry;
use stoa_world::{GlobalTransform, Light, World};

use crate::scheduler::System;

/// Collects every enabled [`Light`] with its world-space placement and
/// replaces the render backend's retained light set.
///
/// Position comes from the entity's [`GlobalTransform`] translation;
/// direction is the transform's forward axis (-Z). An empty collection is
/// still submitted, so disabling the last light actually darkens the scene.
/// Idles when no render backend is installed.
#[derive(Debug, Default)]
pub struct LightingPass;

impl System for LightingPass {
    fn name(&self) -> &str {
        "lighting"
    }

    fn update(&mut self, world: &mut World, capabilities: &mut CapabilityRegistry, _dt: Duration) {
        let Ok(renderer) = capabilities.get::<dyn RenderBackend>() else {
            return;
        };

        let mut lights = Vec::new();
        for id in world.entities_with::<Light>() {
            let Some(light) = world.get::<Light>(id).copied() else {
                continue;
            };
            if !light.enabled {
                continue;
            }
            let global = world.get::<GlobalTransform>(id).copied().unwrap_or_default();
            let direction = (global.0 * Vec4::new(0.0, 0.0, -1.0, 0.0))
                .truncate()
                .normalize_or_zero();
            lights.push(FrameLight {
                kind: light.kind,
                color: light.color,
                intensity: light.intensity,
                range: light.range,
                position: global.position(),
                direction,
            });
        }
        renderer.submit_lights(&lights);
    }
}
