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

//! Draw collection and frame submission.

use std::time::Duration;

use log::trace;

use stoa_core::contract::{DrawCommand, RenderBackend};
use stoa_core::CapabilityRegistry;
use stoa_world::{GlobalTransform, Renderable, World};

use crate::scheduler::System;

/// Brackets the frame on the render backend and submits one draw per
/// visible [`Renderable`].
///
/// Runs in the presentation phase, after every update pass. Draws are
/// sorted by layer; the sort is stable, so submission order within a layer
/// follows storage order. Entities without a [`GlobalTransform`] (no
/// `Transform`, so the transform pass never reached them) are skipped.
/// Idles when no render backend is installed.
#[derive(Debug, Default)]
pub struct RenderSubmissionPass;

impl System for RenderSubmissionPass {
    fn name(&self) -> &str {
        "render_submission"
    }

    fn update(&mut self, _world: &mut World, _capabilities: &mut CapabilityRegistry, _dt: Duration) {}

    fn renders(&self) -> bool {
        true
    }

    fn render(&mut self, world: &World, capabilities: &CapabilityRegistry) {
        let Some(renderer) = capabilities.try_get::<dyn RenderBackend>() else {
            return;
        };

        renderer.begin_frame();

        let mut commands: Vec<DrawCommand> = Vec::new();
        for id in world.entities_with::<Renderable>() {
            let Some(renderable) = world.get::<Renderable>(id).copied() else {
                continue;
            };
            if !renderable.visible {
                continue;
            }
            let Some(global) = world.get::<GlobalTransform>(id).copied() else {
                continue;
            };
            commands.push(DrawCommand {
                mesh: renderable.mesh,
                material: renderable.material,
                transform: global.0,
                layer: renderable.layer,
            });
        }
        commands.sort_by_key(|command| command.layer);
        for command in &commands {
            renderer.submit(command);
        }

        let stats = renderer.end_frame();
        trace!(
            "Frame {}: {} draws, {} lights retained",
            stats.frame_index,
            stats.draw_calls,
            stats.lights
        );
    }
}
