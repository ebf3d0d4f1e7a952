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

//! Physics stepping and pose write-back.

use std::time::Duration;

use stoa_core::contract::{BodyType, PhysicsBackend};
use stoa_core::CapabilityRegistry;
use stoa_world::{RigidBodyRef, Transform, World};

use crate::scheduler::System;

/// Steps the active physics backend and copies simulated poses back into
/// entity [`Transform`]s.
///
/// Only dynamic bodies are written back; kinematic and static bodies keep
/// the entity as the authority over its transform. Idles when no physics
/// backend is installed.
#[derive(Debug, Default)]
pub struct PhysicsPass;

impl System for PhysicsPass {
    fn name(&self) -> &str {
        "physics"
    }

    fn update(&mut self, world: &mut World, capabilities: &mut CapabilityRegistry, dt: Duration) {
        let Ok(physics) = capabilities.get::<dyn PhysicsBackend>() else {
            return;
        };
        physics.step(dt.as_secs_f32());

        for id in world.entities_with::<RigidBodyRef>() {
            let Some(body_ref) = world.get::<RigidBodyRef>(id).copied() else {
                continue;
            };
            if body_ref.body_type != BodyType::Dynamic {
                continue;
            }
            let Some(pose) = physics.body_pose(body_ref.body) else {
                continue;
            };
            if let Some(transform) = world.get_mut::<Transform>(id) {
                transform.position = pose.position;
                transform.rotation = pose.rotation;
            }
        }
    }
}
