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

//! Transform propagation through the parent hierarchy.

use std::collections::HashMap;
use std::time::Duration;

use stoa_core::CapabilityRegistry;
use stoa_world::{EntityId, GlobalTransform, Parent, Transform, World};

use crate::scheduler::System;

/// Folds local [`Transform`]s down the [`Parent`] hierarchy into
/// [`GlobalTransform`]s, breadth-first so a parent's matrix is always
/// computed before its children read it.
///
/// An entity whose parent has been despawned, or whose parent has no
/// `Transform` of its own, is treated as a root.
#[derive(Debug, Default)]
pub struct TransformPass;

impl System for TransformPass {
    fn name(&self) -> &str {
        "transform"
    }

    fn update(&mut self, world: &mut World, _capabilities: &mut CapabilityRegistry, _dt: Duration) {
        let transformed = world.entities_with::<Transform>();
        if transformed.is_empty() {
            return;
        }

        // Stage 1: split into roots and a parent -> children map. Roots get
        // their global matrix directly from their local transform.
        let mut children: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
        let mut queue: Vec<EntityId> = Vec::new();
        for &id in &transformed {
            let attached = world
                .get::<Parent>(id)
                .map(|parent| parent.0)
                .filter(|&parent| world.is_alive(parent) && world.has::<Transform>(parent));
            match attached {
                Some(parent) => children.entry(parent).or_default().push(id),
                None => {
                    if let Some(local) = world.get::<Transform>(id).copied() {
                        world.insert(id, GlobalTransform(local.to_mat4()));
                    }
                    queue.push(id);
                }
            }
        }

        // Stage 2: breadth-first from the roots. A head cursor walks the
        // queue while children are appended behind it, so every entity at
        // the current depth is finished before the next depth starts.
        let mut head = 0;
        while head < queue.len() {
            let parent_id = queue[head];
            head += 1;
            let Some(children_of) = children.get(&parent_id) else {
                continue;
            };
            let Some(parent_matrix) = world.get::<GlobalTransform>(parent_id).map(|g| g.0) else {
                continue;
            };
            for &child in children_of {
                let Some(local) = world.get::<Transform>(child).copied() else {
                    continue;
                };
                world.insert(child, GlobalTransform(parent_matrix * local.to_mat4()));
                queue.push(child);
            }
        }
    }
}
