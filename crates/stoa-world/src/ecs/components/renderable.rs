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

use stoa_core::contract::{MaterialHandle, MeshHandle};

use crate::ecs::Component;

/// Marks an entity as drawable.
///
/// The render submission pass turns every visible `Renderable` with a
/// [`GlobalTransform`](super::GlobalTransform) into one draw call. The
/// handles come from whichever render backend is active; they go stale when
/// that backend is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    /// Geometry to draw.
    pub mesh: MeshHandle,
    /// Material to draw it with.
    pub material: MaterialHandle,
    /// Invisible entities are skipped, not submitted.
    pub visible: bool,
    /// Submission layer; lower layers draw first.
    pub layer: u8,
}

impl Component for Renderable {}

impl Renderable {
    /// Creates a visible renderable on layer 0.
    pub fn new(mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self {
            mesh,
            material,
            visible: true,
            layer: 0,
        }
    }
}
