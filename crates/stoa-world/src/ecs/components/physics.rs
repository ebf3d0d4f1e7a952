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

use stoa_core::contract::{BodyHandle, BodyType};

use crate::ecs::Component;

/// Ties an entity to a body owned by the active physics backend.
///
/// After each simulation step the physics pass copies the body's pose back
/// into the entity's [`Transform`](super::Transform), for dynamic bodies
/// only; kinematic and static bodies keep the entity as the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigidBodyRef {
    /// The backend body this entity mirrors.
    pub body: BodyHandle,
    /// Simulation role, mirrored from the body's creation parameters.
    pub body_type: BodyType,
}

impl Component for RigidBodyRef {}

impl RigidBodyRef {
    /// Creates a reference to a dynamic body.
    pub fn dynamic(body: BodyHandle) -> Self {
        Self {
            body,
            body_type: BodyType::Dynamic,
        }
    }

    /// Creates a reference to a kinematic body.
    pub fn kinematic(body: BodyHandle) -> Self {
        Self {
            body,
            body_type: BodyType::Kinematic,
        }
    }
}
