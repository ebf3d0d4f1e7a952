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

use glam::Vec3;
use stoa_core::contract::LightKind;

use crate::ecs::Component;

/// Attaches a light source to an entity.
///
/// Position and direction come from the entity's
/// [`GlobalTransform`](super::GlobalTransform); the lighting pass combines
/// the two into the frame's light set. Disabled lights are not collected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Directional, point, or spot.
    pub kind: LightKind,
    /// Linear RGB color.
    pub color: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Effective range; ignored for directional lights.
    pub range: f32,
    /// Whether the lighting pass collects this light.
    pub enabled: bool,
}

impl Component for Light {}

impl Light {
    /// Creates an enabled white light of the given kind.
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            color: Vec3::ONE,
            intensity: 1.0,
            range: 10.0,
            enabled: true,
        }
    }

    /// A sun-like directional light.
    pub fn directional() -> Self {
        Self::new(LightKind::Directional)
    }

    /// An omnidirectional point light.
    pub fn point() -> Self {
        Self::new(LightKind::Point)
    }

    /// A cone spot light.
    pub fn spot() -> Self {
        Self::new(LightKind::Spot)
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::directional()
    }
}
