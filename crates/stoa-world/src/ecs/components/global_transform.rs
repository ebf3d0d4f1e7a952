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

use glam::{Mat4, Vec3};

use crate::ecs::Component;

/// An entity's resolved world-space matrix.
///
/// Written by the transform pass as it folds [`Transform`](super::Transform)
/// values down the [`Parent`](super::Parent) hierarchy. Treat it as
/// read-only everywhere else; a hand-written value survives only until the
/// next transform pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform(pub Mat4);

impl Component for GlobalTransform {}

impl GlobalTransform {
    /// The identity matrix.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    /// Creates a global transform that is a pure translation.
    pub fn at_position(position: Vec3) -> Self {
        Self(Mat4::from_translation(position))
    }

    /// The world-space translation column.
    pub fn position(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
