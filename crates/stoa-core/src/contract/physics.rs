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

//! The physics contract: body management, stepping, spatial queries.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::handle::Handle;

/// Marker for physics bodies.
pub enum Body {}

/// Handle to a body owned by the active physics backend.
pub type BodyHandle = Handle<Body>;

/// How the simulation treats a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    /// Fully simulated; the backend owns its pose.
    #[default]
    Dynamic,
    /// Driven from outside; the backend reads its pose but never writes it.
    Kinematic,
    /// Never moves.
    Static,
}

/// Body creation parameters.
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    /// Simulation role.
    pub body_type: BodyType,
    /// Initial world-space position.
    pub position: Vec3,
    /// Initial world-space rotation.
    pub rotation: Quat,
    /// Initial linear velocity.
    pub velocity: Vec3,
    /// Mass in kilograms; ignored for static bodies.
    pub mass: f32,
    /// Collision sphere radius.
    pub radius: f32,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            mass: 1.0,
            radius: 0.5,
        }
    }
}

/// A body's world-space placement after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation.
    pub rotation: Quat,
}

/// The closest intersection found by a raycast.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The body that was hit.
    pub body: BodyHandle,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// The physics capability: body lifecycle, stepping, and spatial queries.
///
/// Looked up as `dyn PhysicsBackend`. Poses written back after a step are
/// authoritative for dynamic bodies only.
pub trait PhysicsBackend: Send + Sync {
    /// Advances the simulation by `dt` seconds.
    fn step(&self, dt: f32);

    /// Replaces the global gravity vector.
    fn set_gravity(&self, gravity: Vec3);

    /// Reports the current gravity vector.
    fn gravity(&self) -> Vec3;

    /// Creates a body and returns its handle.
    fn create_body(&self, desc: &BodyDesc) -> BodyHandle;

    /// Destroys a body. Stale or unknown handles are ignored.
    fn destroy_body(&self, handle: BodyHandle);

    /// Reads a body's pose, or `None` for stale handles.
    fn body_pose(&self, handle: BodyHandle) -> Option<Pose>;

    /// Writes a body's pose. Used to drive kinematic bodies.
    fn set_body_pose(&self, handle: BodyHandle, pose: Pose);

    /// Casts a ray and reports the closest hit within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Bodies currently alive.
    fn body_count(&self) -> usize;
}
