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

//! Gravity integration over sphere bodies, no collision response.

use std::any::Any;
use std::sync::{Arc, Mutex};

use glam::Vec3;
use log::{debug, info, warn};

use stoa_core::contract::{Body, BodyDesc, BodyHandle, BodyType, PhysicsBackend, Pose, RayHit};
use stoa_core::{BoxedError, HostContext, Module, ModuleDescriptor, Version, API_VERSION};

use crate::arena::HandleArena;

/// Physics provider that integrates dynamic bodies under gravity with
/// semi-implicit Euler and answers ray queries against their collision
/// spheres. There is no contact resolution; bodies pass through each other.
///
/// Integration is force-free, so body mass is recorded by the contract but
/// never consulted here.
pub struct KinematicPhysicsBackend {
    state: Mutex<PhysicsState>,
}

struct PhysicsState {
    bodies: HandleArena<Body, BodyState>,
    gravity: Vec3,
}

struct BodyState {
    body_type: BodyType,
    position: Vec3,
    rotation: glam::Quat,
    velocity: Vec3,
    radius: f32,
}

impl Default for KinematicPhysicsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KinematicPhysicsBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PhysicsState {
                bodies: HandleArena::default(),
                gravity: Vec3::new(0.0, -9.81, 0.0),
            }),
        }
    }
}

impl PhysicsBackend for KinematicPhysicsBackend {
    fn step(&self, dt: f32) {
        let mut state = self.state.lock().unwrap();
        let gravity = state.gravity;
        for (_, body) in state.bodies.iter_mut() {
            if body.body_type != BodyType::Dynamic {
                continue;
            }
            body.velocity += gravity * dt;
            body.position += body.velocity * dt;
        }
    }

    fn set_gravity(&self, gravity: Vec3) {
        self.state.lock().unwrap().gravity = gravity;
    }

    fn gravity(&self) -> Vec3 {
        self.state.lock().unwrap().gravity
    }

    fn create_body(&self, desc: &BodyDesc) -> BodyHandle {
        let mut state = self.state.lock().unwrap();
        debug!(
            "Body created ({:?} at {:?}, radius {})",
            desc.body_type, desc.position, desc.radius
        );
        state.bodies.insert(BodyState {
            body_type: desc.body_type,
            position: desc.position,
            rotation: desc.rotation,
            velocity: desc.velocity,
            radius: desc.radius,
        })
    }

    fn destroy_body(&self, handle: BodyHandle) {
        let mut state = self.state.lock().unwrap();
        state.bodies.remove(handle);
    }

    fn body_pose(&self, handle: BodyHandle) -> Option<Pose> {
        let state = self.state.lock().unwrap();
        state.bodies.get(handle).map(|body| Pose {
            position: body.position,
            rotation: body.rotation,
        })
    }

    fn set_body_pose(&self, handle: BodyHandle, pose: Pose) {
        let mut state = self.state.lock().unwrap();
        if let Some(body) = state.bodies.get_mut(handle) {
            body.position = pose.position;
            body.rotation = pose.rotation;
        }
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let state = self.state.lock().unwrap();
        let mut best: Option<RayHit> = None;
        for (handle, body) in state.bodies.iter() {
            let to_center = body.position - origin;
            let along = to_center.dot(direction);
            let closest_sq = to_center.length_squared() - along * along;
            let radius_sq = body.radius * body.radius;
            if closest_sq > radius_sq {
                continue;
            }
            let half_chord = (radius_sq - closest_sq).sqrt();
            // Entry point, or the exit point when the origin is inside.
            let mut distance = along - half_chord;
            if distance < 0.0 {
                distance = along + half_chord;
            }
            if distance < 0.0 || distance > max_distance {
                continue;
            }
            if best.map_or(true, |hit| distance < hit.distance) {
                best = Some(RayHit {
                    body: handle,
                    distance,
                    point: origin + direction * distance,
                });
            }
        }
        best
    }

    fn body_count(&self) -> usize {
        self.state.lock().unwrap().bodies.len()
    }
}

/// Module wrapper that publishes a [`KinematicPhysicsBackend`] as the
/// physics capability.
///
/// Reads an optional `"gravity": [x, y, z]` entry from its configuration
/// section; anything else falls back to standard gravity.
#[derive(Default)]
pub struct PhysicsModule {
    backend: Option<Arc<KinematicPhysicsBackend>>,
}

impl PhysicsModule {
    /// Descriptor under which this module registers.
    #[must_use]
    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new(
            "physics",
            Version::new(0, 1, 0),
            API_VERSION,
            "create_physics",
        )
    }

    /// Factory matching the descriptor's entry point.
    #[must_use]
    pub fn create() -> Box<dyn Module> {
        Box::<Self>::default()
    }
}

impl Module for PhysicsModule {
    fn name(&self) -> &str {
        "physics"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn initialize(&mut self, host: &mut HostContext<'_>) -> Result<(), BoxedError> {
        let backend = Arc::new(KinematicPhysicsBackend::new());
        if let Some(value) = host.config().get("gravity") {
            match serde_json::from_value::<[f32; 3]>(value.clone()) {
                Ok([x, y, z]) => backend.set_gravity(Vec3::new(x, y, z)),
                Err(error) => warn!("Ignoring malformed gravity in physics config: {error}"),
            }
        }
        info!("Kinematic physics online (gravity {:?})", backend.gravity());
        host.provide::<dyn PhysicsBackend>(Arc::clone(&backend) as Arc<dyn PhysicsBackend>);
        self.backend = Some(backend);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.backend = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use glam::Quat;

    use stoa_core::CapabilityRegistry;

    fn static_sphere(position: Vec3) -> BodyDesc {
        BodyDesc {
            body_type: BodyType::Static,
            position,
            ..BodyDesc::default()
        }
    }

    #[test]
    fn test_dynamic_bodies_fall_under_gravity() {
        let backend = KinematicPhysicsBackend::new();
        let body = backend.create_body(&BodyDesc {
            position: Vec3::new(0.0, 10.0, 0.0),
            ..BodyDesc::default()
        });

        for _ in 0..60 {
            backend.step(1.0 / 60.0);
        }

        let pose = backend.body_pose(body).unwrap();
        assert!(
            pose.position.y > 4.0 && pose.position.y < 6.0,
            "one second of free fall from y=10 should land near y=5, got {}",
            pose.position.y
        );
        assert_eq!(pose.position.x, 0.0);
        assert_eq!(pose.position.z, 0.0);
    }

    #[test]
    fn test_kinematic_and_static_bodies_hold_their_pose() {
        let backend = KinematicPhysicsBackend::new();
        let driven = backend.create_body(&BodyDesc {
            body_type: BodyType::Kinematic,
            position: Vec3::new(1.0, 2.0, 3.0),
            velocity: Vec3::ONE,
            ..BodyDesc::default()
        });
        let fixed = backend.create_body(&static_sphere(Vec3::Y));

        backend.step(1.0);

        assert_eq!(
            backend.body_pose(driven).unwrap().position,
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(backend.body_pose(fixed).unwrap().position, Vec3::Y);
    }

    #[test]
    fn test_set_body_pose_drives_a_kinematic_body() {
        let backend = KinematicPhysicsBackend::new();
        let driven = backend.create_body(&BodyDesc {
            body_type: BodyType::Kinematic,
            ..BodyDesc::default()
        });

        let pose = Pose {
            position: Vec3::new(4.0, 0.0, -2.0),
            rotation: Quat::from_rotation_y(1.0),
        };
        backend.set_body_pose(driven, pose);

        assert_eq!(backend.body_pose(driven), Some(pose));
    }

    #[test]
    fn test_raycast_reports_the_closest_hit() {
        let backend = KinematicPhysicsBackend::new();
        let near = backend.create_body(&static_sphere(Vec3::new(5.0, 0.0, 0.0)));
        let _far = backend.create_body(&static_sphere(Vec3::new(10.0, 0.0, 0.0)));

        let hit = backend.raycast(Vec3::ZERO, Vec3::X, 100.0).unwrap();

        assert_eq!(hit.body, near);
        assert!((hit.distance - 4.5).abs() < 1e-4, "distance {}", hit.distance);
        assert!((hit.point - Vec3::new(4.5, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_raycast_respects_range_and_direction() {
        let backend = KinematicPhysicsBackend::new();
        backend.create_body(&static_sphere(Vec3::new(5.0, 0.0, 0.0)));

        assert!(backend.raycast(Vec3::ZERO, Vec3::X, 3.0).is_none());
        assert!(backend.raycast(Vec3::ZERO, Vec3::NEG_X, 100.0).is_none());
        assert!(backend.raycast(Vec3::ZERO, Vec3::ZERO, 100.0).is_none());
    }

    #[test]
    fn test_rays_starting_inside_a_sphere_hit_the_exit() {
        let backend = KinematicPhysicsBackend::new();
        backend.create_body(&static_sphere(Vec3::new(5.0, 0.0, 0.0)));

        let hit = backend
            .raycast(Vec3::new(5.0, 0.0, 0.0), Vec3::X, 10.0)
            .unwrap();

        assert!((hit.distance - 0.5).abs() < 1e-4, "distance {}", hit.distance);
    }

    #[test]
    fn test_destroyed_bodies_stop_simulating() {
        let backend = KinematicPhysicsBackend::new();
        let body = backend.create_body(&BodyDesc::default());

        backend.destroy_body(body);
        backend.destroy_body(body);

        assert_eq!(backend.body_pose(body), None);
        assert_eq!(backend.body_count(), 0);
        assert!(backend
            .raycast(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 100.0)
            .is_none());
    }

    #[test]
    fn test_module_reads_gravity_from_config() {
        let mut capabilities = CapabilityRegistry::new();
        let config = serde_json::json!({ "gravity": [0.0, -1.0, 0.0] });
        let mut module = PhysicsModule::default();

        let mut host = HostContext::new("physics", &mut capabilities, None, &config);
        module.initialize(&mut host).unwrap();
        for staged in host.into_staged() {
            capabilities.apply(staged);
        }

        let physics = capabilities.get::<dyn PhysicsBackend>().unwrap();
        assert_eq!(physics.gravity(), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_module_falls_back_to_standard_gravity() {
        let mut capabilities = CapabilityRegistry::new();
        let config = serde_json::json!({ "gravity": "down" });
        let mut module = PhysicsModule::default();

        let mut host = HostContext::new("physics", &mut capabilities, None, &config);
        module.initialize(&mut host).unwrap();
        for staged in host.into_staged() {
            capabilities.apply(staged);
        }

        let physics = capabilities.get::<dyn PhysicsBackend>().unwrap();
        assert_eq!(physics.gravity(), Vec3::new(0.0, -9.81, 0.0));
    }
}
