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

//! A renderer that records instead of drawing.

use std::any::Any;
use std::sync::{Arc, Mutex};

use log::{debug, info};

use stoa_core::contract::{
    DrawCommand, FrameLight, FrameStats, Material, MaterialDesc, MaterialHandle, Mesh, MeshDesc,
    MeshHandle, RenderBackend, ResourceCounts, Texture, TextureDesc, TextureHandle,
};
use stoa_core::{BoxedError, HostContext, Module, ModuleDescriptor, Version, API_VERSION};

use crate::arena::HandleArena;

/// Render provider that runs the full submission protocol against in-memory
/// arenas with nothing behind them.
///
/// Descriptors are retained verbatim, draws are counted per frame, and the
/// light set persists between frames, so systems and tests observe the same
/// protocol a GPU renderer would enforce.
#[derive(Default)]
pub struct HeadlessRenderBackend {
    state: Mutex<RenderState>,
}

#[derive(Default)]
struct RenderState {
    meshes: HandleArena<Mesh, MeshDesc>,
    textures: HandleArena<Texture, TextureDesc>,
    materials: HandleArena<Material, MaterialDesc>,
    frame_open: bool,
    draws: Vec<DrawCommand>,
    lights: Vec<FrameLight>,
    frames_completed: u64,
    last_stats: FrameStats,
}

impl HeadlessRenderBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for HeadlessRenderBackend {
    fn backend_name(&self) -> &str {
        "headless"
    }

    fn begin_frame(&self) {
        let mut state = self.state.lock().unwrap();
        state.frame_open = true;
        state.draws.clear();
    }

    fn end_frame(&self) -> FrameStats {
        let mut state = self.state.lock().unwrap();
        state.frames_completed += 1;
        let stats = FrameStats {
            frame_index: state.frames_completed,
            draw_calls: state.draws.len() as u32,
            lights: state.lights.len() as u32,
        };
        state.last_stats = stats;
        state.frame_open = false;
        stats
    }

    fn create_mesh(&self, desc: &MeshDesc) -> MeshHandle {
        let mut state = self.state.lock().unwrap();
        debug!(
            "Mesh '{}' created ({} vertices, {} indices)",
            desc.label.as_deref().unwrap_or("unnamed"),
            desc.positions.len(),
            desc.indices.len()
        );
        state.meshes.insert(desc.clone())
    }

    fn destroy_mesh(&self, mesh: MeshHandle) {
        let mut state = self.state.lock().unwrap();
        state.meshes.remove(mesh);
    }

    fn create_texture(&self, desc: &TextureDesc) -> TextureHandle {
        let mut state = self.state.lock().unwrap();
        debug!(
            "Texture '{}' created ({}x{}, {:?})",
            desc.label.as_deref().unwrap_or("unnamed"),
            desc.width,
            desc.height,
            desc.format
        );
        state.textures.insert(desc.clone())
    }

    fn destroy_texture(&self, texture: TextureHandle) {
        let mut state = self.state.lock().unwrap();
        state.textures.remove(texture);
    }

    fn create_material(&self, desc: &MaterialDesc) -> MaterialHandle {
        let mut state = self.state.lock().unwrap();
        state.materials.insert(desc.clone())
    }

    fn destroy_material(&self, material: MaterialHandle) {
        let mut state = self.state.lock().unwrap();
        state.materials.remove(material);
    }

    fn submit(&self, command: &DrawCommand) {
        let mut state = self.state.lock().unwrap();
        if !state.frame_open {
            debug!("Draw submitted outside an open frame, discarded");
            return;
        }
        if !state.meshes.contains(command.mesh) || !state.materials.contains(command.material) {
            debug!("Draw references a dead mesh or material handle, discarded");
            return;
        }
        state.draws.push(*command);
    }

    fn submit_lights(&self, lights: &[FrameLight]) {
        let mut state = self.state.lock().unwrap();
        state.lights = lights.to_vec();
    }

    fn last_frame_stats(&self) -> FrameStats {
        self.state.lock().unwrap().last_stats
    }

    fn resource_counts(&self) -> ResourceCounts {
        let state = self.state.lock().unwrap();
        ResourceCounts {
            meshes: state.meshes.len(),
            textures: state.textures.len(),
            materials: state.materials.len(),
        }
    }
}

/// Module wrapper that publishes a [`HeadlessRenderBackend`] as the render
/// capability.
#[derive(Default)]
pub struct RenderModule {
    backend: Option<Arc<HeadlessRenderBackend>>,
}

impl RenderModule {
    /// Descriptor under which this module registers.
    #[must_use]
    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new(
            "renderer",
            Version::new(0, 1, 0),
            API_VERSION,
            "create_renderer",
        )
    }

    /// Factory matching the descriptor's entry point.
    #[must_use]
    pub fn create() -> Box<dyn Module> {
        Box::<Self>::default()
    }
}

impl Module for RenderModule {
    fn name(&self) -> &str {
        "renderer"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn initialize(&mut self, host: &mut HostContext<'_>) -> Result<(), BoxedError> {
        let backend = Arc::new(HeadlessRenderBackend::new());
        host.provide::<dyn RenderBackend>(Arc::clone(&backend) as Arc<dyn RenderBackend>);
        self.backend = Some(backend);
        info!("Headless renderer online");
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

    use glam::{Mat4, Vec3};

    use stoa_core::contract::LightKind;
    use stoa_core::CapabilityRegistry;

    fn draw(mesh: MeshHandle, material: MaterialHandle) -> DrawCommand {
        DrawCommand {
            mesh,
            material,
            transform: Mat4::IDENTITY,
            layer: 0,
        }
    }

    fn sun() -> FrameLight {
        FrameLight {
            kind: LightKind::Directional,
            color: Vec3::ONE,
            intensity: 1.0,
            range: 0.0,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Y,
        }
    }

    #[test]
    fn test_frame_bracketing_counts_draws() {
        let backend = HeadlessRenderBackend::new();
        let mesh = backend.create_mesh(&MeshDesc::default());
        let material = backend.create_material(&MaterialDesc::default());

        backend.begin_frame();
        backend.submit(&draw(mesh, material));
        backend.submit(&draw(mesh, material));
        let stats = backend.end_frame();

        assert_eq!(stats.frame_index, 1);
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(backend.last_frame_stats(), stats);
    }

    #[test]
    fn test_submissions_outside_a_frame_are_discarded() {
        let backend = HeadlessRenderBackend::new();
        let mesh = backend.create_mesh(&MeshDesc::default());
        let material = backend.create_material(&MaterialDesc::default());

        backend.submit(&draw(mesh, material));
        backend.begin_frame();
        let stats = backend.end_frame();

        assert_eq!(stats.draw_calls, 0);

        backend.submit(&draw(mesh, material));
        backend.begin_frame();
        assert_eq!(backend.end_frame().draw_calls, 0);
    }

    #[test]
    fn test_lights_are_retained_across_frames() {
        let backend = HeadlessRenderBackend::new();

        backend.begin_frame();
        backend.submit_lights(&[sun(), sun()]);
        assert_eq!(backend.end_frame().lights, 2);

        // No resubmission: the retained set carries over.
        backend.begin_frame();
        assert_eq!(backend.end_frame().lights, 2);

        backend.begin_frame();
        backend.submit_lights(&[]);
        assert_eq!(backend.end_frame().lights, 0);
    }

    #[test]
    fn test_draws_with_dead_handles_are_dropped() {
        let backend = HeadlessRenderBackend::new();
        let mesh = backend.create_mesh(&MeshDesc::default());
        let material = backend.create_material(&MaterialDesc::default());
        backend.destroy_mesh(mesh);

        backend.begin_frame();
        backend.submit(&draw(mesh, material));
        let stats = backend.end_frame();

        assert_eq!(stats.draw_calls, 0);
    }

    #[test]
    fn test_resource_counts_track_create_and_destroy() {
        let backend = HeadlessRenderBackend::new();
        let mesh = backend.create_mesh(&MeshDesc::default());
        let _texture = backend.create_texture(&TextureDesc::default());
        let material = backend.create_material(&MaterialDesc::default());

        assert_eq!(
            backend.resource_counts(),
            ResourceCounts {
                meshes: 1,
                textures: 1,
                materials: 1
            }
        );

        backend.destroy_mesh(mesh);
        backend.destroy_mesh(mesh);
        backend.destroy_material(material);

        assert_eq!(
            backend.resource_counts(),
            ResourceCounts {
                meshes: 0,
                textures: 1,
                materials: 0
            }
        );
    }

    #[test]
    fn test_module_publishes_the_render_capability() {
        let mut capabilities = CapabilityRegistry::new();
        let config = serde_json::Value::Null;
        let mut module = RenderModule::default();

        let mut host = HostContext::new("renderer", &mut capabilities, None, &config);
        module.initialize(&mut host).unwrap();
        for staged in host.into_staged() {
            capabilities.apply(staged);
        }

        let renderer = capabilities.get::<dyn RenderBackend>().unwrap();
        assert_eq!(renderer.backend_name(), "headless");

        module.shutdown();
    }
}
