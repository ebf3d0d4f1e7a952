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

//! The renderer contract: frame bracketing, resource arenas, submission.

use glam::{Mat4, Vec3, Vec4};

use super::handle::Handle;

/// Marker for mesh resources.
pub enum Mesh {}
/// Marker for texture resources.
pub enum Texture {}
/// Marker for material resources.
pub enum Material {}

/// Handle to a mesh owned by the active render backend.
pub type MeshHandle = Handle<Mesh>;
/// Handle to a texture owned by the active render backend.
pub type TextureHandle = Handle<Texture>;
/// Handle to a material owned by the active render backend.
pub type MaterialHandle = Handle<Material>;

/// Geometry uploaded at mesh creation.
#[derive(Debug, Clone, Default)]
pub struct MeshDesc {
    /// Debug label, surfaced in diagnostics.
    pub label: Option<String>,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

/// Pixel formats a backend is required to understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureFormat {
    /// 8-bit RGBA, linear.
    #[default]
    Rgba8Unorm,
    /// 8-bit BGRA, linear.
    Bgra8Unorm,
    /// 32-bit float depth.
    Depth32Float,
}

/// Texture creation parameters.
#[derive(Debug, Clone, Default)]
pub struct TextureDesc {
    /// Debug label, surfaced in diagnostics.
    pub label: Option<String>,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Texel format.
    pub format: TextureFormat,
}

/// Material creation parameters.
#[derive(Debug, Clone)]
pub struct MaterialDesc {
    /// Debug label, surfaced in diagnostics.
    pub label: Option<String>,
    /// Base color factor, RGBA.
    pub base_color: Vec4,
    /// Optional base color texture.
    pub texture: Option<TextureHandle>,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            label: None,
            base_color: Vec4::ONE,
            texture: None,
        }
    }
}

/// One draw submitted between `begin_frame` and `end_frame`.
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand {
    /// The geometry to draw.
    pub mesh: MeshHandle,
    /// The material to draw it with.
    pub material: MaterialHandle,
    /// Object-to-world transform.
    pub transform: Mat4,
    /// Submission layer; lower layers draw first.
    pub layer: u8,
}

/// The kinds of light the lighting pass collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Infinitely distant light with a direction only.
    Directional,
    /// Omnidirectional point light with a range.
    Point,
    /// Cone light with a direction and range.
    Spot,
}

/// A light as submitted for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameLight {
    /// Light kind.
    pub kind: LightKind,
    /// Linear RGB color.
    pub color: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Effective range; ignored for directional lights.
    pub range: f32,
    /// World-space position; ignored for directional lights.
    pub position: Vec3,
    /// World-space direction; ignored for point lights.
    pub direction: Vec3,
}

/// Counters reported when a frame ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames completed so far, this one included.
    pub frame_index: u64,
    /// Draw commands submitted this frame.
    pub draw_calls: u32,
    /// Size of the retained light set at frame end.
    pub lights: u32,
}

/// Live resource totals, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceCounts {
    /// Meshes currently alive.
    pub meshes: usize,
    /// Textures currently alive.
    pub textures: usize,
    /// Materials currently alive.
    pub materials: usize,
}

/// The rendering capability: frame bracketing, resource create/destroy, and
/// draw submission.
///
/// Looked up as `dyn RenderBackend`. Submission order within a frame is
/// preserved per layer.
pub trait RenderBackend: Send + Sync {
    /// A short name identifying the backend implementation.
    fn backend_name(&self) -> &str;

    /// Opens the frame. Submissions before this call are discarded.
    fn begin_frame(&self);

    /// Closes the frame and reports its counters.
    fn end_frame(&self) -> FrameStats;

    /// Creates a mesh and returns its handle.
    fn create_mesh(&self, desc: &MeshDesc) -> MeshHandle;

    /// Destroys a mesh. Stale or unknown handles are ignored.
    fn destroy_mesh(&self, handle: MeshHandle);

    /// Creates a texture and returns its handle.
    fn create_texture(&self, desc: &TextureDesc) -> TextureHandle;

    /// Destroys a texture. Stale or unknown handles are ignored.
    fn destroy_texture(&self, handle: TextureHandle);

    /// Creates a material and returns its handle.
    fn create_material(&self, desc: &MaterialDesc) -> MaterialHandle;

    /// Destroys a material. Stale or unknown handles are ignored.
    fn destroy_material(&self, handle: MaterialHandle);

    /// Submits one draw for the open frame.
    fn submit(&self, command: &DrawCommand);

    /// Replaces the retained light set.
    ///
    /// Lights persist across frames until the next call; `begin_frame` clears
    /// draw submissions only.
    fn submit_lights(&self, lights: &[FrameLight]);

    /// Reports the counters of the most recently completed frame.
    fn last_frame_stats(&self) -> FrameStats;

    /// Reports live resource totals.
    fn resource_counts(&self) -> ResourceCounts;
}
