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

//! Narrow interface contracts for pluggable subsystems.
//!
//! Each contract is an object-safe trait looked up in the capability
//! registry by its trait-object identity (`dyn RenderBackend`, ...). One
//! active provider per contract at a time. Methods take `&self`; providers
//! use interior mutability so a shared facade handle is enough to drive
//! them. Internals of concrete providers are out of scope here.

pub mod asset;
pub mod audio;
pub mod handle;
pub mod physics;
pub mod render;
pub mod script;

pub use asset::{AssetBackend, AssetEvent, AssetId, LoadState, LoadedAsset};
pub use audio::{AudioBackend, Sound, SoundDesc, SoundHandle};
pub use handle::Handle;
pub use physics::{Body, BodyDesc, BodyHandle, BodyType, PhysicsBackend, Pose, RayHit};
pub use render::{
    DrawCommand, FrameLight, FrameStats, LightKind, Material, MaterialDesc, MaterialHandle, Mesh,
    MeshDesc, MeshHandle, RenderBackend, ResourceCounts, Texture, TextureDesc, TextureFormat,
    TextureHandle,
};
pub use script::{Script, ScriptBackend, ScriptHandle};
