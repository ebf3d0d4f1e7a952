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

//! # Stoa Backends
//!
//! Headless reference providers for the engine's capability contracts: a
//! renderer that records instead of drawing, gravity-only physics, a
//! worker-thread asset station, and a bookkeeping audio device. Each
//! provider ships with a module wrapper that publishes its facade during
//! startup, so a host can get a fully wired engine without a GPU, an audio
//! device, or a scripting VM attached.

#![warn(missing_docs)]

mod arena;

pub mod asset;
pub mod audio;
pub mod physics;
pub mod render;

pub use asset::{AssetModule, AssetStation};
pub use audio::{AudioModule, NullAudioBackend};
pub use physics::{KinematicPhysicsBackend, PhysicsModule};
pub use render::{HeadlessRenderBackend, RenderModule};
