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

//! # Stoa Runtime
//!
//! The orchestration crate. It owns the module registry (registration,
//! dependency-ordered initialization, per-frame dispatch, hot-reload,
//! shutdown), the fixed pass pipeline that runs over the world each frame,
//! and the [`Engine`] loop that ties registry, scheduler, world, and
//! capability registry together into a single-threaded tick.

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod events;
pub mod passes;
pub mod registry;
pub mod scheduler;

pub use clock::FrameClock;
pub use config::{ConfigError, EngineConfig};
pub use discovery::{discover_descriptors, DescriptorError, ModuleCatalog};
pub use engine::Engine;
pub use events::EngineEvent;
pub use registry::{FramePhase, ModuleFailure, ModuleRegistry, ModuleState};
pub use scheduler::{System, SystemScheduler};
