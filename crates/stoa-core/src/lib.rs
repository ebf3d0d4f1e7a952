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

//! # Stoa Core
//!
//! Foundational crate containing the module lifecycle contract, the
//! capability registry, and the narrow interface contracts through which
//! pluggable subsystems (renderer, physics, assets, audio, scripting) are
//! composed.

#![warn(missing_docs)]

pub mod capability;
pub mod context;
pub mod contract;
pub mod error;
pub mod event;
pub mod graph;
pub mod module;

pub use capability::{CapabilityRegistry, CapabilitySnapshot};
pub use context::{ControlRequest, FrameContext, HostContext, RenderContext};
pub use error::{BoxedError, RuntimeError};
pub use module::{Module, ModuleDescriptor, Version, API_VERSION};
