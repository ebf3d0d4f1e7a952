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

//! The module lifecycle contract and its static metadata.

pub mod descriptor;
pub mod version;

pub use descriptor::{DescriptorValidationError, ModuleDescriptor};
pub use version::{Version, VersionParseError};

use std::any::Any;
use std::time::Duration;

use crate::context::{FrameContext, HostContext, RenderContext};
use crate::error::BoxedError;

/// The host ABI revision this runtime supports.
///
/// A descriptor whose `api_version` differs is refused at registration time.
pub const API_VERSION: u32 = 1;

/// The lifecycle contract every module implements.
///
/// A module is an independently loadable unit. It may publish one or more
/// capability facades during [`initialize`](Module::initialize) and consume
/// capabilities published by the modules it depends on. All methods are
/// invoked from the main thread; a module that owns worker threads must
/// confine their results to its own `update` (the per-frame sync point).
pub trait Module: Send {
    /// Returns the module's unique name. Must match its descriptor.
    fn name(&self) -> &str;

    /// Returns the module's own semantic version.
    fn version(&self) -> Version;

    /// Names of modules that must initialize before this one.
    ///
    /// Informational at runtime; the registry orders modules by the
    /// descriptor's dependency list, which is the authoritative copy.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Prepares the module for use: acquire resources, look up mandatory
    /// capabilities, publish own capability facades through `host`.
    ///
    /// Capabilities provided here become visible to other modules only once
    /// this method returns `Ok`; on `Err` they are discarded along with the
    /// instance.
    fn initialize(&mut self, host: &mut HostContext<'_>) -> Result<(), BoxedError>;

    /// Releases everything `initialize` acquired. Called exactly once per
    /// instance, in reverse dependency order, or immediately after a failed
    /// startup for the instances that did initialize.
    fn shutdown(&mut self);

    /// Hook invoked on the fresh instance after a successful hot-reload
    /// swap, once its `initialize` has succeeded and its capabilities are
    /// re-published. Default is a no-op.
    fn on_reload(&mut self) {}

    /// Per-frame logic step. Default is a no-op that succeeds.
    ///
    /// Returning `Err` unloads the module; the frame continues for the
    /// remaining modules.
    fn update(&mut self, frame: &mut FrameContext<'_>, dt: Duration) -> Result<(), BoxedError> {
        let _ = (frame, dt);
        Ok(())
    }

    /// Per-frame render step, after all update passes. Must not mutate the
    /// world. Default is a no-op that succeeds.
    fn render(&mut self, frame: &mut RenderContext<'_>) -> Result<(), BoxedError> {
        let _ = frame;
        Ok(())
    }

    /// Allows downcasting to concrete module types.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to concrete module types.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
