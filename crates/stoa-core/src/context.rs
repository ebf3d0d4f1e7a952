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

//! Contexts handed to modules at each lifecycle stage.
//!
//! The world slot is type-erased so this crate does not depend on the world
//! crate; modules downcast through [`HostContext::world_mut`] and friends.

use std::any::Any;
use std::sync::Arc;

use crate::capability::{CapabilityRegistry, StagedCapability};
use crate::error::RuntimeError;

/// A request a module raises against the engine during its update.
///
/// Requests are collected per frame and acted on at the frame boundary:
/// stop at the top of the next iteration, reloads before the next update
/// phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Stop the engine loop.
    Stop,
    /// Hot-reload the named module.
    Reload(String),
}

/// Context for [`Module::initialize`](crate::Module::initialize).
///
/// Capability lookups go against the live registry (dependency order
/// guarantees a module's dependencies have already published). Capability
/// publications are staged and applied by the registry owner only when the
/// initialize succeeds.
pub struct HostContext<'a> {
    module: &'a str,
    capabilities: &'a mut CapabilityRegistry,
    staged: Vec<StagedCapability>,
    world: Option<&'a mut dyn Any>,
    config: &'a serde_json::Value,
}

impl<'a> HostContext<'a> {
    /// Builds the context for one module's initialize call.
    pub fn new(
        module: &'a str,
        capabilities: &'a mut CapabilityRegistry,
        world: Option<&'a mut dyn Any>,
        config: &'a serde_json::Value,
    ) -> Self {
        Self {
            module,
            capabilities,
            staged: Vec::new(),
            world,
            config,
        }
    }

    /// The name of the module being initialized.
    #[must_use]
    pub fn module_name(&self) -> &str {
        self.module
    }

    /// The module's section of the engine configuration, `Null` when the
    /// configuration has no section for it. Passed through unexamined.
    #[must_use]
    pub fn config(&self) -> &serde_json::Value {
        self.config
    }

    /// Mutable access to the world store, downcast to `W`.
    pub fn world_mut<W: Any>(&mut self) -> Option<&mut W> {
        self.world
            .as_deref_mut()
            .and_then(|world| world.downcast_mut::<W>())
    }

    /// Resolves a mandatory capability. A module that cannot run without it
    /// propagates the error out of its own `initialize`.
    pub fn get<C>(&mut self) -> Result<Arc<C>, RuntimeError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.get::<C>()
    }

    /// Probes for an optional capability without failing.
    #[must_use]
    pub fn is_available<C>(&self) -> bool
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.is_available::<C>()
    }

    /// Stages `instance` as this module's provider for `C`.
    ///
    /// Visible to other modules only once this initialize returns `Ok`.
    pub fn provide<C>(&mut self, instance: Arc<C>)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.staged.push(StagedCapability::instance(instance));
    }

    /// Stages a lazy factory as this module's provider for `C`.
    pub fn provide_factory<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.staged.push(StagedCapability::factory(factory));
    }

    /// Consumes the context, yielding the staged publications for the
    /// registry owner to apply (on success) or drop (on failure).
    #[must_use]
    pub fn into_staged(self) -> Vec<StagedCapability> {
        self.staged
    }
}

/// Context for [`Module::update`](crate::Module::update).
pub struct FrameContext<'a> {
    capabilities: &'a mut CapabilityRegistry,
    world: Option<&'a mut dyn Any>,
    requests: &'a mut Vec<ControlRequest>,
}

impl<'a> FrameContext<'a> {
    /// Builds the context for one module's update call.
    pub fn new(
        capabilities: &'a mut CapabilityRegistry,
        world: Option<&'a mut dyn Any>,
        requests: &'a mut Vec<ControlRequest>,
    ) -> Self {
        Self {
            capabilities,
            world,
            requests,
        }
    }

    /// Mutable access to the world store, downcast to `W`.
    pub fn world_mut<W: Any>(&mut self) -> Option<&mut W> {
        self.world
            .as_deref_mut()
            .and_then(|world| world.downcast_mut::<W>())
    }

    /// Resolves a capability, realizing a pending factory if needed.
    ///
    /// Resolve on each use; a handle cached across frames goes stale when
    /// the provider is reloaded.
    pub fn get<C>(&mut self) -> Result<Arc<C>, RuntimeError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.get::<C>()
    }

    /// Probes for an optional capability without failing.
    #[must_use]
    pub fn is_available<C>(&self) -> bool
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.is_available::<C>()
    }

    /// Replacement counter for `C`; compare against a remembered value to
    /// notice a provider swap.
    #[must_use]
    pub fn epoch<C>(&self) -> u64
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.epoch::<C>()
    }

    /// Requests an engine stop, honored at the top of the next loop
    /// iteration.
    pub fn request_stop(&mut self) {
        self.requests.push(ControlRequest::Stop);
    }

    /// Requests a hot-reload of `module`, applied at the next frame
    /// boundary. Never applied mid-frame, so a module may safely request
    /// its own reload.
    pub fn request_reload(&mut self, module: impl Into<String>) {
        self.requests.push(ControlRequest::Reload(module.into()));
    }
}

/// Context for [`Module::render`](crate::Module::render).
///
/// Read-only by construction: the render phase must not mutate the world or
/// install providers.
pub struct RenderContext<'a> {
    capabilities: &'a CapabilityRegistry,
    world: Option<&'a dyn Any>,
}

impl<'a> RenderContext<'a> {
    /// Builds the context for one module's render call.
    pub fn new(capabilities: &'a CapabilityRegistry, world: Option<&'a dyn Any>) -> Self {
        Self {
            capabilities,
            world,
        }
    }

    /// Shared access to the world store, downcast to `W`.
    #[must_use]
    pub fn world<W: Any>(&self) -> Option<&W> {
        self.world.and_then(|world| world.downcast_ref::<W>())
    }

    /// Resolves a capability without realizing factories.
    #[must_use]
    pub fn try_get<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.try_get::<C>()
    }

    /// Probes for an optional capability without failing.
    #[must_use]
    pub fn is_available<C>(&self) -> bool
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.is_available::<C>()
    }
}
