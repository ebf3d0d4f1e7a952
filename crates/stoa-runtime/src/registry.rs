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

//! The module registry: registration, dependency resolution, lifecycle
//! dispatch, and hot-reload.
//!
//! Records move through `Discovered → Resolved → Initialized → Active`,
//! with `Active ⇄ Reloading` for hot-reload and `Shutdown` as the terminal
//! state. A record that reaches `Shutdown` is removed from the registry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};

use stoa_core::graph::stable_topological_sort;
use stoa_core::{
    BoxedError, CapabilityRegistry, ControlRequest, FrameContext, HostContext, Module,
    ModuleDescriptor, RenderContext, RuntimeError, API_VERSION,
};
use stoa_world::World;

use crate::config::EngineConfig;

/// Constructs a fresh module instance. The same factory is reused for
/// hot-reload, so it must be callable more than once.
pub type ModuleFactory = Arc<dyn Fn() -> Box<dyn Module> + Send + Sync>;

/// Where a module sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Descriptor known, no instance exists.
    Discovered,
    /// Dependency order computed and satisfiable.
    Resolved,
    /// Instance constructed and its `initialize` succeeded.
    Initialized,
    /// Steady state, receiving update and render calls.
    Active,
    /// Instance replacement in progress.
    Reloading,
    /// Terminal. Records in this state are removed from the registry.
    Shutdown,
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModuleState::Discovered => "discovered",
            ModuleState::Resolved => "resolved",
            ModuleState::Initialized => "initialized",
            ModuleState::Active => "active",
            ModuleState::Reloading => "reloading",
            ModuleState::Shutdown => "shutdown",
        };
        f.write_str(label)
    }
}

/// The frame phase in which a module failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// The logic phase.
    Update,
    /// The presentation phase.
    Render,
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramePhase::Update => f.write_str("update"),
            FramePhase::Render => f.write_str("render"),
        }
    }
}

/// One module's failure during a frame. The module has already been
/// unloaded by the time the caller sees this.
#[derive(Debug)]
pub struct ModuleFailure {
    /// The module that failed.
    pub module: String,
    /// The phase it failed in.
    pub phase: FramePhase,
    /// The error it reported.
    pub error: BoxedError,
}

/// One registered module: its static metadata, how to build it, and the
/// live instance once initialized.
struct ModuleRecord {
    descriptor: ModuleDescriptor,
    factory: ModuleFactory,
    instance: Option<Box<dyn Module>>,
    state: ModuleState,
    /// Capability identities this instance published, for withdrawal when
    /// the instance goes away.
    published: Vec<(TypeId, &'static str)>,
}

/// Owns every module record and drives the lifecycle over all of them.
///
/// Records are kept in resolved order once
/// [`resolve_order`](ModuleRegistry::resolve_order) has run; update, render,
/// and reverse shutdown all walk the same vector.
#[derive(Default)]
pub struct ModuleRegistry {
    records: Vec<ModuleRecord>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module by descriptor and factory.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateModule`] when the name is taken, and
    /// [`RuntimeError::ApiVersionMismatch`] when the descriptor was built
    /// against a different host ABI revision. Either way the registry is
    /// unchanged.
    pub fn register(
        &mut self,
        descriptor: ModuleDescriptor,
        factory: ModuleFactory,
    ) -> Result<(), RuntimeError> {
        if self
            .records
            .iter()
            .any(|record| record.descriptor.name == descriptor.name)
        {
            return Err(RuntimeError::DuplicateModule {
                module: descriptor.name,
            });
        }
        if descriptor.api_version != API_VERSION {
            return Err(RuntimeError::ApiVersionMismatch {
                module: descriptor.name,
                expected: API_VERSION,
                found: descriptor.api_version,
            });
        }
        debug!(
            "Module '{}' v{} registered",
            descriptor.name, descriptor.version
        );
        self.records.push(ModuleRecord {
            descriptor,
            factory,
            instance: None,
            state: ModuleState::Discovered,
            published: Vec::new(),
        });
        Ok(())
    }

    /// [`register`](Self::register) with a plain closure factory.
    pub fn register_with<F>(
        &mut self,
        descriptor: ModuleDescriptor,
        factory: F,
    ) -> Result<(), RuntimeError>
    where
        F: Fn() -> Box<dyn Module> + Send + Sync + 'static,
    {
        self.register(descriptor, Arc::new(factory))
    }

    /// Computes the dependency-respecting order and reorders the records to
    /// match it. Modules with no ordering constraint between them keep
    /// registration order.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::MissingDependency`] when a declared dependency names
    /// no registered module, [`RuntimeError::DependencyCycle`] when the
    /// declarations cannot be ordered. The registry is left unreordered.
    pub fn resolve_order(&mut self) -> Result<Vec<String>, RuntimeError> {
        for record in &self.records {
            for dependency in &record.descriptor.dependencies {
                if !self
                    .records
                    .iter()
                    .any(|other| &other.descriptor.name == dependency)
                {
                    return Err(RuntimeError::MissingDependency {
                        module: record.descriptor.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let index_of: HashMap<&str, usize> = self
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.descriptor.name.as_str(), index))
            .collect();
        let mut edges = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            for dependency in &record.descriptor.dependencies {
                edges.push((index_of[dependency.as_str()], index));
            }
        }

        let order = stable_topological_sort(0..self.records.len(), edges).map_err(|cycle| {
            RuntimeError::DependencyCycle {
                involved: cycle
                    .remaining
                    .iter()
                    .map(|&index| self.records[index].descriptor.name.clone())
                    .collect(),
            }
        })?;

        let mut slots: Vec<Option<ModuleRecord>> =
            self.records.drain(..).map(Some).collect();
        for &index in &order {
            if let Some(mut record) = slots[index].take() {
                if record.state == ModuleState::Discovered {
                    record.state = ModuleState::Resolved;
                }
                self.records.push(record);
            }
        }

        let names: Vec<String> = self
            .records
            .iter()
            .map(|record| record.descriptor.name.clone())
            .collect();
        debug!("Module order resolved: {}", names.join(" -> "));
        Ok(names)
    }

    /// Constructs and initializes every module in resolved order.
    ///
    /// All-or-nothing: the first failure aborts the sequence, the modules
    /// that had initialized are shut down in reverse order and removed, and
    /// the error is returned. On success every module is `Active`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InitializationFailed`] wrapping the failing module's
    /// own error.
    pub fn initialize_all(
        &mut self,
        world: &mut World,
        capabilities: &mut CapabilityRegistry,
        config: &EngineConfig,
    ) -> Result<(), RuntimeError> {
        for index in 0..self.records.len() {
            let name = self.records[index].descriptor.name.clone();
            let mut instance = (self.records[index].factory)();
            let mut host = HostContext::new(
                &name,
                capabilities,
                Some(&mut *world as &mut dyn Any),
                config.module_section(&name),
            );
            match instance.initialize(&mut host) {
                Ok(()) => {
                    let staged = host.into_staged();
                    let record = &mut self.records[index];
                    for publication in staged {
                        record
                            .published
                            .push((publication.id(), publication.capability()));
                        capabilities.apply(publication);
                    }
                    record.instance = Some(instance);
                    record.state = ModuleState::Initialized;
                    debug!("Module '{name}' initialized");
                }
                Err(source) => {
                    error!("Module '{name}' failed to initialize: {source}");
                    self.rollback_initialized(capabilities);
                    return Err(RuntimeError::InitializationFailed {
                        module: name,
                        source,
                    });
                }
            }
        }

        for record in &mut self.records {
            record.state = ModuleState::Active;
        }
        info!("{} modules initialized and active", self.records.len());
        Ok(())
    }

    /// Calls every `Active` module's update in resolved order.
    ///
    /// A failing module does not abort the frame: the remaining modules
    /// still update, then each failed module is shut down, its published
    /// capabilities are withdrawn, and its record is removed. The failures
    /// are returned for reporting.
    pub fn update_all(
        &mut self,
        world: &mut World,
        capabilities: &mut CapabilityRegistry,
        requests: &mut Vec<ControlRequest>,
        dt: Duration,
    ) -> Vec<ModuleFailure> {
        let mut failures = Vec::new();
        for record in self.records.iter_mut() {
            if record.state != ModuleState::Active {
                continue;
            }
            let Some(instance) = record.instance.as_mut() else {
                continue;
            };
            let mut frame = FrameContext::new(
                &mut *capabilities,
                Some(&mut *world as &mut dyn Any),
                &mut *requests,
            );
            if let Err(error) = instance.update(&mut frame, dt) {
                failures.push(ModuleFailure {
                    module: record.descriptor.name.clone(),
                    phase: FramePhase::Update,
                    error,
                });
            }
        }
        self.unload_failed(&failures, capabilities);
        failures
    }

    /// Calls every `Active` module's render in resolved order, after all
    /// updates have run. Same isolation policy as
    /// [`update_all`](Self::update_all).
    pub fn render_all(
        &mut self,
        world: &World,
        capabilities: &mut CapabilityRegistry,
    ) -> Vec<ModuleFailure> {
        let mut failures = Vec::new();
        for record in self.records.iter_mut() {
            if record.state != ModuleState::Active {
                continue;
            }
            let Some(instance) = record.instance.as_mut() else {
                continue;
            };
            let mut frame = RenderContext::new(&*capabilities, Some(world as &dyn Any));
            if let Err(error) = instance.render(&mut frame) {
                failures.push(ModuleFailure {
                    module: record.descriptor.name.clone(),
                    phase: FramePhase::Render,
                    error,
                });
            }
        }
        self.unload_failed(&failures, capabilities);
        failures
    }

    /// Hot-reloads the named module: builds a fresh instance from the same
    /// factory, initializes it, and only on success swaps it in, re-publishes
    /// its capabilities, and shuts down the old instance.
    ///
    /// On any failure the incumbent instance stays `Active` and untouched.
    /// Returns the type names of the capabilities the fresh instance
    /// re-published, for staleness notification.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::ReloadFailed`] when the module is unknown, does not
    /// declare reload support, is not `Active`, or its fresh instance fails
    /// to initialize.
    pub fn reload(
        &mut self,
        name: &str,
        world: &mut World,
        capabilities: &mut CapabilityRegistry,
        config: &EngineConfig,
    ) -> Result<Vec<&'static str>, RuntimeError> {
        let Some(index) = self
            .records
            .iter()
            .position(|record| record.descriptor.name == name)
        else {
            return Err(RuntimeError::ReloadFailed {
                module: name.to_string(),
                reason: "module is not registered".to_string(),
            });
        };
        if !self.records[index].descriptor.reloadable {
            return Err(RuntimeError::ReloadFailed {
                module: name.to_string(),
                reason: "descriptor does not declare reload support".to_string(),
            });
        }
        if self.records[index].state != ModuleState::Active {
            return Err(RuntimeError::ReloadFailed {
                module: name.to_string(),
                reason: format!(
                    "module is {}, only active modules can reload",
                    self.records[index].state
                ),
            });
        }

        self.records[index].state = ModuleState::Reloading;
        info!("Reloading module '{name}'");

        let mut fresh = (self.records[index].factory)();
        let mut host = HostContext::new(
            name,
            capabilities,
            Some(&mut *world as &mut dyn Any),
            config.module_section(name),
        );
        match fresh.initialize(&mut host) {
            Ok(()) => {
                let staged = host.into_staged();
                let record = &mut self.records[index];
                let old_published = std::mem::take(&mut record.published);
                let mut replaced = Vec::with_capacity(staged.len());
                for publication in staged {
                    record
                        .published
                        .push((publication.id(), publication.capability()));
                    replaced.push(publication.capability());
                    capabilities.apply(publication);
                }
                // Withdraw identities the fresh instance chose not to
                // re-publish; nothing may serve them anymore.
                for (id, capability) in old_published {
                    if !record.published.iter().any(|(new_id, _)| *new_id == id)
                        && capabilities.reset_erased(id)
                    {
                        debug!("Capability '{capability}' withdrawn on reload of '{name}'");
                    }
                }

                let old = record.instance.replace(fresh);
                if let Some(instance) = record.instance.as_mut() {
                    instance.on_reload();
                }
                if let Some(mut old) = old {
                    old.shutdown();
                }
                record.state = ModuleState::Active;
                info!("Module '{name}' reloaded");
                Ok(replaced)
            }
            Err(source) => {
                // The fresh instance never initialized; drop it without a
                // shutdown call and keep the incumbent running.
                self.records[index].state = ModuleState::Active;
                warn!("Reload of '{name}' failed, keeping previous instance: {source}");
                Err(RuntimeError::ReloadFailed {
                    module: name.to_string(),
                    reason: source.to_string(),
                })
            }
        }
    }

    /// Shuts down every initialized module in reverse resolved order and
    /// empties the registry. Idempotent; a second call is a no-op.
    pub fn shutdown_all(&mut self, capabilities: &mut CapabilityRegistry) {
        if self.records.is_empty() {
            return;
        }
        for record in self.records.iter_mut().rev() {
            if let Some(instance) = record.instance.as_mut() {
                instance.shutdown();
                debug!("Module '{}' shut down", record.descriptor.name);
            }
            for (id, capability) in record.published.drain(..) {
                if capabilities.reset_erased(id) {
                    debug!("Capability '{capability}' withdrawn");
                }
            }
            record.instance = None;
            record.state = ModuleState::Shutdown;
        }
        let count = self.records.len();
        self.records.clear();
        info!("{count} modules shut down");
    }

    /// Number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no modules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Module names in current record order.
    #[must_use]
    pub fn module_names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.descriptor.name.clone())
            .collect()
    }

    /// The named module's lifecycle state, if registered.
    #[must_use]
    pub fn state_of(&self, name: &str) -> Option<ModuleState> {
        self.records
            .iter()
            .find(|record| record.descriptor.name == name)
            .map(|record| record.state)
    }

    /// Returns `true` if a module with this name is registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.descriptor.name == name)
    }

    /// Reverse-order cleanup after a failed startup. Initialized records go
    /// through `Shutdown` and are removed; untouched records stay
    /// registered without instances.
    fn rollback_initialized(&mut self, capabilities: &mut CapabilityRegistry) {
        for record in self.records.iter_mut().rev() {
            if record.state != ModuleState::Initialized {
                continue;
            }
            if let Some(instance) = record.instance.as_mut() {
                instance.shutdown();
            }
            for (id, capability) in record.published.drain(..) {
                if capabilities.reset_erased(id) {
                    debug!("Capability '{capability}' withdrawn in startup rollback");
                }
            }
            record.instance = None;
            record.state = ModuleState::Shutdown;
            warn!(
                "Module '{}' shut down during startup rollback",
                record.descriptor.name
            );
        }
        self.records
            .retain(|record| record.state != ModuleState::Shutdown);
    }

    /// Unloads the modules named in `failures`: shutdown, capability
    /// withdrawal, record removal. Processed in reverse frame order.
    fn unload_failed(&mut self, failures: &[ModuleFailure], capabilities: &mut CapabilityRegistry) {
        for failure in failures.iter().rev() {
            let Some(index) = self
                .records
                .iter()
                .position(|record| record.descriptor.name == failure.module)
            else {
                continue;
            };
            let mut record = self.records.remove(index);
            if let Some(instance) = record.instance.as_mut() {
                instance.shutdown();
            }
            for (id, capability) in record.published.drain(..) {
                if capabilities.reset_erased(id) {
                    debug!(
                        "Capability '{capability}' withdrawn with module '{}'",
                        record.descriptor.name
                    );
                }
            }
            warn!(
                "Module '{}' unloaded after a {} failure",
                record.descriptor.name, failure.phase
            );
        }
    }
}
