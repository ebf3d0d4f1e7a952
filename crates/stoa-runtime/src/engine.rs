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

//! The engine facade: owns every runtime piece and drives the frame loop.

use std::time::Duration;

use log::{debug, error, info, warn};

use stoa_core::event::EventBus;
use stoa_core::{CapabilityRegistry, ControlRequest, Module, ModuleDescriptor, RuntimeError};
use stoa_world::World;

use crate::clock::FrameClock;
use crate::config::EngineConfig;
use crate::events::EngineEvent;
use crate::passes::{
    AudioPass, LightingPass, PhysicsPass, RenderSubmissionPass, ScriptPass, TransformPass,
};
use crate::registry::{ModuleFactory, ModuleRegistry};
use crate::scheduler::{System, SystemScheduler};

/// Owns the world, the capability registry, the module registry, the system
/// pipeline, and the frame clock, and steps them as one unit.
///
/// Everything runs on the thread that calls [`run`](Engine::run) or
/// [`step`](Engine::step); there is no internal threading. One frame is:
/// apply queued reloads, module updates, pipeline updates, pipeline
/// renders, module renders, then act on the control requests the frame
/// collected.
pub struct Engine {
    config: EngineConfig,
    world: World,
    capabilities: CapabilityRegistry,
    scheduler: SystemScheduler,
    modules: ModuleRegistry,
    events: EventBus<EngineEvent>,
    clock: FrameClock,
    running: bool,
    initialized: bool,
    delta_time: Duration,
    total_time: Duration,
    frame_index: u64,
    pending_reloads: Vec<String>,
    requests: Vec<ControlRequest>,
    /// Whether startup completed with at least one module, for the fatal
    /// all-modules-gone check.
    had_modules: bool,
}

impl Engine {
    /// Creates an engine around a loaded configuration. Nothing is
    /// initialized until [`initialize`](Engine::initialize).
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        info!("Engine '{}' created", config.engine.name);
        Self {
            config,
            world: World::new(),
            capabilities: CapabilityRegistry::new(),
            scheduler: SystemScheduler::new(),
            modules: ModuleRegistry::new(),
            events: EventBus::new(),
            clock: FrameClock::new(),
            running: false,
            initialized: false,
            delta_time: Duration::ZERO,
            total_time: Duration::ZERO,
            frame_index: 0,
            pending_reloads: Vec::new(),
            requests: Vec::new(),
            had_modules: false,
        }
    }

    /// Registers a module by descriptor and factory.
    ///
    /// # Errors
    ///
    /// See [`ModuleRegistry::register`].
    pub fn register_module(
        &mut self,
        descriptor: ModuleDescriptor,
        factory: ModuleFactory,
    ) -> Result<(), RuntimeError> {
        self.modules.register(descriptor, factory)
    }

    /// [`register_module`](Engine::register_module) with a plain closure
    /// factory.
    pub fn register_with<F>(
        &mut self,
        descriptor: ModuleDescriptor,
        factory: F,
    ) -> Result<(), RuntimeError>
    where
        F: Fn() -> Box<dyn Module> + Send + Sync + 'static,
    {
        self.modules.register_with(descriptor, factory)
    }

    /// Installs the built-in pass pipeline in its fixed order: transform,
    /// physics, script, audio, lighting, render submission.
    ///
    /// Effective at the first update, like any scheduler addition.
    pub fn install_standard_passes(&mut self) {
        self.scheduler.add_system(Box::new(TransformPass));
        self.scheduler.add_system(Box::new(PhysicsPass));
        self.scheduler.add_system(Box::new(ScriptPass));
        self.scheduler.add_system(Box::new(AudioPass));
        self.scheduler.add_system(Box::new(LightingPass));
        self.scheduler.add_system(Box::new(RenderSubmissionPass));
    }

    /// Adds a custom system to the end of the pipeline, effective at the
    /// next update.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.scheduler.add_system(system);
    }

    /// Resolves dependency order and initializes every registered module.
    ///
    /// All-or-nothing: on failure no module is left active and the error is
    /// returned; the engine can not be run.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::MissingDependency`], [`RuntimeError::DependencyCycle`],
    /// or [`RuntimeError::InitializationFailed`].
    pub fn initialize(&mut self) -> Result<(), RuntimeError> {
        if self.initialized {
            warn!("Engine is already initialized");
            return Ok(());
        }
        let order = self.modules.resolve_order()?;
        info!("Initializing {} modules", order.len());
        self.modules
            .initialize_all(&mut self.world, &mut self.capabilities, &self.config)?;
        self.had_modules = !self.modules.is_empty();
        self.initialized = true;
        Ok(())
    }

    /// Runs the frame loop until [`stop`](Engine::stop) is requested or a
    /// fatal module failure empties the registry.
    ///
    /// Idempotent-guarded: a second call while running is refused. Frames
    /// run back to back with no sleep; pacing belongs to the presentation
    /// layer (vsync) or the embedder.
    pub fn run(&mut self) {
        if !self.initialized {
            warn!("Engine::run called before initialize, nothing to do");
            return;
        }
        if self.running {
            warn!("Engine is already running");
            return;
        }
        info!("Engine loop started");
        self.running = true;
        self.clock.reset();
        while self.running {
            self.step();
        }
        info!(
            "Engine loop stopped after {} frames ({:.3}s simulated)",
            self.frame_index,
            self.total_time.as_secs_f64()
        );
    }

    /// Runs at most `frames` frames, stopping early if the loop stops
    /// itself. For demos and tests that need a bounded run.
    pub fn run_frames(&mut self, frames: u64) {
        if !self.initialized {
            warn!("Engine::run_frames called before initialize, nothing to do");
            return;
        }
        if self.running {
            warn!("Engine is already running");
            return;
        }
        self.running = true;
        self.clock.reset();
        for _ in 0..frames {
            if !self.running {
                break;
            }
            self.step();
        }
        self.running = false;
    }

    /// Executes exactly one frame.
    ///
    /// Public so embedders with their own outer loop (window event pumps)
    /// can drive the engine a frame at a time.
    pub fn step(&mut self) {
        let delta = self.clock.tick(self.config.engine.max_delta());
        self.delta_time = delta;
        self.total_time += delta;
        self.frame_index += 1;

        // Reloads queued last frame happen first, so no module observes a
        // half-replaced peer mid-frame.
        let pending = std::mem::take(&mut self.pending_reloads);
        for name in pending {
            match self.modules.reload(
                &name,
                &mut self.world,
                &mut self.capabilities,
                &self.config,
            ) {
                Ok(replaced) => {
                    self.events.publish(EngineEvent::ModuleReloaded {
                        module: name.clone(),
                    });
                    for capability in replaced {
                        self.events
                            .publish(EngineEvent::CapabilityReplaced { capability });
                    }
                }
                Err(error) => {
                    let reason = match &error {
                        RuntimeError::ReloadFailed { reason, .. } => reason.clone(),
                        other => other.to_string(),
                    };
                    self.events.publish(EngineEvent::ReloadFailed {
                        module: name.clone(),
                        reason,
                    });
                }
            }
        }

        let failures = self.modules.update_all(
            &mut self.world,
            &mut self.capabilities,
            &mut self.requests,
            delta,
        );
        self.report_failures(failures);

        self.scheduler
            .update(&mut self.world, &mut self.capabilities, delta);
        self.scheduler.render(&self.world, &self.capabilities);

        let failures = self.modules.render_all(&self.world, &mut self.capabilities);
        self.report_failures(failures);

        for request in std::mem::take(&mut self.requests) {
            match request {
                ControlRequest::Stop => {
                    debug!("Stop requested");
                    self.running = false;
                }
                ControlRequest::Reload(module) => {
                    if !self.pending_reloads.contains(&module) {
                        self.pending_reloads.push(module);
                    }
                }
            }
        }

        if self.had_modules && self.modules.is_empty() {
            error!("All modules have been unloaded; stopping the engine");
            self.running = false;
        }
    }

    /// Requests a stop, honored at the top of the next loop iteration.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Queues a hot-reload of the named module, applied at the start of the
    /// next frame.
    pub fn request_reload(&mut self, module: impl Into<String>) {
        let module = module.into();
        if !self.pending_reloads.contains(&module) {
            self.pending_reloads.push(module);
        }
    }

    /// Shuts every module down in reverse order and clears the world.
    /// Idempotent; also invoked on drop.
    pub fn shutdown(&mut self) {
        if !self.initialized && self.modules.is_empty() {
            return;
        }
        info!("Engine shutting down");
        self.modules.shutdown_all(&mut self.capabilities);
        self.world.clear();
        self.running = false;
        self.initialized = false;
    }

    /// Drains every engine event published since the last drain.
    #[must_use]
    pub fn drain_events(&self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    /// The entity/component store.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the entity/component store.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The capability registry.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    /// Mutable access to the capability registry.
    pub fn capabilities_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.capabilities
    }

    /// Mutable access to the system pipeline.
    pub fn scheduler_mut(&mut self) -> &mut SystemScheduler {
        &mut self.scheduler
    }

    /// The module registry.
    #[must_use]
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The previous frame's clamped delta.
    #[must_use]
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Accumulated simulated time across all frames.
    #[must_use]
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Number of frames stepped so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Whether the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn report_failures(&mut self, failures: Vec<crate::registry::ModuleFailure>) {
        for failure in failures {
            error!(
                "Module '{}' failed during {}: {}",
                failure.module, failure.phase, failure.error
            );
            self.events.publish(EngineEvent::ModuleFailed {
                module: failure.module,
                phase: failure.phase,
                error: failure.error.to_string(),
            });
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
