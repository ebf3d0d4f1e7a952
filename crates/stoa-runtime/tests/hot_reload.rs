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

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stoa_core::{
    BoxedError, CapabilityRegistry, FrameContext, HostContext, Module, ModuleDescriptor,
    RuntimeError, Version, API_VERSION,
};
use stoa_runtime::{Engine, EngineConfig, EngineEvent, ModuleRegistry, ModuleState};
use stoa_world::World;

// --- GENERATION-COUNTING TEST MODULE ---

type SharedLog = Arc<Mutex<Vec<String>>>;

trait Beacon: Send + Sync {
    fn generation(&self) -> usize;
}

struct FixedBeacon {
    generation: usize,
}

impl Beacon for FixedBeacon {
    fn generation(&self) -> usize {
        self.generation
    }
}

/// A module whose factory numbers each constructed instance, so the log
/// shows exactly which generation handled which call.
struct Phoenix {
    generation: usize,
    log: SharedLog,
    fail_init: bool,
    publish_beacon: bool,
    reload_self_on: Option<u64>,
    frames_seen: u64,
}

impl Phoenix {
    fn push(&self, suffix: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("gen{}:{suffix}", self.generation));
    }
}

impl Module for Phoenix {
    fn name(&self) -> &str {
        "phoenix"
    }

    fn version(&self) -> Version {
        Version::new(1, self.generation as u32, 0)
    }

    fn initialize(&mut self, host: &mut HostContext<'_>) -> Result<(), BoxedError> {
        self.push("init");
        if self.fail_init {
            return Err("refused to hatch".into());
        }
        if self.publish_beacon {
            host.provide::<dyn Beacon>(Arc::new(FixedBeacon {
                generation: self.generation,
            }));
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.push("shutdown");
    }

    fn on_reload(&mut self) {
        self.push("on_reload");
    }

    fn update(&mut self, frame: &mut FrameContext<'_>, _dt: Duration) -> Result<(), BoxedError> {
        self.frames_seen += 1;
        self.push("update");
        if self.reload_self_on == Some(self.frames_seen) {
            frame.request_reload("phoenix");
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builder for phoenix factories.
#[derive(Clone)]
struct PhoenixNest {
    log: SharedLog,
    fail_from_generation: Option<usize>,
    publish_beacon: bool,
    reload_self_on: Option<u64>,
}

impl PhoenixNest {
    fn new(log: &SharedLog) -> Self {
        Self {
            log: Arc::clone(log),
            fail_from_generation: None,
            publish_beacon: false,
            reload_self_on: None,
        }
    }

    fn fail_from_generation(mut self, generation: usize) -> Self {
        self.fail_from_generation = Some(generation);
        self
    }

    fn publish_beacon(mut self) -> Self {
        self.publish_beacon = true;
        self
    }

    fn reload_self_on(mut self, frame: u64) -> Self {
        self.reload_self_on = Some(frame);
        self
    }

    fn factory(self) -> impl Fn() -> Box<dyn Module> + Send + Sync + 'static {
        let constructed = Arc::new(AtomicUsize::new(0));
        move || {
            let generation = constructed.fetch_add(1, Ordering::SeqCst) + 1;
            Box::new(Phoenix {
                generation,
                log: Arc::clone(&self.log),
                fail_init: self
                    .fail_from_generation
                    .is_some_and(|from| generation >= from),
                publish_beacon: self.publish_beacon,
                reload_self_on: self.reload_self_on,
                frames_seen: 0,
            })
        }
    }
}

fn descriptor(name: &str) -> ModuleDescriptor {
    ModuleDescriptor::new(name, Version::new(1, 0, 0), API_VERSION, "test_entry")
}

fn entries(log: &SharedLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn test_reload_swaps_in_a_fresh_instance_at_the_frame_start() {
    // --- 1. ARRANGE ---
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(
            descriptor("phoenix").reloadable(),
            PhoenixNest::new(&log).factory(),
        )
        .unwrap();
    engine.initialize().unwrap();
    engine.run_frames(1);

    // --- 2. ACT ---
    engine.request_reload("phoenix");
    engine.run_frames(1);

    // --- 3. ASSERT ---
    // The swap happens before the frame's updates: fresh instance
    // initializes, gets its reload hook, and only then the old one is
    // shut down.
    assert_eq!(
        entries(&log),
        [
            "gen1:init",
            "gen1:update",
            "gen2:init",
            "gen2:on_reload",
            "gen1:shutdown",
            "gen2:update",
        ]
    );
    assert_eq!(engine.modules().len(), 1);
    assert_eq!(
        engine.modules().state_of("phoenix"),
        Some(ModuleState::Active)
    );
    let events = engine.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::ModuleReloaded { module } if module == "phoenix"
    )));
}

#[test]
fn test_failed_reload_keeps_the_incumbent_running() {
    // --- 1. ARRANGE ---
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(
            descriptor("phoenix").reloadable(),
            PhoenixNest::new(&log).fail_from_generation(2).factory(),
        )
        .unwrap();
    engine.initialize().unwrap();
    engine.run_frames(1);

    // --- 2. ACT ---
    engine.request_reload("phoenix");
    engine.run_frames(2);

    // --- 3. ASSERT ---
    // The replacement never initialized, so the first generation keeps
    // serving every frame and is never shut down.
    assert_eq!(
        entries(&log),
        [
            "gen1:init",
            "gen1:update",
            "gen2:init",
            "gen1:update",
            "gen1:update",
        ]
    );
    assert_eq!(
        engine.modules().state_of("phoenix"),
        Some(ModuleState::Active)
    );
    let events = engine.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::ReloadFailed { module, reason }
            if module == "phoenix" && reason.contains("refused to hatch")
    )));
    assert!(!events
        .iter()
        .any(|event| matches!(event, EngineEvent::ModuleReloaded { .. })));
}

#[test]
fn test_reload_republishes_capabilities() {
    // --- 1. ARRANGE ---
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(
            descriptor("phoenix").reloadable(),
            PhoenixNest::new(&log).publish_beacon().factory(),
        )
        .unwrap();
    engine.initialize().unwrap();

    let beacon = engine
        .capabilities()
        .try_get::<dyn Beacon>()
        .expect("beacon should be published at startup");
    assert_eq!(beacon.generation(), 1);
    let epoch_before = engine.capabilities().epoch::<dyn Beacon>();

    // --- 2. ACT ---
    engine.request_reload("phoenix");
    engine.run_frames(1);

    // --- 3. ASSERT ---
    let beacon = engine
        .capabilities()
        .try_get::<dyn Beacon>()
        .expect("beacon should be re-published after reload");
    assert_eq!(beacon.generation(), 2);
    assert!(engine.capabilities().epoch::<dyn Beacon>() > epoch_before);
    let events = engine.drain_events();
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::CapabilityReplaced { .. })));
}

#[test]
fn test_in_frame_reload_request_applies_at_the_next_frame() {
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(
            descriptor("phoenix").reloadable(),
            PhoenixNest::new(&log).reload_self_on(1).factory(),
        )
        .unwrap();
    engine.initialize().unwrap();

    engine.run_frames(2);

    // The request from frame 1's update takes effect at the top of
    // frame 2, never mid-frame.
    assert_eq!(
        entries(&log),
        [
            "gen1:init",
            "gen1:update",
            "gen2:init",
            "gen2:on_reload",
            "gen1:shutdown",
            "gen2:update",
        ]
    );
}

#[test]
fn test_reload_requires_the_reloadable_flag() {
    let log = SharedLog::default();
    let mut registry = ModuleRegistry::new();
    let mut world = World::new();
    let mut capabilities = CapabilityRegistry::new();
    let config = EngineConfig::default();

    registry
        .register_with(descriptor("phoenix"), PhoenixNest::new(&log).factory())
        .unwrap();
    registry.resolve_order().unwrap();
    registry
        .initialize_all(&mut world, &mut capabilities, &config)
        .unwrap();

    let error = registry
        .reload("phoenix", &mut world, &mut capabilities, &config)
        .unwrap_err();

    let RuntimeError::ReloadFailed { module, reason } = error else {
        panic!("expected a reload failure");
    };
    assert_eq!(module, "phoenix");
    assert!(reason.contains("reload support"));
    // The incumbent was not disturbed.
    assert_eq!(registry.state_of("phoenix"), Some(ModuleState::Active));
}

#[test]
fn test_reload_of_an_unregistered_module_fails() {
    let mut registry = ModuleRegistry::new();
    let mut world = World::new();
    let mut capabilities = CapabilityRegistry::new();
    let config = EngineConfig::default();

    let error = registry
        .reload("ghost", &mut world, &mut capabilities, &config)
        .unwrap_err();

    let RuntimeError::ReloadFailed { module, reason } = error else {
        panic!("expected a reload failure");
    };
    assert_eq!(module, "ghost");
    assert!(reason.contains("not registered"));
}

#[test]
fn test_reload_before_startup_is_refused() {
    let log = SharedLog::default();
    let mut registry = ModuleRegistry::new();
    let mut world = World::new();
    let mut capabilities = CapabilityRegistry::new();
    let config = EngineConfig::default();

    registry
        .register_with(
            descriptor("phoenix").reloadable(),
            PhoenixNest::new(&log).factory(),
        )
        .unwrap();
    registry.resolve_order().unwrap();

    let error = registry
        .reload("phoenix", &mut world, &mut capabilities, &config)
        .unwrap_err();

    let RuntimeError::ReloadFailed { reason, .. } = error else {
        panic!("expected a reload failure");
    };
    assert!(reason.contains("only active modules"));
}
