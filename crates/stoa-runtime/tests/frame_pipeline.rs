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
    RenderContext, Version, API_VERSION,
};
use stoa_runtime::{Engine, EngineConfig, EngineEvent, FramePhase, System};
use stoa_world::World;

// --- RECORDING TEST MODULES ---

type SharedLog = Arc<Mutex<Vec<String>>>;

/// Logs lifecycle and frame calls; can be told to fail or request a stop on
/// a specific frame ordinal (1-based, counted per instance).
#[derive(Clone)]
struct Stepper {
    name: &'static str,
    log: SharedLog,
    frames_seen: u64,
    fail_update_on: Option<u64>,
    fail_render_on: Option<u64>,
    stop_on: Option<u64>,
}

impl Stepper {
    fn named(name: &'static str, log: &SharedLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            frames_seen: 0,
            fail_update_on: None,
            fail_render_on: None,
            stop_on: None,
        }
    }

    fn fail_update_on(mut self, frame: u64) -> Self {
        self.fail_update_on = Some(frame);
        self
    }

    fn fail_render_on(mut self, frame: u64) -> Self {
        self.fail_render_on = Some(frame);
        self
    }

    fn stop_on(mut self, frame: u64) -> Self {
        self.stop_on = Some(frame);
        self
    }

    fn factory(self) -> impl Fn() -> Box<dyn Module> + Send + Sync + 'static {
        move || Box::new(self.clone())
    }

    fn push(&self, suffix: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{suffix}", self.name));
    }
}

impl Module for Stepper {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> Version {
        Version::new(1, 0, 0)
    }

    fn initialize(&mut self, _host: &mut HostContext<'_>) -> Result<(), BoxedError> {
        self.push("init");
        Ok(())
    }

    fn shutdown(&mut self) {
        self.push("shutdown");
    }

    fn update(&mut self, frame: &mut FrameContext<'_>, _dt: Duration) -> Result<(), BoxedError> {
        self.frames_seen += 1;
        self.push("update");
        if self.stop_on == Some(self.frames_seen) {
            frame.request_stop();
        }
        if self.fail_update_on == Some(self.frames_seen) {
            return Err(format!("{} exploded", self.name).into());
        }
        Ok(())
    }

    fn render(&mut self, _frame: &mut RenderContext<'_>) -> Result<(), BoxedError> {
        self.push("render");
        if self.fail_render_on == Some(self.frames_seen) {
            return Err(format!("{} exploded", self.name).into());
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

fn descriptor(name: &str) -> ModuleDescriptor {
    ModuleDescriptor::new(name, Version::new(1, 0, 0), API_VERSION, "test_entry")
}

fn entries(log: &SharedLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn test_one_frame_runs_updates_then_renders_in_module_order() {
    // --- 1. ARRANGE ---
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(
            descriptor("follower").with_dependencies(["leader"]),
            Stepper::named("follower", &log).factory(),
        )
        .unwrap();
    engine
        .register_with(descriptor("leader"), Stepper::named("leader", &log).factory())
        .unwrap();
    engine.initialize().unwrap();

    // --- 2. ACT ---
    engine.run_frames(1);

    // --- 3. ASSERT ---
    assert_eq!(
        entries(&log),
        [
            "leader:init",
            "follower:init",
            "leader:update",
            "follower:update",
            "leader:render",
            "follower:render",
        ]
    );
    assert_eq!(engine.frame_index(), 1);
}

#[test]
fn test_update_failure_unloads_the_failing_module_and_spares_the_rest() {
    // --- 1. ARRANGE ---
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(descriptor("steady"), Stepper::named("steady", &log).factory())
        .unwrap();
    engine
        .register_with(
            descriptor("flaky"),
            Stepper::named("flaky", &log).fail_update_on(1).factory(),
        )
        .unwrap();
    engine
        .register_with(descriptor("tail"), Stepper::named("tail", &log).factory())
        .unwrap();
    engine.initialize().unwrap();

    // --- 2. ACT ---
    engine.run_frames(2);

    // --- 3. ASSERT ---
    // Frame 1 still updates the modules after the failing one, unloads it,
    // then renders without it. Frame 2 never sees it.
    assert_eq!(
        entries(&log),
        [
            "steady:init",
            "flaky:init",
            "tail:init",
            "steady:update",
            "flaky:update",
            "tail:update",
            "flaky:shutdown",
            "steady:render",
            "tail:render",
            "steady:update",
            "tail:update",
            "steady:render",
            "tail:render",
        ]
    );
    assert!(!engine.modules().is_registered("flaky"));
    assert_eq!(engine.modules().len(), 2);

    let events = engine.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        EngineEvent::ModuleFailed { module, phase: FramePhase::Update, error }
            if module == "flaky" && error.contains("exploded")
    ));
}

#[test]
fn test_render_failure_is_isolated_to_the_failing_module() {
    // --- 1. ARRANGE ---
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(descriptor("steady"), Stepper::named("steady", &log).factory())
        .unwrap();
    engine
        .register_with(
            descriptor("painter"),
            Stepper::named("painter", &log).fail_render_on(1).factory(),
        )
        .unwrap();
    engine.initialize().unwrap();

    // --- 2. ACT ---
    engine.run_frames(2);

    // --- 3. ASSERT ---
    assert_eq!(
        entries(&log),
        [
            "steady:init",
            "painter:init",
            "steady:update",
            "painter:update",
            "steady:render",
            "painter:render",
            "painter:shutdown",
            "steady:update",
            "steady:render",
        ]
    );
    let events = engine.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        EngineEvent::ModuleFailed { module, phase: FramePhase::Render, .. } if module == "painter"
    ));
}

#[test]
fn test_stop_request_is_honored_at_the_frame_boundary() {
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(
            descriptor("quitter"),
            Stepper::named("quitter", &log).stop_on(3).factory(),
        )
        .unwrap();
    engine.initialize().unwrap();

    engine.run();

    // The stop requested during frame 3 ends the loop after that frame
    // completes, renders included.
    assert_eq!(engine.frame_index(), 3);
    assert!(!engine.is_running());
    let updates = entries(&log)
        .iter()
        .filter(|entry| entry.ends_with(":update"))
        .count();
    let renders = entries(&log)
        .iter()
        .filter(|entry| entry.ends_with(":render"))
        .count();
    assert_eq!(updates, 3);
    assert_eq!(renders, 3);
}

#[test]
fn test_engine_stops_when_the_last_module_is_gone() {
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(
            descriptor("mortal"),
            Stepper::named("mortal", &log).fail_update_on(2).factory(),
        )
        .unwrap();
    engine.initialize().unwrap();

    engine.run();

    assert_eq!(engine.frame_index(), 2);
    assert!(engine.modules().is_empty());
    let events = engine.drain_events();
    assert!(matches!(
        &events[0],
        EngineEvent::ModuleFailed { module, .. } if module == "mortal"
    ));
}

#[test]
fn test_factories_build_exactly_one_instance_per_startup() {
    let log = SharedLog::default();
    let built = Arc::new(AtomicUsize::new(0));
    let mut engine = Engine::new(EngineConfig::default());
    let template = Stepper::named("counted", &log);
    let counter = Arc::clone(&built);
    engine
        .register_with(descriptor("counted"), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(template.clone())
        })
        .unwrap();

    engine.initialize().unwrap();
    engine.run_frames(3);

    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_run_before_initialize_does_nothing() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.run_frames(5);
    assert_eq!(engine.frame_index(), 0);
}

// --- PIPELINE PROBE SYSTEM ---

struct PipelineProbe {
    log: SharedLog,
}

impl System for PipelineProbe {
    fn name(&self) -> &str {
        "probe"
    }

    fn update(&mut self, _world: &mut World, _capabilities: &mut CapabilityRegistry, _dt: Duration) {
        self.log.lock().unwrap().push("probe:update".to_string());
    }

    fn render(&mut self, _world: &World, _capabilities: &CapabilityRegistry) {
        self.log.lock().unwrap().push("probe:render".to_string());
    }

    fn renders(&self) -> bool {
        true
    }
}

#[test]
fn test_systems_run_between_module_updates_and_module_renders() {
    // --- 1. ARRANGE ---
    let log = SharedLog::default();
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .register_with(descriptor("leader"), Stepper::named("leader", &log).factory())
        .unwrap();
    engine.add_system(Box::new(PipelineProbe {
        log: Arc::clone(&log),
    }));
    engine.initialize().unwrap();

    // --- 2. ACT ---
    engine.run_frames(1);

    // --- 3. ASSERT ---
    assert_eq!(
        entries(&log),
        [
            "leader:init",
            "leader:update",
            "probe:update",
            "probe:render",
            "leader:render",
        ]
    );
}
