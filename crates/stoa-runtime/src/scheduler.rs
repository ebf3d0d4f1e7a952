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

//! The per-frame system pipeline.
//!
//! Systems run in insertion order, every frame, over the shared world.
//! Structural changes (add, remove, enable, disable) are buffered and
//! applied at the top of the next update, so a system can reconfigure the
//! pipeline from inside its own update without invalidating the running
//! iteration.

use std::time::Duration;

use log::{debug, warn};

use stoa_core::CapabilityRegistry;
use stoa_world::World;

/// One pass of the frame pipeline.
///
/// Most systems only implement [`update`](System::update). A system that
/// also participates in the presentation phase overrides
/// [`renders`](System::renders) and [`render`](System::render).
pub trait System: Send {
    /// Unique name, used to address the system in scheduler commands.
    fn name(&self) -> &str;

    /// Logic step, called once per frame in pipeline order.
    fn update(&mut self, world: &mut World, capabilities: &mut CapabilityRegistry, dt: Duration);

    /// Presentation step, called after every system's update. Must not
    /// mutate the world.
    fn render(&mut self, world: &World, capabilities: &CapabilityRegistry) {
        let _ = (world, capabilities);
    }

    /// Whether [`render`](System::render) should be called for this system.
    fn renders(&self) -> bool {
        false
    }
}

struct SystemRecord {
    system: Box<dyn System>,
    enabled: bool,
}

enum SchedulerCommand {
    Add(Box<dyn System>),
    Remove(String),
    SetEnabled(String, bool),
}

/// Runs registered systems in insertion order each frame.
#[derive(Default)]
pub struct SystemScheduler {
    records: Vec<SystemRecord>,
    commands: Vec<SchedulerCommand>,
}

impl SystemScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a system for insertion at the end of the pipeline, effective
    /// at the top of the next update.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.commands.push(SchedulerCommand::Add(system));
    }

    /// Queues removal of the named system, effective at the top of the next
    /// update.
    pub fn remove_system(&mut self, name: impl Into<String>) {
        self.commands.push(SchedulerCommand::Remove(name.into()));
    }

    /// Queues enabling or disabling the named system, effective at the top
    /// of the next update. Disabled systems stay in place but are skipped.
    pub fn set_enabled(&mut self, name: impl Into<String>, enabled: bool) {
        self.commands
            .push(SchedulerCommand::SetEnabled(name.into(), enabled));
    }

    /// Applies buffered commands, then runs every enabled system's update
    /// in pipeline order.
    pub fn update(&mut self, world: &mut World, capabilities: &mut CapabilityRegistry, dt: Duration) {
        self.apply_commands();
        for record in self.records.iter_mut() {
            if record.enabled {
                record.system.update(world, capabilities, dt);
            }
        }
    }

    /// Runs every enabled rendering system's render in pipeline order.
    /// Buffered commands are not applied here; structural changes wait for
    /// the next update.
    pub fn render(&mut self, world: &World, capabilities: &CapabilityRegistry) {
        for record in self.records.iter_mut() {
            if record.enabled && record.system.renders() {
                record.system.render(world, capabilities);
            }
        }
    }

    /// Number of installed systems. Buffered additions do not count until
    /// applied.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no systems are installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Installed system names in pipeline order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.system.name().to_string())
            .collect()
    }

    /// Whether the named system is installed and enabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.enabled && record.system.name() == name)
    }

    fn apply_commands(&mut self) {
        for command in self.commands.drain(..) {
            match command {
                SchedulerCommand::Add(system) => {
                    let name = system.name().to_string();
                    if self
                        .records
                        .iter()
                        .any(|record| record.system.name() == name)
                    {
                        warn!("System '{name}' is already installed, ignoring duplicate");
                        continue;
                    }
                    debug!("System '{name}' installed");
                    self.records.push(SystemRecord {
                        system,
                        enabled: true,
                    });
                }
                SchedulerCommand::Remove(name) => {
                    let before = self.records.len();
                    self.records.retain(|record| record.system.name() != name);
                    if self.records.len() == before {
                        warn!("System '{name}' is not installed, nothing to remove");
                    } else {
                        debug!("System '{name}' removed");
                    }
                }
                SchedulerCommand::SetEnabled(name, enabled) => {
                    match self
                        .records
                        .iter_mut()
                        .find(|record| record.system.name() == name)
                    {
                        Some(record) => record.enabled = enabled,
                        None => warn!("System '{name}' is not installed, cannot toggle"),
                    }
                }
            }
        }
    }
}
