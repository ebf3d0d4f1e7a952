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

//! Audio source reconciliation.

use std::time::Duration;

use stoa_core::contract::{AudioBackend, SoundDesc};
use stoa_core::CapabilityRegistry;
use stoa_world::{AudioSourceRef, World};

use crate::scheduler::System;

/// Reconciles each [`AudioSourceRef`]'s desired state against the active
/// audio backend.
///
/// `playing` is intent: the pass starts voices that should play and have
/// none, stops voices that should not play, refreshes the volume of live
/// voices, and notices voices the backend finished on its own. Idles when
/// no audio backend is installed.
#[derive(Debug, Default)]
pub struct AudioPass;

impl System for AudioPass {
    fn name(&self) -> &str {
        "audio"
    }

    fn update(&mut self, world: &mut World, capabilities: &mut CapabilityRegistry, _dt: Duration) {
        let Ok(audio) = capabilities.get::<dyn AudioBackend>() else {
            return;
        };

        for id in world.entities_with::<AudioSourceRef>() {
            let Some(source) = world.get_mut::<AudioSourceRef>(id) else {
                continue;
            };
            match (source.playing, source.handle) {
                (true, None) => {
                    let handle = audio.play(&SoundDesc {
                        name: source.sound.clone(),
                        looping: source.looping,
                        volume: source.volume,
                    });
                    source.handle = Some(handle);
                }
                (true, Some(handle)) => {
                    if audio.is_playing(handle) {
                        audio.set_volume(handle, source.volume);
                    } else {
                        // The voice ended on its own. Looping sources get a
                        // fresh voice next frame; one-shots fall back to
                        // stopped.
                        source.handle = None;
                        if !source.looping {
                            source.playing = false;
                        }
                    }
                }
                (false, Some(handle)) => {
                    audio.stop(handle);
                    source.handle = None;
                }
                (false, None) => {}
            }
        }
    }
}
