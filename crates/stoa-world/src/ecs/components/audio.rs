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

use stoa_core::contract::SoundHandle;

use crate::ecs::Component;

/// Attaches a sound to an entity.
///
/// `playing` expresses intent; the audio pass reconciles it against the
/// active audio backend each frame, starting, stopping, and re-volumeing
/// the backend voice recorded in `handle`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSourceRef {
    /// Name the backend resolves to sound data.
    pub sound: String,
    /// Backend voice, populated while the sound plays.
    pub handle: Option<SoundHandle>,
    /// Desired state: `true` means the sound should be playing.
    pub playing: bool,
    /// Whether playback restarts at the end.
    pub looping: bool,
    /// Linear volume, 1.0 is unattenuated.
    pub volume: f32,
}

impl Component for AudioSourceRef {}

impl AudioSourceRef {
    /// Creates a stopped source for the named sound.
    pub fn new(sound: impl Into<String>) -> Self {
        Self {
            sound: sound.into(),
            handle: None,
            playing: false,
            looping: false,
            volume: 1.0,
        }
    }

    /// Builder-style toggle for looping playback.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }
}
