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

//! The audio contract: playback control over backend-owned voices.

use super::handle::Handle;

/// Marker for playing sounds.
pub enum Sound {}

/// Handle to a playing sound owned by the active audio backend.
pub type SoundHandle = Handle<Sound>;

/// Playback parameters.
#[derive(Debug, Clone)]
pub struct SoundDesc {
    /// Name of the sound to play.
    pub name: String,
    /// Whether playback restarts when it reaches the end.
    pub looping: bool,
    /// Linear volume, where 1.0 is unattenuated.
    pub volume: f32,
}

impl Default for SoundDesc {
    fn default() -> Self {
        Self {
            name: String::new(),
            looping: false,
            volume: 1.0,
        }
    }
}

/// The audio capability: start, stop, and adjust playing sounds.
///
/// Looked up as `dyn AudioBackend`.
pub trait AudioBackend: Send + Sync {
    /// Starts playback and returns its handle.
    fn play(&self, desc: &SoundDesc) -> SoundHandle;

    /// Stops playback. Stale or unknown handles are ignored.
    fn stop(&self, handle: SoundHandle);

    /// Adjusts the volume of a playing sound.
    fn set_volume(&self, handle: SoundHandle, volume: f32);

    /// Reports whether a handle still refers to a playing sound.
    fn is_playing(&self, handle: SoundHandle) -> bool;

    /// Sounds currently playing.
    fn active_sounds(&self) -> usize;
}
