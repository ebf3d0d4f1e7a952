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

//! Voice bookkeeping with no audio device behind it.

use std::any::Any;
use std::sync::{Arc, Mutex};

use log::{debug, info};

use stoa_core::contract::{AudioBackend, Sound, SoundDesc, SoundHandle};
use stoa_core::{BoxedError, HostContext, Module, ModuleDescriptor, Version, API_VERSION};

use crate::arena::HandleArena;

/// Audio provider that tracks voices without producing sound.
///
/// Voices play forever until stopped; without a device there is no playback
/// position to end a one-shot on.
#[derive(Default)]
pub struct NullAudioBackend {
    state: Mutex<AudioState>,
}

#[derive(Default)]
struct AudioState {
    voices: HandleArena<Sound, Voice>,
}

struct Voice {
    name: String,
    looping: bool,
    volume: f32,
}

impl NullAudioBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current volume of a voice, for diagnostics.
    #[must_use]
    pub fn volume(&self, handle: SoundHandle) -> Option<f32> {
        let state = self.state.lock().unwrap();
        state.voices.get(handle).map(|voice| voice.volume)
    }

    /// Whether a voice was started looping, for diagnostics.
    #[must_use]
    pub fn is_looping(&self, handle: SoundHandle) -> Option<bool> {
        let state = self.state.lock().unwrap();
        state.voices.get(handle).map(|voice| voice.looping)
    }
}

impl AudioBackend for NullAudioBackend {
    fn play(&self, desc: &SoundDesc) -> SoundHandle {
        let mut state = self.state.lock().unwrap();
        debug!("Voice '{}' started (volume {})", desc.name, desc.volume);
        state.voices.insert(Voice {
            name: desc.name.clone(),
            looping: desc.looping,
            volume: desc.volume,
        })
    }

    fn stop(&self, handle: SoundHandle) {
        let mut state = self.state.lock().unwrap();
        if let Some(voice) = state.voices.remove(handle) {
            debug!("Voice '{}' stopped", voice.name);
        }
    }

    fn set_volume(&self, handle: SoundHandle, volume: f32) {
        let mut state = self.state.lock().unwrap();
        if let Some(voice) = state.voices.get_mut(handle) {
            voice.volume = volume;
        }
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.state.lock().unwrap().voices.contains(handle)
    }

    fn active_sounds(&self) -> usize {
        self.state.lock().unwrap().voices.len()
    }
}

/// Module wrapper that publishes a [`NullAudioBackend`] as the audio
/// capability.
#[derive(Default)]
pub struct AudioModule {
    backend: Option<Arc<NullAudioBackend>>,
}

impl AudioModule {
    /// Descriptor under which this module registers.
    #[must_use]
    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("audio", Version::new(0, 1, 0), API_VERSION, "create_audio")
    }

    /// Factory matching the descriptor's entry point.
    #[must_use]
    pub fn create() -> Box<dyn Module> {
        Box::<Self>::default()
    }
}

impl Module for AudioModule {
    fn name(&self) -> &str {
        "audio"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn initialize(&mut self, host: &mut HostContext<'_>) -> Result<(), BoxedError> {
        let backend = Arc::new(NullAudioBackend::new());
        host.provide::<dyn AudioBackend>(Arc::clone(&backend) as Arc<dyn AudioBackend>);
        self.backend = Some(backend);
        info!("Null audio online");
        Ok(())
    }

    fn shutdown(&mut self) {
        self.backend = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use stoa_core::CapabilityRegistry;

    fn chime() -> SoundDesc {
        SoundDesc {
            name: "chime".to_string(),
            ..SoundDesc::default()
        }
    }

    #[test]
    fn test_play_and_stop_bookkeeping() {
        let backend = NullAudioBackend::new();

        let voice = backend.play(&chime());
        assert!(backend.is_playing(voice));
        assert_eq!(backend.active_sounds(), 1);

        backend.stop(voice);
        assert!(!backend.is_playing(voice));
        assert_eq!(backend.active_sounds(), 0);
    }

    #[test]
    fn test_stale_handles_are_ignored() {
        let backend = NullAudioBackend::new();

        let voice = backend.play(&chime());
        backend.stop(voice);
        backend.stop(voice);
        backend.set_volume(voice, 0.5);

        assert_eq!(backend.volume(voice), None);
        assert_eq!(backend.active_sounds(), 0);
    }

    #[test]
    fn test_set_volume_updates_the_voice() {
        let backend = NullAudioBackend::new();

        let voice = backend.play(&SoundDesc {
            name: "music".to_string(),
            looping: true,
            volume: 0.8,
        });
        assert_eq!(backend.volume(voice), Some(0.8));
        assert_eq!(backend.is_looping(voice), Some(true));

        backend.set_volume(voice, 0.25);
        assert_eq!(backend.volume(voice), Some(0.25));
    }

    #[test]
    fn test_module_publishes_the_audio_capability() {
        let mut capabilities = CapabilityRegistry::new();
        let config = serde_json::Value::Null;
        let mut module = AudioModule::default();

        let mut host = HostContext::new("audio", &mut capabilities, None, &config);
        module.initialize(&mut host).unwrap();
        for staged in host.into_staged() {
            capabilities.apply(staged);
        }

        let audio = capabilities.get::<dyn AudioBackend>().unwrap();
        let voice = audio.play(&SoundDesc::default());
        assert!(audio.is_playing(voice));

        module.shutdown();
    }
}
