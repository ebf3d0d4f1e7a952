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

//! The built-in frame pipeline.
//!
//! Installed in this fixed order: transform propagation, physics sync,
//! script ticking, audio reconciliation, light collection, draw submission.
//! Each capability-consuming pass idles quietly when its backend is not
//! installed, so the pipeline works in any partial engine configuration.

pub mod audio;
pub mod lighting;
pub mod physics;
pub mod render_submission;
pub mod script;
pub mod transform;

pub use audio::AudioPass;
pub use lighting::LightingPass;
pub use physics::PhysicsPass;
pub use render_submission::RenderSubmissionPass;
pub use script::ScriptPass;
pub use transform::TransformPass;
