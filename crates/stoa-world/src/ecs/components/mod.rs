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

//! The standard component set consumed by the built-in pass pipeline.

mod audio;
mod global_transform;
mod light;
mod name;
mod parent;
mod physics;
mod renderable;
mod script;
mod transform;

pub use audio::AudioSourceRef;
pub use global_transform::GlobalTransform;
pub use light::Light;
pub use name::Name;
pub use parent::Parent;
pub use physics::RigidBodyRef;
pub use renderable::Renderable;
pub use script::ScriptRef;
pub use transform::Transform;
