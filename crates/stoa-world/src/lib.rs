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

//! # Stoa World
//!
//! The shared entity/component store. Every engine pass and module reads and
//! mutates game state through the [`World`] defined here; nothing else in the
//! workspace owns entity data.
//!
//! Storage is dense per component type: each registered type gets one column
//! holding its values contiguously, addressed through generational
//! [`EntityId`]s so stale handles can never alias a recycled slot.

#![warn(missing_docs)]

pub mod ecs;

pub use ecs::{
    AudioSourceRef, Component, EntityId, GlobalTransform, Light, Name, Parent, Renderable,
    RigidBodyRef, ScriptRef, Transform, World,
};
