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

//! The entity/component store.
//!
//! Entities are generational ids handed out by an internal slot allocator;
//! component values live in one dense column per type, type-erased behind
//! [`column::AnyColumn`] so the [`World`] can despawn an entity from every
//! column it appears in without knowing the concrete types. The primary entry
//! point is the [`World`] struct.

mod column;
mod component;
mod components;
mod entity;
mod entity_store;
mod world;

pub use component::Component;
pub use components::*;
pub use entity::EntityId;
pub use world::World;

#[cfg(test)]
mod tests;
