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

use std::any::TypeId;
use std::collections::HashMap;

use log::debug;

use super::column::{AnyColumn, ComponentColumn};
use super::component::Component;
use super::entity::EntityId;
use super::entity_store::EntityStore;

/// The central container for all entities and their components.
///
/// Component storage is one dense column per type, created lazily on first
/// insert. All mutation goes through `&mut self`, so a despawn removes the
/// entity from every column before anyone can observe the world again; no
/// reader ever sees an entity with only some of its components gone.
#[derive(Default)]
pub struct World {
    entities: EntityStore,
    columns: HashMap<TypeId, Box<dyn AnyColumn>>,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new, component-less entity.
    pub fn spawn(&mut self) -> EntityId {
        self.entities.allocate()
    }

    /// Destroys an entity and every component attached to it.
    ///
    /// Returns `false` for stale or never-issued ids, which are left alone.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if !self.entities.is_alive(id) {
            return false;
        }
        for column in self.columns.values_mut() {
            column.remove_entity(id);
        }
        self.entities.release(id)
    }

    /// Reports whether `id` refers to a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.is_alive(id)
    }

    /// Attaches `value` to `id`, replacing any previous value of the same
    /// type. Returns `false` without storing anything when `id` is stale.
    pub fn insert<T: Component>(&mut self, id: EntityId, value: T) -> bool {
        if !self.entities.is_alive(id) {
            return false;
        }
        self.column_mut::<T>().insert(id, value);
        true
    }

    /// Detaches and returns `id`'s value of type `T`, if it has one.
    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        self.column_opt_mut::<T>()?.remove(id)
    }

    /// Borrows `id`'s value of type `T`.
    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.column_opt::<T>()?.get(id)
    }

    /// Mutably borrows `id`'s value of type `T`.
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.column_opt_mut::<T>()?.get_mut(id)
    }

    /// Reports whether `id` currently has a value of type `T`.
    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.column_opt::<T>()
            .is_some_and(|column| column.contains(id))
    }

    /// Snapshots the set of entities that have a `T` right now, in storage
    /// order.
    ///
    /// Pass code iterates this owned list instead of borrowing the column,
    /// so entities spawned or despawned mid-pass never invalidate the
    /// iteration; additions simply wait until the next snapshot.
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        self.column_opt::<T>()
            .map(|column| column.entity_ids().to_vec())
            .unwrap_or_default()
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Number of stored values of type `T`.
    pub fn component_count<T: Component>(&self) -> usize {
        self.column_opt::<T>()
            .map_or(0, |column| column.entity_ids().len())
    }

    /// Drops every entity, component, and column.
    pub fn clear(&mut self) {
        let stored: usize = self.columns.values().map(|column| column.len()).sum();
        debug!(
            "Clearing world: {} entities, {} components in {} columns",
            self.entities.alive_count(),
            stored,
            self.columns.len()
        );
        self.columns.clear();
        self.entities.clear();
    }

    fn column_opt<T: Component>(&self) -> Option<&ComponentColumn<T>> {
        self.columns
            .get(&TypeId::of::<T>())
            .and_then(|column| column.as_any().downcast_ref())
    }

    fn column_opt_mut<T: Component>(&mut self) -> Option<&mut ComponentColumn<T>> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|column| column.as_any_mut().downcast_mut())
    }

    fn column_mut<T: Component>(&mut self) -> &mut ComponentColumn<T> {
        let column = self.columns.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(
                "Creating component column for {}",
                std::any::type_name::<T>()
            );
            Box::new(ComponentColumn::<T>::new())
        });
        column
            .as_any_mut()
            .downcast_mut()
            .unwrap_or_else(|| unreachable!("column registered under a foreign TypeId"))
    }
}
