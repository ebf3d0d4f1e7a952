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

//! Dense per-type component storage.

use std::any::Any;

use super::component::Component;
use super::entity::EntityId;

/// Type-erased view of a column, enough for the world to despawn an entity
/// from every column without knowing the component types involved.
pub(crate) trait AnyColumn: Send + Sync {
    /// Casts to `&dyn Any` for downcasting to the concrete column.
    fn as_any(&self) -> &dyn Any;

    /// Casts to `&mut dyn Any` for downcasting to the concrete column.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Drops the entity's value if it holds one.
    fn remove_entity(&mut self, id: EntityId);

    /// Rows currently stored.
    fn len(&self) -> usize;
}

/// Storage for every value of one component type.
///
/// Values sit contiguously in `data`; `entities[i]` names the owner of
/// `data[i]`, and `rows` maps an entity index to its dense row for constant
/// time lookup. Removal is a swap-remove plus a fixup of the moved row's
/// entry.
///
/// Lookups compare the stored id's generation, so a stale id misses even
/// when its index has been recycled into this column. Inserts do not carry
/// that protection; the world validates ids against the entity store before
/// inserting.
pub(crate) struct ComponentColumn<T: Component> {
    data: Vec<T>,
    entities: Vec<EntityId>,
    rows: Vec<Option<u32>>,
}

impl<T: Component> ComponentColumn<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            entities: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn row_of(&self, id: EntityId) -> Option<usize> {
        let row = (*self.rows.get(id.index as usize)?)? as usize;
        (self.entities[row] == id).then_some(row)
    }

    /// Stores `value` for `id`, returning the previous value if the entity
    /// already had one.
    pub fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        if let Some(row) = self.row_of(id) {
            return Some(std::mem::replace(&mut self.data[row], value));
        }
        let index = id.index as usize;
        if self.rows.len() <= index {
            self.rows.resize(index + 1, None);
        }
        self.rows[index] = Some(self.data.len() as u32);
        self.data.push(value);
        self.entities.push(id);
        None
    }

    /// Takes `id`'s value out of the column.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let row = self.row_of(id)?;
        self.rows[id.index as usize] = None;
        let value = self.data.swap_remove(row);
        self.entities.swap_remove(row);
        // swap_remove moved the former last row into `row`; repoint its owner.
        if let Some(moved) = self.entities.get(row) {
            self.rows[moved.index as usize] = Some(row as u32);
        }
        Some(value)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.row_of(id).map(|row| &self.data[row])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.row_of(id).map(|row| &mut self.data[row])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.row_of(id).is_some()
    }

    /// Owners of every row, in dense storage order.
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.entities
    }
}

impl<T: Component> AnyColumn for ComponentColumn<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.remove(id);
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
