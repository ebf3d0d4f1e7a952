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

//! Entity slot allocation and id validation.

use super::entity::EntityId;

/// Allocator for entity slots.
///
/// Keeps one slot per index ever issued. A slot records the id it last
/// handed out (index plus current generation) and whether that id is still
/// alive. Despawned indices go on a free list and are reused with the
/// generation bumped, which is what invalidates stale ids.
#[derive(Debug, Default)]
pub(crate) struct EntityStore {
    slots: Vec<(EntityId, bool)>,
    free: Vec<u32>,
    alive: usize,
}

impl EntityStore {
    /// Hands out a fresh id, recycling a freed slot when one is available.
    pub fn allocate(&mut self) -> EntityId {
        self.alive += 1;
        if let Some(index) = self.free.pop() {
            let (id_slot, alive_slot) = &mut self.slots[index as usize];
            id_slot.generation += 1;
            *alive_slot = true;
            *id_slot
        } else {
            let id = EntityId {
                index: self.slots.len() as u32,
                generation: 0,
            };
            self.slots.push((id, true));
            id
        }
    }

    /// Kills an id and queues its slot for reuse. Returns `false` for ids
    /// that are stale or were never issued.
    pub fn release(&mut self, id: EntityId) -> bool {
        match self.slots.get_mut(id.index as usize) {
            Some((slot_id, alive)) if *alive && slot_id.generation == id.generation => {
                *alive = false;
                self.free.push(id.index);
                self.alive -= 1;
                true
            }
            _ => false,
        }
    }

    /// Reports whether an id is current, i.e. issued and not yet released.
    pub fn is_alive(&self, id: EntityId) -> bool {
        matches!(
            self.slots.get(id.index as usize),
            Some((slot_id, true)) if slot_id.generation == id.generation
        )
    }

    /// Number of ids currently alive.
    pub fn alive_count(&self) -> usize {
        self.alive
    }

    /// Drops every slot and the free list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.alive = 0;
    }
}
