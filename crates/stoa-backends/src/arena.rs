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

//! Slot arena that issues generational [`Handle`]s.
//!
//! Every provider in this crate stores its resources in one of these.
//! Freed slots are recycled with a bumped generation, so a handle held
//! past `remove` goes quietly dead instead of aliasing the next resource.

use std::marker::PhantomData;

use stoa_core::contract::Handle;

/// Generational storage keyed by [`Handle<R>`].
///
/// `R` is the resource marker the handles are branded with, `T` the value
/// actually stored.
pub(crate) struct HandleArena<R: ?Sized, T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    alive: usize,
    marker: PhantomData<fn() -> R>,
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

impl<R: ?Sized, T> Default for HandleArena<R, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            alive: 0,
            marker: PhantomData,
        }
    }
}

impl<R: ?Sized, T> HandleArena<R, T> {
    /// Stores `value` and returns the handle that names it.
    pub fn insert(&mut self, value: T) -> Handle<R> {
        self.alive += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            Handle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            Handle::new(index, 0)
        }
    }

    /// Removes the value behind `handle`, if it is still live.
    pub fn remove(&mut self, handle: Handle<R>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() || slot.value.is_none() {
            return None;
        }
        self.alive -= 1;
        self.free.push(handle.index());
        slot.value.take()
    }

    pub fn get(&self, handle: Handle<R>) -> Option<&T> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle<R>) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn contains(&self, handle: Handle<R>) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.alive
    }

    /// Iterates live entries with the handles that name them.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<R>, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let handle = Handle::new(index as u32, slot.generation);
            slot.value.as_ref().map(|value| (handle, value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<R>, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let handle = Handle::new(index as u32, slot.generation);
                slot.value.as_mut().map(|value| (handle, value))
            })
    }
}
