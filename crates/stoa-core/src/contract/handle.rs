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

//! Typed, generational resource handles.

use std::any::type_name;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// An opaque handle into a typed arena owned by a backend.
///
/// The marker type `T` ties a handle to the resource kind it indexes, so a
/// mesh handle cannot be passed where a texture handle is expected. The
/// generation guards against index reuse: an arena slot that has been freed
/// and reallocated rejects handles carrying the old generation.
///
/// Handles neither own nor borrow the resource; a handle whose resource was
/// destroyed simply stops resolving.
pub struct Handle<T: ?Sized> {
    index: u32,
    generation: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T: ?Sized> Handle<T> {
    /// Builds a handle from its raw parts. Backends construct these; other
    /// code treats handles as opaque.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            marker: PhantomData,
        }
    }

    /// The arena slot this handle points at.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The slot generation this handle was issued for.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: the marker must not force bounds on `T`.

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Handle<T> {}

impl<T: ?Sized> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T: ?Sized> Eq for Handle<T> {}

impl<T: ?Sized> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = type_name::<T>().rsplit("::").next().unwrap_or("?");
        write!(f, "Handle<{}>({}v{})", kind, self.index, self.generation)
    }
}
