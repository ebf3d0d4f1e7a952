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

//! A type-indexed registry of capability providers.
//!
//! The [`CapabilityRegistry`] maps a capability identity (the [`TypeId`] of
//! the capability type, typically a trait object such as
//! `dyn RenderBackend`) to exactly one active provider, stored as a shared
//! [`Arc`]. A lazy factory may stand in for the provider until the first
//! lookup. Consumers resolve by identity on each use rather than caching a
//! reference, which is what makes hot-reloading a provider safe: after a
//! swap, the next lookup sees the replacement, and the per-identity
//! [`epoch`](CapabilityRegistry::epoch) tells within-frame caches that their
//! handle went stale.
//!
//! The registry is a single-writer-from-main-thread structure. Worker
//! threads read through a [`CapabilitySnapshot`] taken at a sync point,
//! never through the registry itself.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::error::RuntimeError;

type ErasedInstance = Arc<dyn Any + Send + Sync>;
type ErasedFactory = Box<dyn Any + Send + Sync>;
type Factory<C> = Box<dyn Fn() -> Arc<C> + Send + Sync>;

#[derive(Default)]
struct CapabilityEntry {
    /// Concrete stored type is always `Arc<C>` for the entry's key `C`.
    instance: Option<ErasedInstance>,
    /// Concrete stored type is always `Factory<C>` for the entry's key `C`.
    factory: Option<ErasedFactory>,
}

/// One active provider per capability identity, with optional lazy
/// construction and replacement tracking.
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: HashMap<TypeId, CapabilityEntry>,
    /// Epochs outlive their entry so a reset-then-reprovide is observable.
    epochs: HashMap<TypeId, u64>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `instance` as the active provider for `C`, evicting any
    /// prior provider and bumping the identity's epoch.
    ///
    /// The registry keeps a shared handle; the registering module keeps its
    /// own and remains the authority over the provider's internal state.
    pub fn provide<C>(&mut self, instance: Arc<C>)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let id = TypeId::of::<C>();
        let entry = self.entries.entry(id).or_default();
        let replaced = entry.instance.is_some();
        entry.instance = Some(Arc::new(instance));
        self.bump_epoch(id);
        if replaced {
            debug!("Capability '{}' provider replaced", type_name::<C>());
        } else {
            debug!("Capability '{}' provided", type_name::<C>());
        }
    }

    /// Installs a lazy constructor for `C`, used the first time
    /// [`get`](Self::get) runs with no active instance.
    ///
    /// The factory must not call back into the registry.
    pub fn provide_factory<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        let boxed: Factory<C> = Box::new(factory);
        let entry = self.entries.entry(TypeId::of::<C>()).or_default();
        entry.factory = Some(Box::new(boxed));
        debug!("Capability '{}' factory installed", type_name::<C>());
    }

    /// Returns the active provider for `C`, realizing the factory exactly
    /// once and caching the result if no instance is active yet.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::ServiceUnavailable`] when neither an instance nor a
    /// factory is registered for `C`.
    pub fn get<C>(&mut self) -> Result<Arc<C>, RuntimeError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let id = TypeId::of::<C>();
        if let Some(typed) = self
            .entries
            .get(&id)
            .and_then(|entry| entry.instance.as_ref())
            .and_then(|instance| instance.downcast_ref::<Arc<C>>())
        {
            return Ok(typed.clone());
        }

        let realized: Option<Arc<C>> = self
            .entries
            .get(&id)
            .and_then(|entry| entry.factory.as_ref())
            .and_then(|factory| factory.downcast_ref::<Factory<C>>())
            .map(|factory| factory());

        match realized {
            Some(instance) => {
                if let Some(entry) = self.entries.get_mut(&id) {
                    entry.instance = Some(Arc::new(instance.clone()));
                }
                self.bump_epoch(id);
                trace!("Capability '{}' realized from factory", type_name::<C>());
                Ok(instance)
            }
            None => Err(RuntimeError::ServiceUnavailable {
                capability: type_name::<C>(),
            }),
        }
    }

    /// Returns the active instance for `C` without realizing a factory.
    ///
    /// Render-phase lookups use this: lazy construction belongs to the
    /// update phase.
    #[must_use]
    pub fn try_get<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.entries
            .get(&TypeId::of::<C>())
            .and_then(|entry| entry.instance.as_ref())
            .and_then(|instance| instance.downcast_ref::<Arc<C>>())
            .cloned()
    }

    /// Returns `true` if [`get`](Self::get) would succeed for `C`, through
    /// either an active instance or a pending factory.
    #[must_use]
    pub fn is_available<C>(&self) -> bool
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.entries
            .get(&TypeId::of::<C>())
            .map(|entry| entry.instance.is_some() || entry.factory.is_some())
            .unwrap_or(false)
    }

    /// Clears the provider and factory for `C`, bumping the epoch if
    /// anything was present. A later, different module can then take over
    /// the same capability identity.
    pub fn reset<C>(&mut self)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let id = TypeId::of::<C>();
        if self.reset_erased(id) {
            debug!("Capability '{}' cleared", type_name::<C>());
        }
    }

    /// Clears a capability by raw identity. Used by the module registry,
    /// which tracks published capabilities as type ids.
    ///
    /// Returns `true` if an entry was actually removed.
    pub fn reset_erased(&mut self, id: TypeId) -> bool {
        if self.entries.remove(&id).is_some() {
            self.bump_epoch(id);
            true
        } else {
            false
        }
    }

    /// Applies a publication staged during a module's `initialize`.
    pub fn apply(&mut self, staged: StagedCapability) {
        let StagedCapability {
            id,
            capability,
            payload,
        } = staged;
        match payload {
            StagedPayload::Instance(instance) => {
                let entry = self.entries.entry(id).or_default();
                let replaced = entry.instance.is_some();
                entry.instance = Some(instance);
                self.bump_epoch(id);
                if replaced {
                    debug!("Capability '{capability}' provider replaced");
                } else {
                    debug!("Capability '{capability}' provided");
                }
            }
            StagedPayload::Factory(factory) => {
                let entry = self.entries.entry(id).or_default();
                entry.factory = Some(factory);
                debug!("Capability '{capability}' factory installed");
            }
        }
    }

    /// Returns how many times the provider for `C` has been installed or
    /// cleared. Starts at zero; survives [`reset`](Self::reset).
    #[must_use]
    pub fn epoch<C>(&self) -> u64
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.epochs.get(&TypeId::of::<C>()).copied().unwrap_or(0)
    }

    /// Takes a read-only view of the currently active instances, safe to
    /// hand to worker threads. Factories are not part of a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CapabilitySnapshot {
        let instances = self
            .entries
            .iter()
            .filter_map(|(id, entry)| entry.instance.clone().map(|instance| (*id, instance)))
            .collect();
        CapabilitySnapshot { instances }
    }

    /// Returns the number of capability identities with an instance or a
    /// factory registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bump_epoch(&mut self, id: TypeId) {
        *self.epochs.entry(id).or_insert(0) += 1;
    }
}

enum StagedPayload {
    Instance(ErasedInstance),
    Factory(ErasedFactory),
}

/// A capability publication recorded during a module's `initialize` and
/// applied to the registry only after that `initialize` succeeds.
///
/// Staging is what keeps startup and reload transactional: a failed
/// `initialize` drops its staged publications instead of leaving partial
/// provides behind.
pub struct StagedCapability {
    id: TypeId,
    capability: &'static str,
    payload: StagedPayload,
}

impl StagedCapability {
    /// Stages an instance publication for `C`.
    pub fn instance<C>(instance: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            id: TypeId::of::<C>(),
            capability: type_name::<C>(),
            payload: StagedPayload::Instance(Arc::new(instance)),
        }
    }

    /// Stages a factory publication for `C`.
    pub fn factory<C, F>(factory: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        let boxed: Factory<C> = Box::new(factory);
        Self {
            id: TypeId::of::<C>(),
            capability: type_name::<C>(),
            payload: StagedPayload::Factory(Box::new(boxed)),
        }
    }

    /// The capability identity this publication targets.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The capability's type name, for diagnostics and replacement events.
    #[must_use]
    pub fn capability(&self) -> &'static str {
        self.capability
    }
}

/// A read-only view of the active providers at the moment
/// [`CapabilityRegistry::snapshot`] was called.
///
/// Cloning is cheap (per-entry `Arc` clone). Snapshots never realize
/// factories.
#[derive(Clone, Default)]
pub struct CapabilitySnapshot {
    instances: HashMap<TypeId, ErasedInstance>,
}

impl CapabilitySnapshot {
    /// Returns the instance that was active for `C` when the snapshot was
    /// taken.
    #[must_use]
    pub fn get<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.instances
            .get(&TypeId::of::<C>())
            .and_then(|instance| instance.downcast_ref::<Arc<C>>())
            .cloned()
    }

    /// Returns `true` if an instance for `C` was active at snapshot time.
    #[must_use]
    pub fn is_available<C>(&self) -> bool
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.instances.contains_key(&TypeId::of::<C>())
    }

    /// Number of instances captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if no instance was active at snapshot time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
