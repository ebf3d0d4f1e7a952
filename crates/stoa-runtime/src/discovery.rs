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

//! Module descriptor discovery and entry-point resolution.
//!
//! Descriptors are `<name>.module.json` files under a modules directory,
//! one per module. Discovery loads and validates them; the
//! [`ModuleCatalog`] turns each descriptor's `entry_point` into the factory
//! that builds the module, since modules here are compiled into the host
//! rather than loaded from dynamic libraries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;
use walkdir::WalkDir;

use stoa_core::module::DescriptorValidationError;
use stoa_core::{Module, ModuleDescriptor};

use crate::registry::ModuleFactory;

/// An error loading or resolving a module descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// A descriptor file could not be read.
    #[error("failed to read module descriptor '{path}'")]
    Io {
        /// The descriptor file path.
        path: String,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// A descriptor file is not valid JSON for the descriptor schema.
    #[error("module descriptor '{path}' is not valid JSON")]
    Parse {
        /// The descriptor file path.
        path: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// A descriptor parsed but fails structural validation.
    #[error("module descriptor '{path}' is invalid")]
    Invalid {
        /// The descriptor file path.
        path: String,
        /// What is wrong with it.
        #[source]
        source: DescriptorValidationError,
    },
    /// A descriptor names an entry point no factory is registered for.
    #[error("module '{module}' names entry point '{entry_point}', which is not in the catalog")]
    UnknownEntryPoint {
        /// The module whose entry point is unresolved.
        module: String,
        /// The unresolved entry-point symbol.
        entry_point: String,
    },
}

/// Scans `dir` for `*.module.json` files, at most one directory level deep
/// (the conventional layout is one subdirectory per module).
///
/// Returns the parsed, validated descriptors sorted by file path, so the
/// discovery order is stable across platforms and runs.
///
/// # Errors
///
/// The first unreadable, unparseable, or invalid descriptor aborts the
/// scan; a broken descriptor file is a deployment error, not something to
/// skip quietly.
pub fn discover_descriptors(dir: impl AsRef<Path>) -> Result<Vec<ModuleDescriptor>, DescriptorError> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(".module.json"))
        })
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();

    let mut descriptors = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(&path).map_err(|source| DescriptorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let descriptor: ModuleDescriptor =
            serde_json::from_str(&text).map_err(|source| DescriptorError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        descriptor
            .validate()
            .map_err(|source| DescriptorError::Invalid {
                path: path.display().to_string(),
                source,
            })?;
        debug!(
            "Discovered module '{}' v{} at {}",
            descriptor.name,
            descriptor.version,
            path.display()
        );
        descriptors.push(descriptor);
    }
    info!(
        "{} module descriptors discovered under '{}'",
        descriptors.len(),
        dir.display()
    );
    Ok(descriptors)
}

/// Maps entry-point symbol names to module factories.
///
/// The host registers a factory per entry point it was compiled with;
/// discovered descriptors are then resolved against the catalog before
/// registration.
#[derive(Default)]
pub struct ModuleCatalog {
    factories: HashMap<String, ModuleFactory>,
}

impl ModuleCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the factory behind an entry-point symbol, replacing any
    /// previous registration for the same symbol.
    pub fn register_entry_point<F>(&mut self, entry_point: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Module> + Send + Sync + 'static,
    {
        let entry_point = entry_point.into();
        if self
            .factories
            .insert(entry_point.clone(), Arc::new(factory))
            .is_some()
        {
            warn!("Entry point '{entry_point}' re-registered, replacing previous factory");
        }
    }

    /// Resolves a descriptor's entry point to its factory.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::UnknownEntryPoint`] when the host was not
    /// compiled with a factory for the symbol.
    pub fn resolve(&self, descriptor: &ModuleDescriptor) -> Result<ModuleFactory, DescriptorError> {
        self.factories
            .get(&descriptor.entry_point)
            .cloned()
            .ok_or_else(|| DescriptorError::UnknownEntryPoint {
                module: descriptor.name.clone(),
                entry_point: descriptor.entry_point.clone(),
            })
    }

    /// Returns `true` if a factory is registered for this symbol.
    #[must_use]
    pub fn contains(&self, entry_point: &str) -> bool {
        self.factories.contains_key(entry_point)
    }

    /// Number of registered entry points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no entry points are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
