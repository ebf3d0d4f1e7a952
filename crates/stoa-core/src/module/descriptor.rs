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

//! Static module metadata, loaded independently of module code.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Version;

/// Static metadata describing a module: identity, versioning, dependencies,
/// and how to construct an instance.
///
/// Descriptors are immutable once loaded. They typically live in a
/// `<name>.module.json` file next to the module they describe, but can also
/// be built in code for modules compiled into the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique module name; the registry key.
    pub name: String,
    /// The module's own semantic version.
    pub version: Version,
    /// The host ABI revision the module was built against. Must match the
    /// host's supported value exactly.
    pub api_version: u32,
    /// Names of modules that must initialize before this one.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Symbol name resolved against the factory catalog to construct the
    /// module instance.
    pub entry_point: String,
    /// Whether the module supports being hot-reloaded in place.
    #[serde(default)]
    pub reloadable: bool,
}

impl ModuleDescriptor {
    /// Builds a descriptor with no dependencies and reload disabled.
    pub fn new(
        name: impl Into<String>,
        version: Version,
        api_version: u32,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            api_version,
            dependencies: Vec::new(),
            entry_point: entry_point.into(),
            reloadable: false,
        }
    }

    /// Adds dependency names, preserving declaration order.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    /// Marks the module as hot-reloadable.
    #[must_use]
    pub fn reloadable(mut self) -> Self {
        self.reloadable = true;
        self
    }

    /// Checks structural validity: non-empty name and entry point, no
    /// self-dependency, no duplicated dependency names.
    ///
    /// Api-version and dependency-existence checks belong to the module
    /// registry, which knows the host's supported revision and the full
    /// module set.
    pub fn validate(&self) -> Result<(), DescriptorValidationError> {
        if self.name.is_empty() {
            return Err(DescriptorValidationError::EmptyName);
        }
        if self.entry_point.is_empty() {
            return Err(DescriptorValidationError::EmptyEntryPoint {
                module: self.name.clone(),
            });
        }
        for (position, dependency) in self.dependencies.iter().enumerate() {
            if dependency == &self.name {
                return Err(DescriptorValidationError::SelfDependency {
                    module: self.name.clone(),
                });
            }
            if self.dependencies[..position].contains(dependency) {
                return Err(DescriptorValidationError::DuplicateDependency {
                    module: self.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Structural problems a descriptor can carry before it ever reaches the
/// registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorValidationError {
    /// The `name` field is empty.
    EmptyName,
    /// The `entry_point` field is empty.
    EmptyEntryPoint {
        /// The module with the empty entry point.
        module: String,
    },
    /// The module lists itself as a dependency.
    SelfDependency {
        /// The self-depending module.
        module: String,
    },
    /// The same dependency name appears twice.
    DuplicateDependency {
        /// The module declaring the duplicate.
        module: String,
        /// The repeated dependency name.
        dependency: String,
    },
}

impl fmt::Display for DescriptorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorValidationError::EmptyName => {
                write!(f, "Module descriptor has an empty name")
            }
            DescriptorValidationError::EmptyEntryPoint { module } => {
                write!(f, "Module '{module}' has an empty entry point")
            }
            DescriptorValidationError::SelfDependency { module } => {
                write!(f, "Module '{module}' lists itself as a dependency")
            }
            DescriptorValidationError::DuplicateDependency { module, dependency } => {
                write!(
                    f,
                    "Module '{module}' lists dependency '{dependency}' more than once"
                )
            }
        }
    }
}

impl std::error::Error for DescriptorValidationError {}
