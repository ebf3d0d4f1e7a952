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

//! Defines the error taxonomy of the module runtime.

use std::fmt;

/// Boxed error type used at the module contract boundary.
///
/// Modules report `initialize`/`update`/`render` failures through this type;
/// the runtime wraps it into the matching [`RuntimeError`] variant where a
/// structured error is required.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// An error produced by the module runtime: registration, dependency
/// resolution, initialization, capability lookup, or hot-reload.
#[derive(Debug)]
pub enum RuntimeError {
    /// A module with the same name is already registered.
    DuplicateModule {
        /// The name that was registered twice.
        module: String,
    },
    /// A declared dependency does not correspond to any registered module.
    MissingDependency {
        /// The module declaring the dependency.
        module: String,
        /// The dependency name that could not be found.
        dependency: String,
    },
    /// The declared dependencies form at least one cycle.
    DependencyCycle {
        /// The modules left unordered once resolution stalled; every member
        /// of every cycle is included.
        involved: Vec<String>,
    },
    /// The module was built against a different host ABI revision.
    ApiVersionMismatch {
        /// The offending module.
        module: String,
        /// The ABI revision the host supports.
        expected: u32,
        /// The ABI revision the module declares.
        found: u32,
    },
    /// A module's `initialize` returned an error; startup was rolled back.
    InitializationFailed {
        /// The module whose initialization failed.
        module: String,
        /// The error the module reported.
        source: BoxedError,
    },
    /// No provider (instance or factory) is registered for a capability.
    ServiceUnavailable {
        /// The capability's type name, for diagnostics.
        capability: &'static str,
    },
    /// A hot-reload attempt failed; the previous instance is still active.
    ReloadFailed {
        /// The module whose reload failed.
        module: String,
        /// Why the reload was rejected or the fresh instance failed.
        reason: String,
    },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::DuplicateModule { module } => {
                write!(f, "Module '{module}' is already registered")
            }
            RuntimeError::MissingDependency { module, dependency } => {
                write!(
                    f,
                    "Module '{module}' depends on '{dependency}', which is not registered"
                )
            }
            RuntimeError::DependencyCycle { involved } => {
                write!(
                    f,
                    "Dependency cycle detected among modules: {}",
                    involved.join(", ")
                )
            }
            RuntimeError::ApiVersionMismatch {
                module,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Module '{module}' declares api version {found}, host supports {expected}"
                )
            }
            RuntimeError::InitializationFailed { module, source } => {
                write!(f, "Initialization of module '{module}' failed: {source}")
            }
            RuntimeError::ServiceUnavailable { capability } => {
                write!(f, "No provider registered for capability '{capability}'")
            }
            RuntimeError::ReloadFailed { module, reason } => {
                write!(f, "Reload of module '{module}' failed: {reason}")
            }
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::InitializationFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
