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

/// Marker trait for types that can be attached to an entity.
///
/// `'static` rules out borrowed data inside a component, and `Send + Sync`
/// lets worker threads hand component values back to the main thread at the
/// frame sync points.
pub trait Component: 'static + Send + Sync {}
