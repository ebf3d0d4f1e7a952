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

//! Frame delta measurement with clamping.

use std::time::{Duration, Instant};

/// Measures the wall-clock time between loop iterations.
///
/// The engine calls [`tick`](FrameClock::tick) once at the top of each frame
/// and feeds the returned delta to every update. The delta is clamped so a
/// long stall (debugger pause, system sleep) produces one large-but-bounded
/// step instead of a simulation leap.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Creates a clock that has not ticked yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the time since the previous tick, clamped to `max_delta`.
    ///
    /// The first tick returns [`Duration::ZERO`]: there is no previous frame
    /// to measure against, and a zero-dt first frame is harmless while a
    /// startup-cost dt is not.
    pub fn tick(&mut self, max_delta: Duration) -> Duration {
        let now = Instant::now();
        let delta = match self.last {
            Some(last) => now.duration_since(last).min(max_delta),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        delta
    }

    /// Forgets the previous tick; the next one returns zero again.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
