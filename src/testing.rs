// Copyright 2026 The MVCS Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Deterministic test fakes, gated behind `cfg(test)` and the `testing`
//! feature the way jj-lib's own test backend is exposed to its `testutils`
//! crate.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::clock::Clock;
use crate::ids::IdGenerator;

/// Produces `"uuid-0"`, `"uuid-1"`, ... in call order, so a whole end-to-end
/// scenario's ids are reproducible across runs.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("uuid-{n}")
    }
}

/// A clock that always reports the same fixed instant, so commit timestamps
/// in tests don't depend on when the test happened to run.
#[derive(Debug)]
pub struct FixedClock {
    timestamp: String,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self {
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }
}

impl FixedClock {
    pub fn at(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.timestamp.clone()
    }
}

/// A fresh, uniquely named temp directory, cleaned up on drop.
pub fn new_temp_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("mvcs-test-")
        .tempdir()
        .expect("failed to create temp dir")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_id_generator_counts_up() {
        let gen = SequentialIdGenerator::default();
        assert_eq!(gen.next_id(), "uuid-0");
        assert_eq!(gen.next_id(), "uuid-1");
    }

    #[test]
    fn fixed_clock_never_changes() {
        let clock = FixedClock::default();
        assert_eq!(clock.now(), clock.now());
    }
}
