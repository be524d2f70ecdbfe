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

//! Wall-clock time source, injectable so commit timestamps are deterministic
//! in tests.

use std::fmt;

use chrono::SecondsFormat;
use chrono::Utc;

/// Produces the ISO-8601 UTC timestamp stamped on a newly recorded commit.
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> String;
}

/// Default clock, backed by the system wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_produces_iso8601_with_millis_and_z() {
        let now = SystemClock.now();
        assert!(now.ends_with('Z'));
        assert!(now.contains('.'));
    }
}
