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

//! Opaque identifiers handed out by an [`IdGenerator`] and threaded through
//! the commit graph. Unlike a content-hash id, these carry no meaning beyond
//! identity: the core never parses or recomputes one.

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// Defines a newtype wrapping a single opaque `String` id, with the Display,
// (de)serialization, and map-key plumbing every id family needs. Mirrors the
// shape of jj-lib's `id_type!` macro, minus the hash/hex machinery: these ids
// are opaque strings handed out by an `IdGenerator`, not derived hashes.
macro_rules! opaque_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifies a [`Project`](crate::project::Project) itself.
    ProjectId
);
opaque_id!(
    /// Identifies an [`Item`](crate::model::Item).
    ItemId
);
opaque_id!(
    /// Identifies a content blob stored under `.mvcs/contents/`.
    ContentId
);
opaque_id!(
    /// Identifies a [`Commit`](crate::model::Commit) in the history graph.
    CommitId
);

impl ContentId {
    /// In-memory-only sentinel marking an item whose blob allocation has
    /// been deferred from status-computation time to commit time. Never
    /// written to `project.json`.
    const DUMMY: &'static str = "DUMMY";

    pub fn dummy() -> Self {
        Self(Self::DUMMY.to_owned())
    }

    pub fn is_dummy(&self) -> bool {
        self.0 == Self::DUMMY
    }
}

/// Fresh, collision-free identifier generation. Implementations are expected
/// to never repeat a value for the lifetime of a process; the core treats the
/// returned strings as opaque.
pub trait IdGenerator: fmt::Debug + Send + Sync {
    fn next_id(&self) -> String;
}

/// Default generator, producing random UUIDv4 strings.
#[derive(Debug, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_ids_roundtrip_through_json() {
        let id = CommitId::new("abc123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");
        let back: CommitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn random_id_generator_does_not_repeat() {
        let gen = RandomIdGenerator;
        let a = gen.next_id();
        let b = gen.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn dummy_content_id_is_recognized() {
        assert!(ContentId::dummy().is_dummy());
        assert!(!ContentId::new("uuid-3").is_dummy());
    }
}
