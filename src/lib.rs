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

//! A minimal content-addressed version-control engine: a commit graph over a
//! working tree, content-pool deduplication, and branches.
//!
//! [`Project`] is the entry point. It owns the persisted commit/branch state
//! plus the collaborators (a [`storage::StorageProvider`], an
//! [`ids::IdGenerator`], a [`clock::Clock`]) every operation runs through,
//! which is what makes the whole engine deterministic under test.

pub mod branch;
pub mod checkout;
pub mod clock;
pub mod commit_engine;
pub mod content_pool;
pub mod error;
pub mod history;
pub mod ids;
pub mod model;
pub mod path_util;
pub mod project;
pub mod status;
pub mod storage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::Error;
pub use error::Result;
pub use model::Commit;
pub use model::Item;
pub use model::ItemChange;
pub use project::Project;
