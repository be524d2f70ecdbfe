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

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the core engine. The core never swallows an error: every
/// fallible operation fails the whole call, and partial working-tree side
/// effects are not rolled back (see the crate-level docs).
#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("multiple commit ids match prefix '{prefix}'")]
    Ambiguous { prefix: String },

    #[error("commit id prefix '{prefix}' is shorter than the minimum of {min} characters")]
    TooShort { prefix: String, min: usize },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("I/O error accessing {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt project data: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, Error>;
