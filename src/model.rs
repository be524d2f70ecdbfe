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

//! Domain model: the global item table and the commit graph folded over it.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::ids::CommitId;
use crate::ids::ContentId;
use crate::ids::ItemId;

/// A single versioned file, identified for life by its [`ItemId`] regardless
/// of how many times it's renamed. Items live forever in
/// [`crate::project::Project::items`], keyed by id; a commit's changes only
/// reference item ids, never embed a copy of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub content_id: ContentId,
    /// Slash-separated path, relative to the project root.
    pub path: String,
}

impl Item {
    pub fn new(id: ItemId, content_id: ContentId, path: impl Into<String>) -> Self {
        Self {
            id,
            content_id,
            path: path.into(),
        }
    }
}

/// One entry in a commit's change list: a `(from?, to?)` pair of item ids.
/// `{to}` is an addition, `{from, to}` a replacement (modification or a
/// rename/copy that reuses the same item id... actually a rename keeps the
/// *old* item's id as `from` and mints a fresh one as `to`; see
/// [`crate::status`]), and `{from}` a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChange {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to: Option<ItemId>,
}

impl ItemChange {
    pub fn addition(to: ItemId) -> Self {
        Self { from: None, to: Some(to) }
    }

    pub fn replacement(from: ItemId, to: ItemId) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn deletion(from: ItemId) -> Self {
        Self { from: Some(from), to: None }
    }
}

/// One node in the commit graph: a parent pointer plus the ordered list of
/// item-id changes that moved the tree from the parent's item set to this
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<CommitId>,
    #[serde(default)]
    pub children: Vec<CommitId>,
    pub author_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// ISO-8601 UTC timestamp, as produced by [`crate::clock::Clock::now`].
    pub date: String,
    pub changes: Vec<ItemChange>,
}

impl Commit {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CommitId,
        parent: Option<CommitId>,
        author_id: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
        date: impl Into<String>,
        changes: Vec<ItemChange>,
    ) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            author_id: author_id.into(),
            title: title.into(),
            description,
            date: date.into(),
            changes,
        }
    }
}

/// A commit graph as a plain map, the shape persisted and folded over.
pub type CommitGraph = BTreeMap<CommitId, Commit>;

/// The Project's global item table, keyed by id.
pub type ItemTable = BTreeMap<ItemId, Item>;

/// An item set as visible at some commit: a subset of [`ItemTable`].
pub type ItemSet = BTreeMap<ItemId, Item>;
