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

//! Reconstructing the item set visible at an arbitrary commit by folding the
//! chain of `{from?, to?}` changes from the project root down to that
//! commit.

use std::collections::BTreeSet;

use crate::error::Error;
use crate::error::Result;
use crate::ids::CommitId;
use crate::model::ItemSet;
use crate::project::Project;

impl Project {
    /// The ordered chain of commits from the root commit down to (and
    /// including) `commit_id`, root first. Bounded by the graph's own size:
    /// a parent cycle (which a well-formed graph never has) is reported as
    /// corruption rather than looping forever.
    pub fn ancestor_chain(&self, commit_id: &CommitId) -> Result<Vec<CommitId>> {
        let mut chain = Vec::new();
        let mut current = Some(commit_id.clone());
        let limit = self.commits.len() + 1;

        while let Some(id) = current {
            if chain.len() > limit {
                return Err(Error::Corrupt(format!(
                    "cycle detected while walking ancestors of commit '{commit_id}'"
                )));
            }
            let commit = self.commits.get(&id).ok_or_else(|| Error::NotFound {
                kind: "commit",
                id: id.to_string(),
            })?;
            chain.push(id.clone());
            current = commit.parent.clone();
        }

        chain.reverse();
        Ok(chain)
    }

    /// The item set as of `commit_id`: the chain's changes are folded root
    /// to target, `to` before `from` within each change (this only matters
    /// for the disallowed case `from == to`), and each surviving item id is
    /// then looked up in the project's global item table.
    pub fn get_commit_items(&self, commit_id: &CommitId) -> Result<ItemSet> {
        let chain = self.ancestor_chain(commit_id)?;
        let mut present = BTreeSet::new();

        for id in chain {
            let commit = self.commits.get(&id).expect("id came from ancestor_chain");
            for change in &commit.changes {
                if let Some(to) = &change.to {
                    present.insert(to.clone());
                }
                if let Some(from) = &change.from {
                    present.remove(from);
                }
            }
        }

        let mut items = ItemSet::new();
        for item_id in present {
            let item = self.items.get(&item_id).ok_or_else(|| {
                Error::Corrupt(format!(
                    "commit '{commit_id}' references item '{item_id}' missing from the item table"
                ))
            })?;
            items.insert(item_id, item.clone());
        }
        Ok(items)
    }
}
