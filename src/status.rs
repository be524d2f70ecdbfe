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

//! Working-tree diffing: comparing the files on disk against the item set at
//! the current commit, without touching the content pool or commit graph.

use std::collections::HashMap;
use std::collections::HashSet;

use tracing::trace;

use crate::error::Result;
use crate::ids::ContentId;
use crate::ids::ItemId;
use crate::model::Item;
use crate::model::ItemChange;
use crate::model::ItemTable;
use crate::project::Project;

/// Result of diffing the working tree against the current commit's item
/// set. `new_items` holds placeholder [`Item`]s for every addition and
/// modification: ones that reuse an existing blob (rename/copy detection)
/// carry a real [`ContentId`], the rest carry the `DUMMY` sentinel pending
/// blob allocation at commit time (see [`crate::commit_engine`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusResult {
    pub last_items: ItemTable,
    pub new_items: ItemTable,
    pub changes: Vec<ItemChange>,
}

impl StatusResult {
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty()
    }
}

impl Project {
    /// Every working-tree file path, slash-separated and relative to the
    /// project root, excluding `.mvcs` itself.
    pub fn candidate_paths(&self) -> Result<Vec<String>> {
        let ignore = vec![format!("{}/**", crate::project::PROJECT_DIR)];
        let mut paths: Vec<String> = self
            .storage
            .read_dir_deep(&self.root, &ignore)?
            .into_iter()
            .map(|p| {
                let relative = p.strip_prefix(&self.root).unwrap_or(&p);
                crate::path_util::to_slash(relative)
            })
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Computes `{lastItems, newItems, changes}` for the given `files` (or,
    /// if `None`, the union of the working tree and the current commit's
    /// item paths).
    pub fn status(&self, files: Option<&[String]>) -> Result<StatusResult> {
        let last_items = match &self.current_commit_id {
            Some(id) => self.get_commit_items(id)?,
            None => ItemTable::new(),
        };
        let by_path: HashMap<&str, &Item> =
            last_items.values().map(|item| (item.path.as_str(), item)).collect();

        let candidates = self.candidate_file_set(files, &last_items)?;

        let mut result = StatusResult {
            last_items: last_items.clone(),
            new_items: ItemTable::new(),
            changes: Vec::new(),
        };

        for path in candidates {
            let absolute = self.root.join(crate::path_util::from_slash(&path));
            if self.storage.is_dir(&absolute) {
                continue;
            }

            if !self.storage.exists(&absolute) {
                if let Some(item) = by_path.get(path.as_str()) {
                    result.changes.push(ItemChange::deletion(item.id.clone()));
                }
                continue;
            }

            let new_hash = self.storage.hash_file(&absolute)?;

            if let Some(item) = by_path.get(path.as_str()) {
                let stored_hash = self.hash_of_content(&item.content_id)?;
                if stored_hash == new_hash {
                    continue;
                }
                let new_item_id = ItemId::new(self.id_generator.next_id());
                let placeholder = Item::new(new_item_id.clone(), ContentId::dummy(), path.clone());
                trace!(path, item = %item.id, new_item = %new_item_id, "modified");
                result.new_items.insert(new_item_id.clone(), placeholder);
                result.changes.push(ItemChange::replacement(item.id.clone(), new_item_id));
            } else {
                let mut reused: Option<ContentId> = None;
                for candidate_item in last_items.values() {
                    if self.hash_of_content(&candidate_item.content_id)? == new_hash {
                        reused = Some(candidate_item.content_id.clone());
                        break;
                    }
                }
                let reused_blob = reused.is_some();
                let content_id = reused.unwrap_or_else(ContentId::dummy);
                let new_item_id = ItemId::new(self.id_generator.next_id());
                let placeholder = Item::new(new_item_id.clone(), content_id, path.clone());
                trace!(path, new_item = %new_item_id, reused_blob, "new or copy/move");
                result.new_items.insert(new_item_id.clone(), placeholder);
                result.changes.push(ItemChange::addition(new_item_id));
            }
        }

        Ok(result)
    }

    fn candidate_file_set(&self, files: Option<&[String]>, last_items: &ItemTable) -> Result<Vec<String>> {
        if let Some(files) = files {
            let mut seen = HashSet::new();
            let mut out = Vec::new();
            for f in files {
                if seen.insert(f.clone()) {
                    out.push(f.clone());
                }
            }
            return Ok(out);
        }

        // last_items first, so a path that's gone missing from the working
        // tree is classified (and its deletion emitted) before any path
        // that's new or moved is classified as an addition — matching the
        // documented rename-detection example, where the old path's
        // deletion precedes the new path's addition in `changes`.
        let mut out = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for item in last_items.values() {
            if seen.insert(item.path.clone()) {
                out.push(item.path.clone());
            }
        }
        for path in self.candidate_paths()? {
            if seen.insert(path.clone()) {
                out.push(path);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::project::Project;
    use crate::storage::FsStorageProvider;
    use crate::testing::new_temp_dir;
    use crate::testing::FixedClock;
    use crate::testing::SequentialIdGenerator;

    fn new_test_project() -> (tempfile::TempDir, Project) {
        let dir = new_temp_dir();
        let project = Project::create(
            dir.path(),
            Arc::new(FsStorageProvider::new()),
            Arc::new(SequentialIdGenerator::default()),
            Arc::new(FixedClock::default()),
            "tester",
            "test project",
            None,
        )
        .unwrap();
        (dir, project)
    }

    #[test]
    fn untracked_file_shows_up_as_an_addition() {
        let (dir, project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();

        let status = project.status(None).unwrap();
        assert_eq!(status.changes.len(), 1);
        assert!(status.changes[0].from.is_none());
        let new_item_id = status.changes[0].to.clone().unwrap();
        assert_eq!(status.new_items[&new_item_id].path, "a.txt");
        assert!(status.new_items[&new_item_id].content_id.is_dummy());
    }

    #[test]
    fn empty_working_tree_against_empty_history_is_clean() {
        let (_dir, project) = new_test_project();
        assert!(project.status(None).unwrap().is_clean());
    }
}
