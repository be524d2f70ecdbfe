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

//! Content-addressed blob storage. Every distinct file content is written
//! once under `.mvcs/contents/<ContentId>`, keyed by a freshly minted id
//! rather than the hash itself (ids remain opaque; see [`crate::ids`]), with
//! whole-file SHA-256 used only to detect duplicates.

use std::path::Path;
use std::path::PathBuf;

use tracing::trace;

use crate::error::Result;
use crate::ids::ContentId;
use crate::project::Project;

impl Project {
    pub fn content_path(&self, content_id: &ContentId) -> PathBuf {
        self.contents_dir().join(content_id.as_str())
    }

    /// Hashes the blob stored under `content_id`, consulting (and
    /// populating) the in-memory hash cache first.
    pub(crate) fn hash_of_content(&self, content_id: &ContentId) -> Result<String> {
        let path = self.content_path(content_id);
        if let Some(hash) = self.blob_hash_cache.lock().unwrap().get(&path) {
            return Ok(hash.clone());
        }
        let hash = self.storage.hash_file(&path)?;
        self.blob_hash_cache
            .lock()
            .unwrap()
            .insert(path, hash.clone());
        Ok(hash)
    }

    /// Adds `source`'s content to the pool, deduplicating against every blob
    /// already referenced by a live item. Returns the [`ContentId`] to
    /// record: an existing one on a hash match, or a freshly minted one
    /// after copying `source` in.
    ///
    /// Scans `self.items` rather than the `contents/` directory itself, per
    /// the documented algorithm — so a blob that's on disk but no longer
    /// referenced by any item (there is no GC in this version) is never
    /// matched against, and can never be handed back out as if it were live.
    pub fn add_content(&self, source: &Path) -> Result<ContentId> {
        let incoming_hash = self.storage.hash_file(source)?;

        for item in self.items.values() {
            if self.hash_of_content(&item.content_id)? == incoming_hash {
                trace!(content_id = %item.content_id, "content pool hit");
                return Ok(item.content_id.clone());
            }
        }

        let new_id = ContentId::new(self.id_generator.next_id());
        let dest = self.content_path(&new_id);
        self.storage.copy_file(source, &dest)?;
        self.blob_hash_cache
            .lock()
            .unwrap()
            .insert(dest, incoming_hash);
        trace!(content_id = %new_id, "content pool miss, stored new blob");
        Ok(new_id)
    }

    /// Copies the stored blob for `content_id` out to `dest` (used by the
    /// checkout engine to materialize a working-tree file).
    pub fn materialize_content(&self, content_id: &ContentId, dest: &Path) -> Result<()> {
        self.storage.copy_file(&self.content_path(content_id), dest)
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
    fn distinct_content_gets_distinct_ids() {
        let (dir, project) = new_test_project();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, b"first").unwrap();
        std::fs::write(&b, b"second").unwrap();

        let id_a = project.add_content(&a).unwrap();
        let id_b = project.add_content(&b).unwrap();
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn add_content_with_no_live_items_never_dedupes() {
        let (dir, project) = new_test_project();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, b"same bytes").unwrap();
        std::fs::write(&b, b"same bytes").unwrap();

        // No items exist yet, so add_content can't find anything to dedupe
        // against regardless of on-disk content; it always allocates fresh.
        let id_a = project.add_content(&a).unwrap();
        let id_b = project.add_content(&b).unwrap();
        assert_ne!(id_a, id_b);
    }
}
