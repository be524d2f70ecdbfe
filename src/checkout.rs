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

//! Materializing a commit's item set into the working tree.

use std::collections::HashSet;

use tracing::info;
use tracing::instrument;

use crate::error::Error;
use crate::error::Result;
use crate::ids::CommitId;
use crate::project::Project;

impl Project {
    /// Replaces the working tree with the item set recorded at `commit_id`.
    ///
    /// Extraneous files are deleted before the target set is materialized,
    /// so that a rename (same content, new path) never leaves both the old
    /// and new path populated, even transiently. Files whose content
    /// already matches the target are left untouched.
    ///
    /// `current_branch` is left exactly as it was — only
    /// [`Project::checkout_branch`] changes it — so a `checkout` to a
    /// non-tip commit is what puts the project into the *Detached* state.
    ///
    /// Does not persist `project.json`; call [`Project::save`] for that.
    #[instrument(skip(self))]
    pub fn checkout(&mut self, commit_id: &CommitId) -> Result<()> {
        let target_items = self.get_commit_items(commit_id)?;
        let target_paths: HashSet<&str> = target_items.values().map(|item| item.path.as_str()).collect();

        for working_path in self.candidate_paths()? {
            if !target_paths.contains(working_path.as_str()) {
                let absolute = self.root.join(crate::path_util::from_slash(&working_path));
                self.storage.delete_file_or_dir(&absolute)?;
            }
        }

        for item in target_items.values() {
            let absolute = self.root.join(crate::path_util::from_slash(&item.path));
            let blob_hash = self.hash_of_content(&item.content_id)?;
            if self.storage.exists(&absolute) {
                let current_hash = self.storage.hash_file(&absolute)?;
                if current_hash == blob_hash {
                    continue;
                }
            }
            self.materialize_content(&item.content_id, &absolute)?;
        }

        self.current_commit_id = Some(commit_id.clone());
        info!(commit_id = %commit_id, "checked out commit");
        Ok(())
    }

    /// Resolves `prefix` via [`Project::match_commit_id`] and checks it out.
    pub fn checkout_prefix(&mut self, prefix: &str) -> Result<()> {
        let commit_id = self.match_commit_id(prefix)?;
        self.checkout(&commit_id)
    }

    /// Checks out the tip of branch `name`, then sets it as the current
    /// branch — this is the only operation that changes `current_branch`.
    /// Does not persist `project.json`; call [`Project::save`] for that.
    #[instrument(skip(self))]
    pub fn checkout_branch(&mut self, name: &str) -> Result<()> {
        let tip = self
            .branches
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound { kind: "branch", id: name.to_string() })?;

        self.checkout(&tip)?;
        self.current_branch = Some(name.to_string());
        info!(branch = name, commit_id = %tip, "checked out branch");
        Ok(())
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
    fn checkout_round_trips_a_prior_commit() {
        let (dir, mut project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"v1").unwrap();
        let first = project.commit(None, "tester", "v1", None).unwrap();

        std::fs::write(dir.path().join("a.txt"), b"v2").unwrap();
        project.commit(None, "tester", "v2", None).unwrap();

        project.checkout(&first).unwrap();
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"v1");
        assert_eq!(project.current_commit_id, Some(first));
    }

    #[test]
    fn checkout_does_not_change_current_branch() {
        let (dir, mut project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"v1").unwrap();
        let first = project.commit(None, "tester", "v1", None).unwrap();

        std::fs::write(dir.path().join("a.txt"), b"v2").unwrap();
        project.commit(None, "tester", "v2", None).unwrap();

        project.checkout(&first).unwrap();
        assert_eq!(project.current_branch, Some("main".to_string()));
        assert_ne!(project.current_commit_id, project.branches.get("main").cloned());
    }

    #[test]
    fn checkout_deletes_files_absent_from_target() {
        let (dir, mut project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"v1").unwrap();
        let first = project.commit(None, "tester", "v1", None).unwrap();

        std::fs::write(dir.path().join("b.txt"), b"new file").unwrap();
        project.commit(None, "tester", "add b", None).unwrap();

        project.checkout(&first).unwrap();
        assert!(!dir.path().join("b.txt").exists());
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn checkout_branch_reattaches_current_branch() {
        let (dir, mut project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"v1").unwrap();
        let first = project.commit(None, "tester", "v1", None).unwrap();

        project.checkout(&first).unwrap();
        project.create_branch("dev").unwrap();
        project.checkout_branch("dev").unwrap();
        assert_eq!(project.current_branch, Some("dev".to_string()));
    }
}
