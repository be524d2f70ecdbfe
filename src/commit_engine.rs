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

//! Recording a new commit from the current working-tree status.

use tracing::info;
use tracing::instrument;

use crate::error::Error;
use crate::error::Result;
use crate::ids::CommitId;
use crate::model::Commit;
use crate::project::DEFAULT_BRANCH_NAME;
use crate::project::Project;

impl Project {
    /// A commit can only be recorded while sitting at the tip of the current
    /// branch. Skipped entirely while the commit graph is still empty (the
    /// very first commit has nothing to be "at the tip" of yet).
    fn assert_at_branch_tip(&self) -> Result<()> {
        if self.commits.is_empty() {
            return Ok(());
        }
        let branch_name = self
            .current_branch
            .as_ref()
            .ok_or_else(|| Error::InvalidState("cannot commit: not at the branch".into()))?;
        let tip = self
            .branches
            .get(branch_name)
            .ok_or_else(|| Error::InvalidState("cannot commit: not at the branch".into()))?;
        if self.current_commit_id.as_ref() == Some(tip) {
            Ok(())
        } else {
            Err(Error::InvalidState("cannot commit: not at the branch".into()))
        }
    }

    /// Records the current working-tree status (optionally restricted to
    /// `files`) as a new commit on top of `current_commit_id`, then advances
    /// the current branch to point at it.
    ///
    /// Does not persist `project.json`; call [`Project::save`] for that.
    #[instrument(skip(self, files))]
    pub fn commit(
        &mut self,
        files: Option<&[String]>,
        author_id: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<CommitId> {
        self.assert_at_branch_tip()?;

        let status = self.status(files)?;

        for (item_id, placeholder) in status.new_items {
            let resolved_content = if placeholder.content_id.is_dummy() {
                let absolute = self.root.join(crate::path_util::from_slash(&placeholder.path));
                self.add_content(&absolute)?
            } else {
                placeholder.content_id.clone()
            };
            let resolved = crate::model::Item::new(item_id.clone(), resolved_content, placeholder.path);
            self.items.insert(item_id, resolved);
        }

        let commit_id = CommitId::new(self.id_generator.next_id());
        let parent = self.current_commit_id.clone();
        let is_first_commit = self.commits.is_empty();
        let commit = Commit::new(
            commit_id.clone(),
            parent.clone(),
            author_id,
            title,
            description,
            self.clock.now(),
            status.changes,
        );

        self.commits.insert(commit_id.clone(), commit);
        if let Some(parent_id) = &parent {
            if let Some(parent_commit) = self.commits.get_mut(parent_id) {
                parent_commit.children.push(commit_id.clone());
            }
        }

        if is_first_commit {
            self.root_commit_id = Some(commit_id.clone());
            if self.current_branch.is_none() {
                self.current_branch = Some(DEFAULT_BRANCH_NAME.to_string());
            }
            if self.default_branch.is_none() {
                self.default_branch = self.current_branch.clone();
            }
        }

        let branch_name = self
            .current_branch
            .clone()
            .expect("first commit bootstraps a current branch, and later ones require one");
        self.branches.insert(branch_name, commit_id.clone());
        self.current_commit_id = Some(commit_id.clone());

        info!(commit_id = %commit_id, "recorded commit");
        Ok(commit_id)
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
    fn first_commit_bootstraps_branch() {
        let (dir, mut project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();

        let commit_id = project.commit(None, "tester", "initial", None).unwrap();
        assert_eq!(project.current_commit_id, Some(commit_id.clone()));
        assert_eq!(project.branches["main"], commit_id);
        assert_eq!(project.default_branch, Some("main".to_string()));
        assert_eq!(project.root_commit_id, Some(commit_id));
        assert!(project.status(None).unwrap().is_clean());
    }

    #[test]
    fn committing_with_no_changes_succeeds_with_an_empty_change_list() {
        let (dir, mut project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        let first = project.commit(None, "tester", "initial", None).unwrap();

        let second = project.commit(None, "tester", "nothing changed", None).unwrap();
        assert_eq!(project.commits[&second].parent, Some(first));
        assert!(project.commits[&second].changes.is_empty());
        assert_eq!(project.branches["main"], second);
    }

    #[test]
    fn second_commit_chains_to_first() {
        let (dir, mut project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"v1").unwrap();
        let first = project.commit(None, "tester", "v1", None).unwrap();

        std::fs::write(dir.path().join("a.txt"), b"v2").unwrap();
        let second = project.commit(None, "tester", "v2", None).unwrap();

        assert_eq!(project.commits[&second].parent, Some(first.clone()));
        assert_eq!(project.commits[&first].children, vec![second]);
    }

    #[test]
    fn rename_reuses_existing_blob_without_creating_a_new_one() {
        let (dir, mut project) = new_test_project();
        std::fs::write(dir.path().join("a.txt"), b"stable content").unwrap();
        project.commit(None, "tester", "add a", None).unwrap();
        let blobs_after_first = std::fs::read_dir(project.contents_dir()).unwrap().count();

        std::fs::rename(dir.path().join("a.txt"), dir.path().join("b.txt")).unwrap();
        project.commit(None, "tester", "rename a to b", None).unwrap();
        let blobs_after_rename = std::fs::read_dir(project.contents_dir()).unwrap().count();

        assert_eq!(blobs_after_first, blobs_after_rename);
    }
}
