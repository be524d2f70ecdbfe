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

//! Branch management and commit-id prefix resolution.

use tracing::info;
use tracing::instrument;

use crate::error::Error;
use crate::error::Result;
use crate::ids::CommitId;
use crate::model::Commit;
use crate::project::Project;

/// Shortest commit-id prefix [`Project::match_commit_id`] will accept.
pub const MIN_PREFIX_LEN: usize = 6;

impl Project {
    /// Resolves a (possibly abbreviated) commit-id prefix to the single
    /// matching [`CommitId`]. Prefixes shorter than [`MIN_PREFIX_LEN`] are
    /// rejected outright, to keep resolution unambiguous as the graph grows.
    pub fn match_commit_id(&self, prefix: &str) -> Result<CommitId> {
        if prefix.len() < MIN_PREFIX_LEN {
            return Err(Error::TooShort {
                prefix: prefix.to_string(),
                min: MIN_PREFIX_LEN,
            });
        }

        let mut matches = self.commits.keys().filter(|id| id.as_str().starts_with(prefix));

        let Some(first) = matches.next() else {
            return Err(Error::NotFound {
                kind: "commit",
                id: prefix.to_string(),
            });
        };
        if matches.next().is_some() {
            return Err(Error::Ambiguous {
                prefix: prefix.to_string(),
            });
        }
        Ok(first.clone())
    }

    /// The commit currently checked out.
    ///
    /// Fails if `current_commit_id` is unset while commits exist (an
    /// invalid aggregate state), or if it's set but absent from `commits`
    /// (a corrupt one). Returns `None` only for a genuinely fresh project.
    pub fn get_current_commit(&self) -> Result<Option<&Commit>> {
        match &self.current_commit_id {
            None if !self.commits.is_empty() => Err(Error::InvalidState(
                "current commit is unset but commits exist".into(),
            )),
            None => Ok(None),
            Some(id) => self
                .commits
                .get(id)
                .map(Some)
                .ok_or_else(|| Error::Corrupt(format!("current commit '{id}' not found"))),
        }
    }

    /// Creates a branch named `name` pointing at the current commit.
    ///
    /// Requires a current commit: a branch is a pointer into the commit
    /// graph, and there is nothing for it to point at in a project with no
    /// commits yet. Like every core mutation, this does not persist the
    /// change to `project.json` — call [`Project::save`] to do that.
    #[instrument(skip(self))]
    pub fn create_branch(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.branches.contains_key(&name) {
            return Err(Error::AlreadyExists { kind: "branch", id: name });
        }
        let commit_id = self
            .current_commit_id
            .clone()
            .ok_or_else(|| Error::InvalidState("cannot create a branch with no current commit".into()))?;

        self.branches.insert(name.clone(), commit_id);
        if self.default_branch.is_none() {
            self.default_branch = Some(name.clone());
        }
        info!(branch = name, "created branch");
        Ok(())
    }

    /// Deletes branch `name`. Refuses if it's the only branch, the current
    /// branch, or the default branch.
    #[instrument(skip(self))]
    pub fn delete_branch(&mut self, name: &str) -> Result<()> {
        if !self.branches.contains_key(name) {
            return Err(Error::NotFound { kind: "branch", id: name.to_string() });
        }
        if self.branches.len() == 1 {
            return Err(Error::InvalidState(format!("cannot delete '{name}': it is the only branch")));
        }
        if self.current_branch.as_deref() == Some(name) {
            return Err(Error::InvalidState(format!(
                "cannot delete '{name}': it is the current branch"
            )));
        }
        if self.default_branch.as_deref() == Some(name) {
            return Err(Error::InvalidState(format!(
                "cannot delete '{name}': it is the default branch"
            )));
        }
        self.branches.remove(name);
        info!(branch = name, "deleted branch");
        Ok(())
    }

    /// Renames branch `old_name` to `new_name`, keeping it checked out if it
    /// was the current or default branch.
    #[instrument(skip(self))]
    pub fn rename_branch(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if self.branches.contains_key(new_name) {
            return Err(Error::AlreadyExists { kind: "branch", id: new_name.to_string() });
        }
        let commit_id = self
            .branches
            .remove(old_name)
            .ok_or_else(|| Error::NotFound { kind: "branch", id: old_name.to_string() })?;
        self.branches.insert(new_name.to_string(), commit_id);

        if self.current_branch.as_deref() == Some(old_name) {
            self.current_branch = Some(new_name.to_string());
        }
        if self.default_branch.as_deref() == Some(old_name) {
            self.default_branch = Some(new_name.to_string());
        }
        info!(from = old_name, to = new_name, "renamed branch");
        Ok(())
    }

    /// Sets which existing branch this project treats as its default.
    #[instrument(skip(self))]
    pub fn set_default_branch(&mut self, name: &str) -> Result<()> {
        if !self.branches.contains_key(name) {
            return Err(Error::NotFound { kind: "branch", id: name.to_string() });
        }
        self.default_branch = Some(name.to_string());
        info!(branch = name, "set default branch");
        Ok(())
    }
}
