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

//! The project: a single `.mvcs/project.json` plus the content pool on disk,
//! and the live handle through which every engine operation runs.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::instrument;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::error::Error;
use crate::error::Result;
use crate::ids::CommitId;
use crate::ids::IdGenerator;
use crate::ids::ProjectId;
use crate::ids::RandomIdGenerator;
use crate::model::CommitGraph;
use crate::model::ItemTable;
use crate::storage::FsStorageProvider;
use crate::storage::StorageProvider;

/// Directory, relative to the project root, holding all MVCS metadata.
pub const PROJECT_DIR: &str = ".mvcs";
/// File, relative to [`PROJECT_DIR`], holding the serialized [`Project`].
pub const PROJECT_FILE: &str = "project.json";
/// Directory, relative to [`PROJECT_DIR`], holding deduplicated content blobs.
pub const CONTENTS_DIR: &str = "contents";
/// Branch name the first commit bootstraps onto when none is set yet.
pub const DEFAULT_BRANCH_NAME: &str = "main";

/// A live project: persisted commit/item/branch state plus the collaborators
/// (storage, id generation, clock) every engine module needs.
///
/// Only a subset of fields round-trip through `project.json`; the rest are
/// runtime collaborators, rebuilt fresh on every [`Project::load`]. That's
/// why [`Project`] implements `Serialize` directly (skipping the runtime
/// fields) but is deserialized indirectly, via [`ProjectDump`].
#[derive(Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub author_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub branches: BTreeMap<String, CommitId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_branch: Option<String>,
    pub commits: CommitGraph,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_commit_id: Option<CommitId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_commit_id: Option<CommitId>,
    pub items: ItemTable,

    /// Working directory. Supplied at open time, never serialized.
    #[serde(skip)]
    pub root: PathBuf,
    #[serde(skip)]
    pub storage: Arc<dyn StorageProvider>,
    #[serde(skip)]
    pub id_generator: Arc<dyn IdGenerator>,
    #[serde(skip)]
    pub clock: Arc<dyn Clock>,
    /// Cache of `content path -> hash`, populated by [`crate::content_pool`].
    /// Never persisted: a stale cache is simply a cache miss away from
    /// correct, and paths may have moved between processes.
    #[serde(skip)]
    pub(crate) blob_hash_cache: Mutex<HashMap<PathBuf, String>>,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("commits", &self.commits.len())
            .field("items", &self.items.len())
            .field("branches", &self.branches)
            .field("current_branch", &self.current_branch)
            .field("current_commit_id", &self.current_commit_id)
            .finish()
    }
}

/// Plain, all-optional mirror of [`Project`]'s persisted fields, used only as
/// a `serde_json::from_str` target. Every field is copied by hand into a
/// fresh [`Project`] that already owns its live collaborators, rather than
/// deriving `Deserialize` on `Project` itself (which has none). Unknown
/// fields in the source document are silently ignored, matching the
/// documented load contract.
#[derive(Deserialize, Default)]
struct ProjectDump {
    id: Option<ProjectId>,
    author_id: Option<String>,
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    branches: BTreeMap<String, CommitId>,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    current_branch: Option<String>,
    #[serde(default)]
    commits: CommitGraph,
    #[serde(default)]
    root_commit_id: Option<CommitId>,
    #[serde(default)]
    current_commit_id: Option<CommitId>,
    #[serde(default)]
    items: ItemTable,
}

impl Project {
    /// Initializes a brand-new project at `root`: creates `.mvcs/contents`
    /// and an aggregate with a fresh id and empty collections.
    #[instrument(skip(storage, id_generator, clock))]
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        root: impl Into<PathBuf>,
        storage: Arc<dyn StorageProvider>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        author_id: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(PROJECT_DIR);
        if storage.exists(&project_dir) {
            return Err(Error::AlreadyExists {
                kind: "project",
                id: root.display().to_string(),
            });
        }
        storage.create_dir(&project_dir.join(CONTENTS_DIR))?;

        let project = Self {
            id: ProjectId::new(id_generator.next_id()),
            author_id: author_id.into(),
            title: title.into(),
            description,
            branches: BTreeMap::new(),
            default_branch: None,
            current_branch: None,
            commits: CommitGraph::new(),
            root_commit_id: None,
            current_commit_id: None,
            items: ItemTable::new(),
            root,
            storage,
            id_generator,
            clock,
            blob_hash_cache: Mutex::new(HashMap::new()),
        };
        project.save()?;
        debug!(root = %project.root.display(), project_id = %project.id, "initialized project");
        Ok(project)
    }

    /// Loads a project previously created with [`Project::create`].
    #[instrument(skip(storage, id_generator, clock))]
    pub fn load(
        root: impl Into<PathBuf>,
        storage: Arc<dyn StorageProvider>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let root = root.into();
        let project_file = root.join(PROJECT_DIR).join(PROJECT_FILE);
        let bytes = storage.read_file(&project_file)?;
        let dump: ProjectDump = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Corrupt(format!("{}: {e}", project_file.display())))?;

        Ok(Self {
            id: dump.id.unwrap_or_else(|| ProjectId::new(id_generator.next_id())),
            author_id: dump.author_id.unwrap_or_default(),
            title: dump.title.unwrap_or_default(),
            description: dump.description,
            branches: dump.branches,
            default_branch: dump.default_branch,
            current_branch: dump.current_branch,
            commits: dump.commits,
            root_commit_id: dump.root_commit_id,
            current_commit_id: dump.current_commit_id,
            items: dump.items,
            root,
            storage,
            id_generator,
            clock,
            blob_hash_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Convenience constructor for the common case: project files live
    /// directly on the local filesystem, ids are random UUIDs, and the clock
    /// is the system wall clock.
    pub fn create_on_disk(
        root: impl Into<PathBuf>,
        author_id: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self> {
        Self::create(
            root,
            Arc::new(FsStorageProvider::new()),
            Arc::new(RandomIdGenerator),
            Arc::new(SystemClock),
            author_id,
            title,
            description,
        )
    }

    /// Loads a project previously created on the local filesystem.
    pub fn load_from_disk(root: impl Into<PathBuf>) -> Result<Self> {
        Self::load(
            root,
            Arc::new(FsStorageProvider::new()),
            Arc::new(RandomIdGenerator),
            Arc::new(SystemClock),
        )
    }

    /// Serializes and atomically writes `project.json`: write to a temp file
    /// in the same directory, then persist/rename over the target, so a
    /// crash mid-write never leaves a half-written `project.json` behind.
    #[instrument(skip(self))]
    pub fn save(&self) -> Result<()> {
        let project_dir = self.root.join(PROJECT_DIR);
        let project_file = project_dir.join(PROJECT_FILE);
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| Error::Corrupt(format!("failed to serialize project: {e}")))?;

        let tmp = tempfile::Builder::new()
            .prefix(PROJECT_FILE)
            .tempfile_in(&project_dir)
            .map_err(|e| Error::Io {
                path: project_dir.clone(),
                source: e,
            })?;
        std::fs::write(tmp.path(), &json).map_err(|e| Error::Io {
            path: tmp.path().to_path_buf(),
            source: e,
        })?;
        tmp.persist(&project_file).map_err(|e| Error::Io {
            path: project_file.clone(),
            source: e.error,
        })?;
        debug!(path = %project_file.display(), "saved project");
        Ok(())
    }

    pub fn contents_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR).join(CONTENTS_DIR)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
