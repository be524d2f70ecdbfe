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

//! Path/separator normalization. Item paths are always stored and compared
//! as `/`-separated strings, the same internal representation
//! `repo_path::RepoPath` uses internally, so `project.json` stays portable
//! across hosts (see the path-portability note in the design docs);
//! conversion to the host's native separator happens only right before
//! touching the storage provider, mirroring `RepoPath::to_fs_path`.

use std::path::Path;
use std::path::PathBuf;

/// Converts a (relative) filesystem path into its `/`-separated string form.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Converts a `/`-separated project path back into a native [`PathBuf`].
pub fn from_slash(path: &str) -> PathBuf {
    let mut buf = PathBuf::new();
    for component in path.split('/') {
        buf.push(component);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_nested_path() {
        let slash = "subdir1/file1.txt";
        let native = from_slash(slash);
        assert_eq!(to_slash(&native), slash);
    }
}
