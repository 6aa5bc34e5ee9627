//! Content digests for comparing archives between game updates
//!
//! Produces a sorted listing with one line per directory (`path dir`) and
//! one per file (`path <sha256>`), so two listings diff cleanly.

use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;

use crate::container::ParsedContainer;

/// What a tree line describes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum TreeKind {
    Dir,
    File { sha256: String },
    /// The payload could not be decrypted (e.g. it runs past the container)
    Unreadable,
}

/// One line of a digest listing
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TreeLine {
    pub path: String,
    #[serde(flatten)]
    pub kind: TreeKind,
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TreeKind::Dir => write!(f, "{} dir", self.path),
            TreeKind::File { sha256 } => write!(f, "{} {}", self.path, sha256),
            TreeKind::Unreadable => write!(f, "{} unreadable", self.path),
        }
    }
}

/// Compute SHA-256 of a buffer as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Every parent directory of an archive path, `/`-joined
fn parent_dirs(path: &str) -> impl Iterator<Item = String> + '_ {
    let segments: Vec<&str> = path
        .split(|c| c == '/' || c == '\\')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    (1..segments.len()).map(move |n| segments[..n].join("/"))
}

/// Build the sorted digest listing for a container
pub fn digest_tree(container: &ParsedContainer<'_>) -> Vec<TreeLine> {
    let mut lines: Vec<TreeLine> = container
        .entries()
        .par_iter()
        .map(|entry| TreeLine {
            path: entry.path.clone(),
            kind: match container.read(entry) {
                Ok(data) => TreeKind::File {
                    sha256: sha256_hex(&data),
                },
                Err(_) => TreeKind::Unreadable,
            },
        })
        .collect();

    let dirs: BTreeSet<String> = container
        .entries()
        .iter()
        .flat_map(|entry| parent_dirs(&entry.path))
        .collect();

    lines.extend(dirs.into_iter().map(|path| TreeLine {
        path,
        kind: TreeKind::Dir,
    }));
    lines.sort();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ContainerBuilder;
    use crate::{decode, FormatVersion};

    #[test]
    fn test_sha256_hex() {
        // SHA-256 of "test content"
        assert_eq!(
            sha256_hex(b"test content"),
            "6ae8a75555209fd6c44157c0aed8016e763ff435a19cf186f76863140143ff72"
        );
    }

    #[test]
    fn test_parent_dirs() {
        let dirs: Vec<String> = parent_dirs("data/scripts/gun/gun.lua").collect();
        assert_eq!(dirs, vec!["data", "data/scripts", "data/scripts/gun"]);
        assert_eq!(parent_dirs("top.txt").count(), 0);
        assert_eq!(
            parent_dirs("data\\win\\x.txt").collect::<Vec<_>>(),
            vec!["data", "data/win"]
        );
    }

    #[test]
    fn test_digest_tree() {
        let data = ContainerBuilder::new(FormatVersion::V1)
            .file("data/scripts/b.lua", b"test content")
            .file("data/a.xml", b"")
            .file_with_declared_size("data/zz.bin", b"x", 0x00FF_FFFF)
            .build();
        let container = decode(&data, FormatVersion::V1).unwrap();

        let lines: Vec<String> = digest_tree(&container)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            lines,
            vec![
                "data dir".to_string(),
                "data/a.xml e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
                    .to_string(),
                "data/scripts dir".to_string(),
                "data/scripts/b.lua 6ae8a75555209fd6c44157c0aed8016e763ff435a19cf186f76863140143ff72"
                    .to_string(),
                "data/zz.bin unreadable".to_string(),
            ]
        );
    }

    #[test]
    fn test_tree_line_json() {
        let line = TreeLine {
            path: "data".into(),
            kind: TreeKind::Dir,
        };
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"path":"data","kind":"dir"}"#
        );
    }
}
