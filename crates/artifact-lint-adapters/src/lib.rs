// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("path violation: {} ({detail})", .path.display())]
    PathViolation { path: PathBuf, detail: String },
    #[error("io error: {op} {} ({detail})", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        detail: String,
    },
}

/// Read-only view of the repository being linted.
pub trait Fs {
    fn read_text(&self, repo_root: &Path, path: &Path) -> Result<String, AdapterError>;
    fn exists(&self, repo_root: &Path, path: &Path) -> bool;
}

pub trait Walk {
    /// Files below `root`, as repo-relative paths in sorted order.
    /// A missing `root` yields an empty list; symlinks below it are skipped.
    fn walk_files(&self, repo_root: &Path, root: &Path) -> Result<Vec<PathBuf>, AdapterError>;
}

pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn resolve(repo_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path of `target` as seen from `from_dir`, `/`-separated.
///
/// Both inputs are interpreted relative to the same root, so
/// `relative_path(".github/agents", ".github/templates/a.md")` is
/// `../templates/a.md`.
pub fn relative_path(from_dir: &Path, target: &Path) -> String {
    let from = normalize_path(from_dir);
    let to = normalize_path(target);
    let from_parts = from.components().collect::<Vec<_>>();
    let to_parts = to.components().collect::<Vec<_>>();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments = vec!["..".to_string(); from_parts.len() - common];
    segments.extend(
        to_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    segments.join("/")
}

/// Repo-relative display form of a path, always `/`-separated.
pub fn display_path(path: &Path) -> String {
    normalize_path(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl Fs for RealFs {
    fn read_text(&self, repo_root: &Path, path: &Path) -> Result<String, AdapterError> {
        let target = resolve(repo_root, path);
        let text = fs::read_to_string(&target).map_err(|err| AdapterError::Io {
            op: "read_to_string",
            path: target,
            detail: err.to_string(),
        })?;
        Ok(normalize_line_endings(&text))
    }

    fn exists(&self, repo_root: &Path, path: &Path) -> bool {
        resolve(repo_root, path).exists()
    }
}

impl Walk for RealFs {
    fn walk_files(&self, repo_root: &Path, root: &Path) -> Result<Vec<PathBuf>, AdapterError> {
        fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), AdapterError> {
            let entries = fs::read_dir(dir).map_err(|err| AdapterError::Io {
                op: "read_dir",
                path: dir.to_path_buf(),
                detail: err.to_string(),
            })?;
            for entry in entries {
                let entry = entry.map_err(|err| AdapterError::Io {
                    op: "read_dir_entry",
                    path: dir.to_path_buf(),
                    detail: err.to_string(),
                })?;
                let file_type = entry.file_type().map_err(|err| AdapterError::Io {
                    op: "file_type",
                    path: entry.path(),
                    detail: err.to_string(),
                })?;
                // Never follow symlinks.
                if file_type.is_symlink() {
                    continue;
                }
                let path = entry.path();
                if file_type.is_dir() {
                    walk(&path, out)?;
                } else if file_type.is_file() {
                    out.push(path);
                }
            }
            Ok(())
        }

        let target = resolve(repo_root, root);
        let mut out = Vec::new();
        if target.is_dir() {
            walk(&target, &mut out)?;
        }
        let mut relative = out
            .into_iter()
            .map(|path| match path.strip_prefix(repo_root) {
                Ok(rel) => Ok(rel.to_path_buf()),
                Err(_) => Err(AdapterError::PathViolation {
                    path,
                    detail: format!("walked outside of {}", repo_root.display()),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        relative.sort();
        relative.dedup();
        Ok(relative)
    }
}
