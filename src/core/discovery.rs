//! Input discovery.
//!
//! Expands the `INPUT_FILES` list into an ordered, de-duplicated list of
//! files relative to the working directory. Missing inputs are collected as
//! diagnostics instead of failing the run.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use glob::glob;
use walkdir::WalkDir;

use crate::utils::to_slash_path;

/// Result of expanding an input list.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Files to translate, relative to the working directory, in first-seen order.
    pub files: Vec<String>,
    /// Inputs that did not exist.
    pub missing: Vec<MissingInput>,
    /// Entries that could not be read while walking a directory.
    pub skipped_count: usize,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// An input token that could not be found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInput {
    /// The token as written by the user.
    pub input: String,
    /// Parent directory that was inspected, relative to the working directory.
    pub parent: String,
    /// Contents of the parent directory, or `None` when it does not exist either.
    pub parent_entries: Option<Vec<ParentEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Check if a token contains glob wildcards (* or ?).
fn is_glob_pattern(token: &str) -> bool {
    token.contains('*') || token.contains('?')
}

/// Split an input list into path tokens.
///
/// Tokens are separated by commas and/or whitespace; empty tokens are dropped.
pub fn split_input_spec(spec: &str) -> Vec<&str> {
    spec.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Expand `spec` against `root` into concrete files.
///
/// `None`, an empty string or whitespace yields an empty [`Discovery`].
pub fn discover(root: &Path, spec: Option<&str>) -> Discovery {
    let mut discovery = Discovery::default();
    let Some(spec) = spec else {
        return discovery;
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut push = |files: &mut Vec<String>, path: String| {
        if seen.insert(path.clone()) {
            files.push(path);
        }
    };

    for token in split_input_spec(spec) {
        if is_glob_pattern(token) {
            for path in expand_glob(root, token, &mut discovery.skipped_count) {
                push(&mut discovery.files, path);
            }
            continue;
        }

        let Some(relative) = locate(root, token) else {
            discovery.missing.push(describe_missing(root, token));
            continue;
        };

        let full = root.join(&relative);
        if full.is_dir() {
            for path in walk_dir(root, &full, &mut discovery.skipped_count) {
                push(&mut discovery.files, path);
            }
        } else {
            push(&mut discovery.files, relative);
        }
    }

    discovery
}

/// Resolve a token to an existing path relative to `root`.
///
/// Tries the token with a leading `./` stripped, then as written, then (for
/// repository-absolute tokens like `/docs/en`) relative to `root`.
fn locate(root: &Path, token: &str) -> Option<String> {
    let normalized = token.strip_prefix("./").unwrap_or(token);
    if root.join(normalized).exists() {
        return Some(normalized.trim_end_matches('/').to_string());
    }
    if Path::new(token).is_absolute() && Path::new(token).exists() {
        return Some(token.to_string());
    }
    let relative = token.trim_start_matches('/');
    if relative != token && !relative.is_empty() && root.join(relative).exists() {
        return Some(relative.trim_end_matches('/').to_string());
    }
    None
}

/// Recursively list regular files below `dir`, sorted by file name.
fn walk_dir(root: &Path, dir: &Path, skipped_count: &mut usize) -> Vec<String> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => {
                *skipped_count += 1;
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(relative_to(root, entry.path()));
        }
    }

    files
}

fn expand_glob(root: &Path, token: &str, skipped_count: &mut usize) -> Vec<String> {
    let normalized = token.strip_prefix("./").unwrap_or(token);
    let full_pattern = root.join(normalized);
    let pattern_str = full_pattern.to_string_lossy();

    let Ok(entries) = glob(&pattern_str) else {
        *skipped_count += 1;
        return Vec::new();
    };

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_dir() => files.extend(walk_dir(root, &path, skipped_count)),
            Ok(path) if path.is_file() => files.push(relative_to(root, &path)),
            Ok(_) => {}
            Err(_) => *skipped_count += 1,
        }
    }
    files
}

fn relative_to(root: &Path, path: &Path) -> String {
    to_slash_path(path.strip_prefix(root).unwrap_or(path))
}

fn describe_missing(root: &Path, token: &str) -> MissingInput {
    let normalized = token.strip_prefix("./").unwrap_or(token);
    let parent = Path::new(normalized)
        .parent()
        .map(Path::to_path_buf)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."));

    let parent_dir = root.join(&parent);
    let parent_entries = fs::read_dir(&parent_dir).ok().map(|entries| {
        let mut listing: Vec<ParentEntry> = entries
            .flatten()
            .map(|entry| ParentEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.path().is_dir(),
            })
            .collect();
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        listing
    });

    MissingInput {
        input: token.to_string(),
        parent: to_slash_path(&parent),
        parent_entries,
    }
}
