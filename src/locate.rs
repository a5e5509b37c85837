use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

/// Literal `name:` marker a candidate manifest must carry.
pub const NAME_MARKER: &str = "name: Download Artifact";

/// Directory whose candidates outrank every fallback location.
pub const CONVENTIONAL_DIR: &str = ".github/actions";

static COMPOSITE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*using:\s*composite\b").expect("composite marker regex"));

/// A located composite action manifest and its raw contents.
#[derive(Debug, Clone)]
pub struct LocatedAction {
    /// Path as discovered under the search root.
    pub path: PathBuf,
    /// Full file contents, read once at discovery time.
    pub text: String,
}

/// Find the best `Download Artifact` composite action manifest under `root`.
///
/// Searched locations mirror the conventional checkout layout: `action.yml`
/// or `action.yaml` anywhere under `.github/`, plus the repository root. A
/// file qualifies only when its text carries the declared-name marker and a
/// `using: composite` line. Unreadable candidates are excluded rather than
/// aborting the search. Returns `None` when nothing qualifies so callers can
/// report skipped instead of failed.
pub fn locate_action(root: &Path) -> Option<LocatedAction> {
    let mut candidates: Vec<(bool, usize, LocatedAction)> = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !matches_search_patterns(rel) {
            continue;
        }
        let Ok(text) = fs::read_to_string(entry.path()) else {
            continue;
        };
        if !text.contains(NAME_MARKER) || !COMPOSITE_MARKER.is_match(&text) {
            continue;
        }
        candidates.push((
            is_conventional(rel),
            rel.to_string_lossy().len(),
            LocatedAction {
                path: entry.path().to_path_buf(),
                text,
            },
        ));
    }
    // Conventional location first, shorter relative path as tie-break.
    candidates.sort_by_key(|(conventional, len, _)| (!*conventional, *len));
    candidates.into_iter().next().map(|(_, _, action)| action)
}

fn matches_search_patterns(rel: &Path) -> bool {
    let Some(name) = rel.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name != "action.yml" && name != "action.yaml" {
        return false;
    }
    at_repo_root(rel) || rel.starts_with(".github")
}

fn at_repo_root(rel: &Path) -> bool {
    rel.parent()
        .map(|parent| parent.as_os_str().is_empty())
        .unwrap_or(true)
}

fn is_conventional(rel: &Path) -> bool {
    rel.starts_with(CONVENTIONAL_DIR)
}
