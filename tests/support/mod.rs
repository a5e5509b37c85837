#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Canonical manifest satisfying every contract clause.
pub const DOWNLOAD_ACTION_YML: &str = r#"name: Download Artifact
description: Download a build artifact, preferring the GitHub-hosted copy.

inputs:
  name:
    description: Artifact name to download.
    default: artifact
  path:
    description: Destination path for the artifact.
    required: true
  force-use-github:
    description: Always use actions/download-artifact, even off GitHub runners.
    default: false
    required: false

runs:
  using: composite
  steps:
    - name: Download from GitHub
      if: ${{ inputs.force-use-github }} || ( runner.environment == 'github-hosted' ) == 'true'
      uses: actions/download-artifact@v4.1.7
      with:
        name: ${{ inputs.name }}
        path: ${{ inputs.path }}
"#;

/// Relative path of the canonical manifest within a checkout.
pub const CONVENTIONAL_MANIFEST: &str = ".github/actions/download-artifact/action.yml";

/// A throwaway repository checkout rooted in a temp directory.
///
/// Set KEEP_TEST_ARTIFACTS=1 to leave the tree on disk after the test.
pub struct Checkout {
    pub root: PathBuf,
    _tempdir: Option<TempDir>,
}

impl Checkout {
    pub fn new(prefix: &str) -> Result<Self> {
        let keep = keep_artifacts();
        let tmp = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .context("failed to create temp checkout")?;
        let root = tmp.path().to_path_buf();
        let _tempdir = if keep {
            #[allow(deprecated)]
            let path = tmp.into_path();
            fs::create_dir_all(&path)
                .with_context(|| format!("failed to ensure {}", path.display()))?;
            None
        } else {
            Some(tmp)
        };
        Ok(Self { root, _tempdir })
    }

    /// Write a file below the checkout root, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        self.write_bytes(rel, contents.as_bytes())
    }

    pub fn write_bytes(&self, rel: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write the canonical manifest at the conventional location.
    pub fn write_action(&self) -> Result<PathBuf> {
        self.write(CONVENTIONAL_MANIFEST, DOWNLOAD_ACTION_YML)
    }
}

fn keep_artifacts() -> bool {
    matches!(
        std::env::var("KEEP_TEST_ARTIFACTS")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes"
    )
}
