//! Source discovery and driver filtering.
//!
//! Sources live under `<root>/src/**` and are either C (`.c`) or assembly
//! (`.s`). Files that belong to one music driver carry that driver's marker
//! (`HUGE_TRACKER` / `GBT_PLAYER`) somewhere in their path; the marker is
//! resolved once at discovery into [`SourceFile::driver`].

use crate::config::MusicDriver;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub const SRC_DIR: &str = "src";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    C,
    Asm,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "c" => Some(Self::C),
            "s" => Some(Self::Asm),
            _ => None,
        }
    }
}

/// A translation unit found under the build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the build root, always starting with `src/`.
    pub rel: PathBuf,
    pub kind: SourceKind,
    /// Driver this file is exclusive to, if any.
    pub driver: Option<MusicDriver>,
}

impl SourceFile {
    /// Classify a root-relative path. Returns `None` for non-source files.
    pub fn classify(rel: &Path) -> Option<Self> {
        let kind = SourceKind::from_path(rel)?;
        Some(SourceFile {
            rel: rel.to_path_buf(),
            kind,
            driver: driver_tag(rel),
        })
    }

    /// Whether this file is part of a build using `driver`.
    pub fn is_used_by(&self, driver: MusicDriver) -> bool {
        self.driver.is_none() || self.driver == Some(driver)
    }
}

/// Resolve the driver marker in `path`. If both markers occur, the one
/// closest to the file name wins, so a file is never tagged for both.
fn driver_tag(path: &Path) -> Option<MusicDriver> {
    let text = path.to_string_lossy();
    [MusicDriver::Huge, MusicDriver::Gbt]
        .into_iter()
        .filter_map(|d| text.rfind(d.marker()).map(|pos| (pos, d)))
        .max_by_key(|(pos, _)| *pos)
        .map(|(_, d)| d)
}

/// Recursive file listing under a directory.
pub trait SourceLister {
    /// List every file under `dir`, as absolute or `dir`-prefixed paths.
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Lists files on the real filesystem. Symlinks are followed; dotfiles and
/// dot-directories are skipped.
pub struct FsSourceLister;

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

impl SourceLister for FsSourceLister {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// Enumerate C and assembly sources under `<root>/src`, sorted by path.
pub fn discover(lister: &dyn SourceLister, root: &Path) -> Result<Vec<SourceFile>> {
    let src = root.join(SRC_DIR);
    let listed = lister
        .list(&src)
        .with_context(|| format!("Failed to enumerate sources in {}", src.display()))?;

    let mut sources: Vec<SourceFile> = listed
        .iter()
        .filter_map(|path| path.strip_prefix(root).ok())
        .filter_map(SourceFile::classify)
        .collect();
    sources.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(sources)
}

/// Split `sources` into files used with `driver` and files excluded because
/// they belong to the other driver. Order is preserved in both halves.
pub fn filter_for_driver(
    sources: Vec<SourceFile>,
    driver: MusicDriver,
) -> (Vec<SourceFile>, Vec<SourceFile>) {
    let (kept, excluded): (Vec<_>, Vec<_>) =
        sources.into_iter().partition(|s| s.is_used_by(driver));
    for file in &excluded {
        log::debug!("excluding {} ({:?} only)", file.rel.display(), driver.other());
    }
    (kept, excluded)
}
