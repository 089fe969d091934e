//! # cartbuild
//!
//! Generate the shell or batch script that compiles a Game Boy project with
//! GBDK and links it into a cartridge ROM.
//!
//! The pipeline runs in a fixed order:
//!
//! 1. compose compiler and linker flags from the [`BuildConfig`]
//! 2. discover `src/**/*.{c,s}` and drop sources tagged for the other
//!    music driver
//! 3. emit a compile step for every source whose object is missing
//! 4. emit the pack step, then the link step over every object
//!
//! Nothing is executed; the caller writes the returned text to disk.

pub mod config;
pub mod dialect;
pub mod labels;
pub mod link;
pub mod planner;
pub mod script;
pub mod sources;
pub mod toolchain;

pub use config::{BuildConfig, ConfigOverrides, MusicDriver, Platform};
pub use labels::Labels;
pub use script::BuildPlan;

use anyhow::Result;
use planner::{FsObjectProbe, ObjectProbe};
use script::Script;
use sources::{FsSourceLister, SourceFile, SourceLister};
use std::path::{Path, PathBuf};
use toolchain::Flags;

/// Build script generator with pluggable filesystem collaborators.
pub struct ScriptGenerator<'a> {
    lister: &'a dyn SourceLister,
    probe: &'a dyn ObjectProbe,
    labels: &'a Labels,
}

/// Retained and excluded sources for one configuration.
pub struct SourceSelection {
    pub sources: Vec<SourceFile>,
    pub excluded: Vec<SourceFile>,
}

/// Build state of one discovered source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    /// No object yet; the script will compile it.
    Stale,
    /// Object already present at this root-relative path.
    Cached(PathBuf),
    /// Tagged for the other music driver.
    Excluded,
}

#[derive(Debug, Clone)]
pub struct SourceStatus {
    pub source: SourceFile,
    pub state: SourceState,
}

/// Per-source state, retained sources first (in build order), then
/// excluded ones.
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    pub entries: Vec<SourceStatus>,
}

impl StatusReport {
    pub fn stale(&self) -> usize {
        self.count(|s| matches!(s, SourceState::Stale))
    }

    pub fn cached(&self) -> usize {
        self.count(|s| matches!(s, SourceState::Cached(_)))
    }

    pub fn excluded(&self) -> usize {
        self.count(|s| matches!(s, SourceState::Excluded))
    }

    fn count(&self, pred: impl Fn(&SourceState) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.state)).count()
    }
}

impl<'a> ScriptGenerator<'a> {
    pub fn new(
        lister: &'a dyn SourceLister,
        probe: &'a dyn ObjectProbe,
        labels: &'a Labels,
    ) -> Self {
        ScriptGenerator {
            lister,
            probe,
            labels,
        }
    }

    /// Discover sources under `root` and split them by music driver.
    pub fn select_sources(&self, root: &Path, config: &BuildConfig) -> Result<SourceSelection> {
        let discovered = sources::discover(self.lister, root)?;
        let (sources, excluded) = sources::filter_for_driver(discovered, config.music_driver);
        Ok(SourceSelection { sources, excluded })
    }

    /// Report which sources would be compiled, reused or excluded.
    pub fn status(&self, root: &Path, config: &BuildConfig) -> Result<StatusReport> {
        let selection = self.select_sources(root, config)?;
        let mut entries = Vec::with_capacity(selection.sources.len() + selection.excluded.len());

        for source in selection.sources {
            let object = planner::object_path(&source.rel);
            let state = if self.probe.exists(&root.join(&object))? {
                SourceState::Cached(object)
            } else {
                SourceState::Stale
            };
            entries.push(SourceStatus { source, state });
        }
        entries.extend(selection.excluded.into_iter().map(|source| SourceStatus {
            source,
            state: SourceState::Excluded,
        }));

        Ok(StatusReport { entries })
    }

    /// Plan the full build. Fails without partial output if listing or any
    /// existence check fails.
    pub fn plan(&self, root: &Path, config: &BuildConfig) -> Result<BuildPlan> {
        let flags = Flags::compose(config);
        let selection = self.select_sources(root, config)?;

        let dialect = dialect::for_config(config);
        let stage = planner::plan_compile(
            Script::new(dialect.as_ref()),
            root,
            &selection.sources,
            &flags,
            self.probe,
            self.labels,
        )?;
        let script = link::emit_pack_and_link(stage.script, &stage.objects, &flags, self.labels);

        log::info!(
            "planned {} compile steps for {} objects ({} sources excluded)",
            stage.compiled,
            stage.objects.len(),
            selection.excluded.len()
        );

        Ok(BuildPlan {
            lines: script.into_lines(),
            objects: stage.objects,
            compiled: stage.compiled,
        })
    }

    /// Generate the full script text.
    pub fn generate(&self, root: &Path, config: &BuildConfig) -> Result<String> {
        Ok(self.plan(root, config)?.render())
    }
}

/// Generate a build script for `root` using the real filesystem and
/// English labels.
pub fn generate(root: &Path, config: &BuildConfig) -> Result<String> {
    let labels = Labels::default();
    ScriptGenerator::new(&FsSourceLister, &FsObjectProbe, &labels).generate(root, config)
}
