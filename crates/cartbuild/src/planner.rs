//! Incremental compile planning.
//!
//! Every retained source maps to exactly one object under `obj/`. If that
//! object already exists the source is not recompiled, but the object is
//! still linked.

use crate::labels::{Labels, Message};
use crate::script::Script;
use crate::sources::SourceFile;
use crate::toolchain::{self, Flags};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const OBJ_DIR: &str = "obj";
pub const OBJECT_EXT: &str = "o";
pub const LINK_EXT: &str = "rel";

/// Object path for a root-relative source: the `src/...` directory prefix
/// collapses to `obj/` and the extension becomes `.o`.
pub fn object_path(source: &Path) -> PathBuf {
    let mut name = source.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(OBJECT_EXT);
    Path::new(OBJ_DIR).join(name)
}

/// Intermediate link artifact the packer rewrites an object into.
pub fn link_artifact(object: &Path) -> PathBuf {
    object.with_extension(LINK_EXT)
}

/// Existence check for object files.
pub trait ObjectProbe {
    fn exists(&self, path: &Path) -> Result<bool>;
}

/// Checks objects on the real filesystem.
pub struct FsObjectProbe;

impl ObjectProbe for FsObjectProbe {
    fn exists(&self, path: &Path) -> Result<bool> {
        path.try_exists()
            .with_context(|| format!("Failed to check {}", path.display()))
    }
}

/// Result of planning the compile stage.
pub struct CompileStage<'d> {
    pub script: Script<'d>,
    pub objects: Vec<PathBuf>,
    pub compiled: usize,
}

/// Emit compile commands for sources without an object and collect the
/// full object list in source order.
pub fn plan_compile<'d>(
    script: Script<'d>,
    root: &Path,
    sources: &[SourceFile],
    flags: &Flags,
    probe: &dyn ObjectProbe,
    labels: &Labels,
) -> Result<CompileStage<'d>> {
    let mut owners: HashMap<PathBuf, &Path> = HashMap::new();
    for source in sources {
        let object = object_path(&source.rel);
        if let Some(prev) = owners.insert(object.clone(), &source.rel) {
            bail!(
                "{} and {} both compile to {}",
                prev.display(),
                source.rel.display(),
                object.display()
            );
        }
    }

    let cc = toolchain::compiler(script.dialect().platform());
    let mut script = script;
    let mut objects = Vec::with_capacity(sources.len());
    let mut compiled = 0;

    for source in sources {
        let object = object_path(&source.rel);

        if probe.exists(&root.join(&object))? {
            log::debug!("{} is up to date", object.display());
        } else {
            let label = format!(
                "{}: {}",
                labels.get(Message::Compiling),
                script.path(&source.rel)
            );
            let command = format!(
                "{cc} {} -o {} {}",
                flags.cflags,
                script.arg(&object),
                script.arg(&source.rel)
            );
            script = script.command(&label, &command);
            compiled += 1;
        }
        objects.push(object);
    }

    Ok(CompileStage {
        script,
        objects,
        compiled,
    })
}
