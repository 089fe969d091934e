//! Script builder.
//!
//! A [`Script`] owns the lines emitted so far and the dialect they are
//! written in. Each pipeline stage takes it by value and hands it back.

use crate::dialect::Dialect;
use std::path::Path;

pub struct Script<'d> {
    dialect: &'d dyn Dialect,
    lines: Vec<String>,
}

impl<'d> Script<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Script {
            dialect,
            lines: dialect.prelude(),
        }
    }

    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Render a root-relative path for this script.
    pub fn path(&self, rel: &Path) -> String {
        self.dialect.path(rel)
    }

    /// Render a root-relative path as a quoted command argument.
    pub fn arg(&self, rel: &Path) -> String {
        self.dialect.arg(rel)
    }

    #[must_use]
    pub fn command(mut self, label: &str, command: &str) -> Self {
        self.lines.extend(self.dialect.emit_command(label, command));
        self
    }

    #[must_use]
    pub fn captured(mut self, label: &str, var: &str, command: &str) -> Self {
        self.lines.extend(self.dialect.emit_captured(label, var, command));
        self
    }

    #[must_use]
    pub fn raw(mut self, lines: Vec<String>) -> Self {
        self.lines.extend(lines);
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Everything a generated build needs: the script lines in execution
/// order and the objects fed to the packer and linker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub lines: Vec<String>,
    /// Root-relative object paths, one per retained source.
    pub objects: Vec<std::path::PathBuf>,
    /// Number of compile commands emitted.
    pub compiled: usize,
}

impl BuildPlan {
    /// Full script text, newline-terminated.
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}
