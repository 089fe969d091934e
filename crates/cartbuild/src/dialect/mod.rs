//! Script dialects.
//!
//! A [`Dialect`] knows how to spell the handful of constructs the build
//! script needs: a labelled command, a labelled command whose output is
//! captured into a variable, and the save-area offset used at link time.
//! One dialect is chosen per generated script.

mod batch;
mod posix;

pub use batch::Batch;
pub use posix::Posix;

use crate::config::{BuildConfig, Platform};
use std::path::{Component, Path};

/// Variable the packer's output (cartridge bank count) is bound to.
pub const CART_SIZE_VAR: &str = "CART_SIZE";

/// Banks at the end of the cartridge reserved for the save area.
pub const SAVE_BANKS: u32 = 4;

pub trait Dialect {
    /// Platform the script runs on; selects toolchain binary paths.
    fn platform(&self) -> Platform;

    /// Lines emitted before any command.
    fn prelude(&self) -> Vec<String>;

    /// Echo `label` to the build log, then run `command`.
    fn emit_command(&self, label: &str, command: &str) -> Vec<String>;

    /// Echo `label`, run `command` and bind its standard output to `var`.
    fn emit_captured(&self, label: &str, var: &str, command: &str) -> Vec<String>;

    /// Expansion of a previously bound variable.
    fn var(&self, name: &str) -> String;

    /// Lines computing the start of the save area from `size_var`, plus the
    /// expression that refers to the result in a later command.
    fn save_offset(&self, label: &str, size_var: &str) -> (Vec<String>, String);

    /// Path separator used when rendering root-relative paths.
    fn separator(&self) -> char;

    /// Default file name for the generated script.
    fn script_name(&self) -> &'static str;

    /// Quote one command-line argument so the shell passes it through as a
    /// single word.
    fn quote_arg(&self, arg: &str) -> String;

    /// Render a root-relative path as a command-line argument.
    fn arg(&self, rel: &Path) -> String {
        self.quote_arg(&self.path(rel))
    }

    /// Render a root-relative path with this dialect's separator.
    fn path(&self, rel: &Path) -> String {
        let sep = self.separator().to_string();
        rel.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(&sep)
    }
}

/// Pick the dialect for `config.platform`.
pub fn for_config(config: &BuildConfig) -> Box<dyn Dialect> {
    match config.platform {
        Platform::Win32 => Box::new(Batch),
        Platform::Posix => Box::new(Posix {
            legacy_save_offset: config.legacy_save_offset,
        }),
    }
}
