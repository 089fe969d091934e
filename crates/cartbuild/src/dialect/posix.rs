//! POSIX shell (bash) dialect.

use super::{Dialect, SAVE_BANKS};
use crate::config::Platform;

/// Bash script that aborts on the first failing command.
#[derive(Debug, Default, Clone, Copy)]
pub struct Posix {
    /// Spell the save offset as `${VAR-4}` (a default-value expansion that
    /// older generated scripts used) instead of `$((VAR - 4))`.
    pub legacy_save_offset: bool,
}

fn quote(label: &str) -> String {
    let mut out = String::with_capacity(label.len() + 2);
    out.push('"');
    for ch in label.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Punctuation the shell never treats specially inside a word.
const SAFE_PUNCT: &[char] = &['_', '-', '.', '/', '+', '=', ':', ',', '@', '%'];

fn is_shell_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || SAFE_PUNCT.contains(&ch)
}

impl Dialect for Posix {
    fn platform(&self) -> Platform {
        Platform::Posix
    }

    fn prelude(&self) -> Vec<String> {
        vec!["#!/bin/bash".into(), "set -e".into()]
    }

    fn emit_command(&self, label: &str, command: &str) -> Vec<String> {
        vec![format!("echo {}", quote(label)), command.to_string()]
    }

    fn emit_captured(&self, label: &str, var: &str, command: &str) -> Vec<String> {
        vec![
            format!("echo {}", quote(label)),
            format!("{var}=$({command})"),
            format!("echo \"VALUE of {var} WAS ${var}\""),
        ]
    }

    fn var(&self, name: &str) -> String {
        format!("${{{name}}}")
    }

    fn save_offset(&self, _label: &str, size_var: &str) -> (Vec<String>, String) {
        let expr = if self.legacy_save_offset {
            format!("${{{size_var}-{SAVE_BANKS}}}")
        } else {
            format!("$(({size_var} - {SAVE_BANKS}))")
        };
        (Vec::new(), expr)
    }

    fn separator(&self) -> char {
        '/'
    }

    fn script_name(&self) -> &'static str {
        "make.sh"
    }

    fn quote_arg(&self, arg: &str) -> String {
        if !arg.is_empty() && arg.chars().all(is_shell_safe) {
            return arg.to_string();
        }
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
