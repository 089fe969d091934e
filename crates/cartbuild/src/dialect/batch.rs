//! Windows batch dialect.

use super::{Dialect, SAVE_BANKS};
use crate::config::Platform;

const START_SAVE_VAR: &str = "START_SAVE";

/// `cmd.exe` batch file. Every line is `@`-prefixed so commands are not
/// echoed; captured output goes through a scratch file named after the
/// variable.
#[derive(Debug, Default, Clone, Copy)]
pub struct Batch;

fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for ch in label.chars() {
        match ch {
            '^' | '&' | '|' | '<' | '>' => {
                out.push('^');
                out.push(ch);
            }
            '%' => out.push_str("%%"),
            _ => out.push(ch),
        }
    }
    out
}

/// Characters `cmd.exe` splits or redirects on outside double quotes.
const SPECIAL: &[char] = &['^', '&', '|', '<', '>', '(', ')', ',', ';', '='];

fn needs_quotes(arg: &str) -> bool {
    arg.is_empty() || arg.chars().any(|ch| ch.is_whitespace() || SPECIAL.contains(&ch))
}

impl Dialect for Batch {
    fn platform(&self) -> Platform {
        Platform::Win32
    }

    fn prelude(&self) -> Vec<String> {
        Vec::new()
    }

    fn emit_command(&self, label: &str, command: &str) -> Vec<String> {
        vec![format!("@echo {}", escape(label)), format!("@{command}")]
    }

    fn emit_captured(&self, label: &str, var: &str, command: &str) -> Vec<String> {
        vec![
            format!("@echo {}", escape(label)),
            format!("@{command}>{var}"),
            format!("@SET /P {var}=<{var}"),
        ]
    }

    fn var(&self, name: &str) -> String {
        format!("%{name}%")
    }

    fn save_offset(&self, label: &str, size_var: &str) -> (Vec<String>, String) {
        let lines = self.emit_command(
            label,
            &format!("SET /A \"{START_SAVE_VAR} = {size_var} - {SAVE_BANKS}\""),
        );
        (lines, self.var(START_SAVE_VAR))
    }

    fn separator(&self) -> char {
        '\\'
    }

    fn script_name(&self) -> &'static str {
        "make.bat"
    }

    fn quote_arg(&self, arg: &str) -> String {
        let arg = arg.replace('%', "%%");
        if needs_quotes(&arg) {
            format!("\"{arg}\"")
        } else {
            arg
        }
    }
}
