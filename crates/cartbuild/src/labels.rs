//! Build log labels.
//!
//! Labels are looked up by fixed message id. A JSON catalog (the same
//! `{"ID": "text"}` shape used by translation files) can override any of
//! them; ids it does not mention keep their English text.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    Compiling,
    Packing,
    Linking,
    CalculatingStartSave,
}

impl Message {
    pub const ALL: [Message; 4] = [
        Message::Compiling,
        Message::Packing,
        Message::Linking,
        Message::CalculatingStartSave,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Compiling => "COMPILER_COMPILING",
            Self::Packing => "COMPILER_PACKING",
            Self::Linking => "COMPILER_LINKING",
            Self::CalculatingStartSave => "COMPILER_CALCULATING_START_SAVE",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Self::Compiling => "Compiling",
            Self::Packing => "Packing",
            Self::Linking => "Linking",
            Self::CalculatingStartSave => "Calculating start of save area",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Labels {
    overrides: HashMap<Message, String>,
}

impl Labels {
    /// Parse a JSON catalog. Unknown ids are ignored.
    pub fn from_json(content: &str) -> Result<Self> {
        let catalog: HashMap<String, String> = serde_json::from_str(content)
            .context("Label catalog must be a JSON object of strings")?;

        let overrides = Message::ALL
            .into_iter()
            .filter_map(|msg| catalog.get(msg.id()).map(|text| (msg, text.clone())))
            .collect();
        Ok(Labels { overrides })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn get(&self, msg: Message) -> &str {
        self.overrides
            .get(&msg)
            .map_or_else(|| msg.english(), String::as_str)
    }
}
