//! Build configuration.
//!
//! Reads `cartbuild.toml` from the build root. Every field has a default, so
//! a missing file is not an error; a malformed one is.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "cartbuild.toml";

/// Audio playback engine linked into the ROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MusicDriver {
    /// hUGEDriver
    Huge,
    /// GBT Player
    Gbt,
}

impl MusicDriver {
    /// Path marker tagging a source file as belonging to this driver.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Huge => "HUGE_TRACKER",
            Self::Gbt => "GBT_PLAYER",
        }
    }

    /// The driver that is not `self`.
    pub fn other(self) -> Self {
        match self {
            Self::Huge => Self::Gbt,
            Self::Gbt => Self::Huge,
        }
    }
}

/// Script dialect the generated build script is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows batch
    Win32,
    /// POSIX shell
    Posix,
}

impl Platform {
    /// Platform of the machine running the generator.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Win32
        } else {
            Self::Posix
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Cartridge type code passed to the linker (`-Wl-yt`).
    #[serde(default = "default_cart_type")]
    pub cart_type: String,

    #[serde(default)]
    pub custom_colors: bool,

    #[serde(default = "default_music_driver")]
    pub music_driver: MusicDriver,

    #[serde(default)]
    pub profile: bool,

    #[serde(default)]
    pub platform: Platform,

    /// Emit `${CART_SIZE-4}` in POSIX link commands instead of arithmetic.
    #[serde(default)]
    pub legacy_save_offset: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            cart_type: default_cart_type(),
            custom_colors: false,
            music_driver: default_music_driver(),
            profile: false,
            platform: Platform::default(),
            legacy_save_offset: false,
        }
    }
}

fn default_cart_type() -> String {
    "0x1B".to_string()
}

fn default_music_driver() -> MusicDriver {
    MusicDriver::Gbt
}

impl BuildConfig {
    /// Load `cartbuild.toml` from `root`, falling back to defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("no {} in {}, using defaults", CONFIG_FILE, root.display());
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load an explicit config file. The file must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigOverrides {
    /// Config file (default: <ROOT>/cartbuild.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Cartridge type code (e.g. 0x1B)
    #[arg(long)]
    pub cart_type: Option<String>,

    /// Enable Game Boy Color palettes
    #[arg(long)]
    pub colors: bool,

    /// Build with profiling hooks
    #[arg(long)]
    pub profile: bool,

    /// Music driver to link
    #[arg(long, value_enum)]
    pub driver: Option<MusicDriver>,

    /// Script dialect to emit
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Emit the historical `${CART_SIZE-4}` save offset in shell scripts
    #[arg(long)]
    pub legacy_save_offset: bool,
}

impl ConfigOverrides {
    /// Load the config (`--config` file if given, else `<root>/cartbuild.toml`)
    /// and apply the overrides to it.
    pub fn resolve(&self, root: &Path) -> Result<BuildConfig> {
        let config = match &self.config {
            Some(path) => BuildConfig::from_file(path)?,
            None => BuildConfig::load(root)?,
        };
        Ok(self.apply(config))
    }

    /// Set every field given on the command line. Switches only turn
    /// features on; an unset switch keeps the file's value.
    #[must_use]
    pub fn apply(&self, mut config: BuildConfig) -> BuildConfig {
        if let Some(cart_type) = &self.cart_type {
            config.cart_type.clone_from(cart_type);
        }
        if let Some(driver) = self.driver {
            config.music_driver = driver;
        }
        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        config.custom_colors |= self.colors;
        config.profile |= self.profile;
        config.legacy_save_offset |= self.legacy_save_offset;
        config
    }
}
