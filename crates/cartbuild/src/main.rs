//! # cartbuild
//!
//! Generate the GBDK build script for a Game Boy project.
//!
//! ## Usage
//!
//! ```bash
//! cartbuild generate <ROOT>      # Write <ROOT>/make.sh (or make.bat)
//! cartbuild generate <ROOT> --stdout
//! cartbuild flags                # Show compiler/linker flags
//! cartbuild status <ROOT>        # Show which sources need compiling
//! ```
//!
//! Settings come from `<ROOT>/cartbuild.toml`; command-line flags override.

use anyhow::{Context, Result};
use cartbuild::planner::FsObjectProbe;
use cartbuild::sources::FsSourceLister;
use cartbuild::toolchain::Flags;
use cartbuild::{BuildConfig, ConfigOverrides, Labels, Platform, ScriptGenerator, SourceState};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cartbuild", about = "Game Boy cartridge build script generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the build script
    Generate {
        /// Project build root (contains src/ and obj/)
        root: PathBuf,

        #[command(flatten)]
        config: ConfigOverrides,

        /// JSON label catalog overriding the English build log messages
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Output file (default: make.sh or make.bat in the build root)
        #[arg(short, long, conflicts_with = "stdout")]
        out: Option<PathBuf>,

        /// Print the script instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Print the composed compiler and linker flags
    Flags {
        /// Project build root to read cartbuild.toml from
        #[arg(default_value = ".")]
        root: PathBuf,

        #[command(flatten)]
        config: ConfigOverrides,
    },
    /// Show which sources will be compiled, reused or excluded
    Status {
        /// Project build root
        root: PathBuf,

        #[command(flatten)]
        config: ConfigOverrides,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            root,
            config,
            labels,
            out,
            stdout,
        } => {
            let config = config.resolve(&root)?;
            let labels = match labels {
                Some(path) => Labels::load(&path)?,
                None => Labels::default(),
            };
            generate(&root, &config, &labels, out, stdout)?;
        }
        Command::Flags { root, config } => {
            let flags = Flags::compose(&config.resolve(&root)?);
            println!("CFLAGS: {}", flags.cflags);
            println!("LFLAGS: {}", flags.lflags);
        }
        Command::Status { root, config } => status(&root, &config.resolve(&root)?)?,
    }

    Ok(())
}

fn generate(
    root: &Path,
    config: &BuildConfig,
    labels: &Labels,
    out: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    let generator = ScriptGenerator::new(&FsSourceLister, &FsObjectProbe, labels);
    let plan = generator.plan(root, config)?;
    let text = plan.render();

    if stdout {
        print!("{text}");
        return Ok(());
    }

    let out = out.unwrap_or_else(|| {
        let dialect = cartbuild::dialect::for_config(config);
        root.join(dialect.script_name())
    });
    fs::write(&out, &text).with_context(|| format!("Failed to write {}", out.display()))?;

    #[cfg(unix)]
    if config.platform == Platform::Posix {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&out, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make {} executable", out.display()))?;
    }

    println!(
        "Wrote {} ({} compile steps, {} objects)",
        out.display(),
        plan.compiled,
        plan.objects.len()
    );
    Ok(())
}

fn status(root: &Path, config: &BuildConfig) -> Result<()> {
    let labels = Labels::default();
    let generator = ScriptGenerator::new(&FsSourceLister, &FsObjectProbe, &labels);
    let report = generator.status(root, config)?;

    println!("Sources ({:?} driver):\n", config.music_driver);

    for entry in &report.entries {
        let name = entry.source.rel.display().to_string();
        match &entry.state {
            SourceState::Stale => println!("  {name:40} [stale]"),
            SourceState::Cached(object) => println!("  {name:40} [cached] {}", object.display()),
            SourceState::Excluded => println!("  {name:40} [excluded]"),
        }
    }

    println!();
    println!(
        "  Total: {} to compile, {} cached, {} excluded",
        report.stale(),
        report.cached(),
        report.excluded()
    );
    Ok(())
}
