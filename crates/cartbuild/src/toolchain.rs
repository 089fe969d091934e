//! GBDK toolchain locations and flag composition.

use crate::config::{BuildConfig, MusicDriver, Platform};

/// Compiler driver, relative to the build root.
pub fn compiler(platform: Platform) -> &'static str {
    match platform {
        Platform::Win32 => r"..\_gbstools\gbdk\bin\lcc",
        Platform::Posix => "../_gbstools/gbdk/bin/lcc",
    }
}

/// Object packer, relative to the build root.
pub fn packer(platform: Platform) -> &'static str {
    match platform {
        Platform::Win32 => r"..\_gbstools\gbspack\gbspack",
        Platform::Posix => "../_gbstools/gbspack/gbspack",
    }
}

/// Final ROM image written by the link step.
pub const ROM_OUTPUT: &str = "build/rom/game.gb";
pub const ROM_NAME: &str = "game.gb";

const BASE_CFLAGS: &[&str] = &[
    "-Iinclude",
    "-Wa-Iinclude",
    "-Wa-I../_gbstools/gbdk/lib/small/asxxxx",
    "-Wl-a",
    "-DSGB",
    "-c",
];

const BASE_LFLAGS: &[&str] = &[
    "-Wl-ya4",
    "-Wl-j",
    "-Wl-m",
    "-Wl-w",
    "-Wl-klib",
    "-Wl-g_shadow_OAM2=0xDF00",
    "-Wl-g.STACK=0xDF00",
    "-Wi-e",
    "-Wm-ys",
];

/// Compiler and linker flag strings derived from a [`BuildConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    pub cflags: String,
    pub lflags: String,
}

impl Flags {
    pub fn compose(config: &BuildConfig) -> Self {
        let mut cflags: Vec<String> = BASE_CFLAGS.iter().map(|f| (*f).to_string()).collect();
        let mut lflags = vec![format!("-Wl-yt{}", config.cart_type)];
        lflags.extend(BASE_LFLAGS.iter().map(|f| (*f).to_string()));

        if config.custom_colors {
            cflags.push("-DCGB".into());
            lflags.push("-Wm-yC".into());
        }

        match config.music_driver {
            MusicDriver::Huge => {
                cflags.push("-DHUGE_TRACKER".into());
                lflags.push("-Wl-lhUGEDriver.lib".into());
            }
            MusicDriver::Gbt => {
                cflags.push("-DGBT_PLAYER".into());
                lflags.push("-Wl-lgbt_player.lib".into());
            }
        }

        if config.profile {
            cflags.push("-Wf--profile".into());
        }

        Flags {
            cflags: cflags.join(" "),
            lflags: lflags.join(" "),
        }
    }
}
