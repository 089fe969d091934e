//! End-to-end script generation against real project trees.

use cartbuild::labels::Labels;
use cartbuild::planner::FsObjectProbe;
use cartbuild::sources::FsSourceLister;
use cartbuild::{generate, BuildConfig, MusicDriver, Platform, ScriptGenerator, SourceState};
use std::path::{Path, PathBuf};
use std::fs;
use tempfile::TempDir;

fn project(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for rel in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
    dir
}

fn config(platform: Platform, driver: MusicDriver) -> BuildConfig {
    BuildConfig {
        platform,
        music_driver: driver,
        ..BuildConfig::default()
    }
}

fn is_compile(line: &str) -> bool {
    line.contains("bin/lcc") && line.contains(" -c -")
}

fn compile_lines(script: &str) -> Vec<&str> {
    script.lines().filter(|l| is_compile(l)).collect()
}

#[test]
fn test_posix_two_file_scenario() {
    let dir = project(&["src/a.c", "src/b.s"]);
    let script = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt)).unwrap();
    let lines: Vec<&str> = script.lines().collect();

    assert_eq!(lines[0], "#!/bin/bash");
    assert_eq!(lines[1], "set -e");
    assert_eq!(lines[2], "echo \"Compiling: src/a.c\"");
    assert!(lines[3].ends_with("-o obj/a.o src/a.c"));
    assert_eq!(lines[4], "echo \"Compiling: src/b.s\"");
    assert!(lines[5].ends_with("-o obj/b.o src/b.s"));
    assert_eq!(lines[6], "echo \"Packing\"");
    assert!(lines[7].starts_with("CART_SIZE=$(../_gbstools/gbspack/gbspack "));
    assert!(lines[7].ends_with("obj/a.o obj/b.o)"));
    assert_eq!(lines[8], "echo \"VALUE of CART_SIZE WAS $CART_SIZE\"");
    assert_eq!(lines[9], "echo \"Linking: game.gb\"");
    assert!(lines[10].ends_with("-o build/rom/game.gb obj/a.rel obj/b.rel"));
    assert_eq!(lines.len(), 11);

    for token in ["@echo", "SET /P", "SET /A", "%CART_SIZE%", "\\"] {
        assert!(!script.contains(token), "unexpected {token:?} in POSIX script");
    }
}

#[test]
fn test_windows_script_has_no_posix_syntax() {
    let dir = project(&["src/a.c", "src/core/b.s"]);
    let script = generate(dir.path(), &config(Platform::Win32, MusicDriver::Gbt)).unwrap();

    assert!(!script.contains("#!/bin/bash"));
    assert!(!script.contains("set -e"));
    assert!(!script.contains("$("));
    assert!(script.contains("@SET /P CART_SIZE=<CART_SIZE"));
    assert!(script.contains("@SET /A \"START_SAVE = CART_SIZE - 4\""));
    assert!(script.contains(r"@echo Compiling: src\core\b.s"));
    assert!(script
        .lines()
        .last()
        .unwrap()
        .contains("-Wl-yo%CART_SIZE% -Wl-g__start_save=%START_SAVE%"));
}

#[test]
fn test_driver_exclusion() {
    let dir = project(&[
        "src/main.c",
        "src/core/HUGE_TRACKER/hUGEDriver.s",
        "src/core/GBT_PLAYER/gbt_player.s",
        "src/core/GBT_PLAYER/gbt_player_bank1.s",
    ]);

    let huge = generate(dir.path(), &config(Platform::Posix, MusicDriver::Huge)).unwrap();
    assert!(compile_lines(&huge).iter().all(|l| !l.contains("GBT_PLAYER")));
    assert_eq!(compile_lines(&huge).len(), 2);
    assert!(huge.contains("obj/hUGEDriver.rel"));
    assert!(!huge.contains("gbt_player.rel"));

    let gbt = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt)).unwrap();
    assert!(compile_lines(&gbt).iter().all(|l| !l.contains("HUGE_TRACKER")));
    assert_eq!(compile_lines(&gbt).len(), 3);
    assert!(!gbt.contains("hUGEDriver.rel"));
}

#[test]
fn test_existing_objects_skip_compilation() {
    let dir = project(&["src/a.c", "src/data/b.c", "obj/a.o", "obj/b.o"]);
    let labels = Labels::default();
    let generator = ScriptGenerator::new(&FsSourceLister, &FsObjectProbe, &labels);
    let plan = generator
        .plan(dir.path(), &config(Platform::Posix, MusicDriver::Gbt))
        .unwrap();

    assert_eq!(plan.compiled, 0);
    assert_eq!(plan.objects.len(), 2);
    let script = plan.render();
    assert!(compile_lines(&script).is_empty());
    assert!(script.contains("obj/a.rel obj/b.rel"));
}

#[test]
fn test_partial_rebuild_only_compiles_missing() {
    let dir = project(&["src/a.c", "src/b.c", "src/c.c", "obj/b.o"]);
    let script = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt)).unwrap();
    let compiles = compile_lines(&script);
    assert_eq!(compiles.len(), 2);
    assert!(compiles[0].ends_with("src/a.c"));
    assert!(compiles[1].ends_with("src/c.c"));
    assert!(script.contains("obj/a.rel obj/b.rel obj/c.rel"));
}

#[test]
fn test_ordering_compile_pack_link() {
    let dir = project(&["src/z.c", "src/m/y.s", "src/a.c"]);
    let script = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt)).unwrap();
    let lines: Vec<&str> = script.lines().collect();

    let pack = lines.iter().position(|l| l.starts_with("CART_SIZE=$(")).unwrap();
    let last_compile = lines.iter().rposition(|l| is_compile(l)).unwrap();
    assert!(last_compile < pack);
    assert!(lines.last().unwrap().contains("-o build/rom/game.gb"));

    let compiles = compile_lines(&script);
    assert!(compiles[0].ends_with("src/a.c"));
    assert!(compiles[1].ends_with("src/m/y.s"));
    assert!(compiles[2].ends_with("src/z.c"));
}

#[test]
fn test_generation_is_deterministic() {
    let dir = project(&["src/b.c", "src/a.c", "src/data/c.s"]);
    let cfg = config(Platform::Posix, MusicDriver::Huge);
    assert_eq!(
        generate(dir.path(), &cfg).unwrap(),
        generate(dir.path(), &cfg).unwrap()
    );
}

#[test]
fn test_empty_project_still_packs_and_links() {
    let dir = project(&[]);
    let script = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt)).unwrap();
    assert!(compile_lines(&script).is_empty());
    assert!(script.contains("CART_SIZE=$("));
    assert!(script.trim_end().ends_with("-o build/rom/game.gb"));
}

#[test]
fn test_object_collision_aborts() {
    let dir = project(&["src/a.c", "src/data/a.c"]);
    let result = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt));
    assert!(result.is_err());
}

#[test]
fn test_custom_labels() {
    let dir = project(&["src/a.c"]);
    let labels = Labels::from_json(
        r#"{"COMPILER_COMPILING": "Compilation", "COMPILER_LINKING": "Liaison"}"#,
    )
    .unwrap();
    let generator = ScriptGenerator::new(&FsSourceLister, &FsObjectProbe, &labels);
    let script = generator
        .generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt))
        .unwrap();
    assert!(script.contains("echo \"Compilation: src/a.c\""));
    assert!(script.contains("echo \"Liaison: game.gb\""));
    assert!(script.contains("echo \"Packing\""));
}

#[test]
fn test_config_file_drives_generation() {
    let dir = project(&["src/a.c"]);
    fs::write(
        dir.path().join("cartbuild.toml"),
        "platform = \"win32\"\ncustom_colors = true\nprofile = true\n",
    )
    .unwrap();

    let config = BuildConfig::load(dir.path()).unwrap();
    let script = generate(dir.path(), &config).unwrap();
    assert!(script.starts_with("@echo"));
    assert!(script.contains("-DCGB -DGBT_PLAYER -Wf--profile"));
    assert!(script.contains("-Wm-yC"));
}

#[test]
fn test_status_reports_stale_cached_excluded() {
    let dir = project(&[
        "src/a.c",
        "src/b.c",
        "src/core/HUGE_TRACKER/hUGEDriver.s",
        "obj/b.o",
    ]);
    let labels = Labels::default();
    let generator = ScriptGenerator::new(&FsSourceLister, &FsObjectProbe, &labels);
    let report = generator
        .status(dir.path(), &config(Platform::Posix, MusicDriver::Gbt))
        .unwrap();

    let states: Vec<(&Path, &SourceState)> = report
        .entries
        .iter()
        .map(|e| (e.source.rel.as_path(), &e.state))
        .collect();
    assert_eq!(
        states,
        [
            (Path::new("src/a.c"), &SourceState::Stale),
            (Path::new("src/b.c"), &SourceState::Cached(PathBuf::from("obj/b.o"))),
            (Path::new("src/core/HUGE_TRACKER/hUGEDriver.s"), &SourceState::Excluded),
        ]
    );
    assert_eq!(report.stale(), 1);
    assert_eq!(report.cached(), 1);
    assert_eq!(report.excluded(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlinked_source_is_compiled_and_linked() {
    let dir = project(&["src/main.c"]);
    let shared = project(&["shared.c"]);
    std::os::unix::fs::symlink(
        shared.path().join("shared.c"),
        dir.path().join("src/shared.c"),
    )
    .unwrap();

    let script = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt)).unwrap();
    assert!(script.contains("-o obj/shared.o src/shared.c"));
    assert!(script.contains("obj/main.rel obj/shared.rel"));
}

#[test]
fn test_hidden_files_are_not_built() {
    let dir = project(&["src/main.c", "src/.main.c.swp.c", "src/.git/x.c"]);
    let script = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt)).unwrap();
    assert_eq!(compile_lines(&script).len(), 1);
    assert!(script.ends_with("obj/main.rel\n"));
}

#[test]
fn test_paths_with_spaces_are_quoted() {
    let dir = project(&["src/my scene.c"]);

    let posix = generate(dir.path(), &config(Platform::Posix, MusicDriver::Gbt)).unwrap();
    assert!(posix.contains("-o 'obj/my scene.o' 'src/my scene.c'"));
    assert!(posix.contains("echo \"Compiling: src/my scene.c\""));
    assert!(posix.contains("-o build/rom/game.gb 'obj/my scene.rel'"));

    let batch = generate(dir.path(), &config(Platform::Win32, MusicDriver::Gbt)).unwrap();
    assert!(batch.contains(r#"-o "obj\my scene.o" "src\my scene.c""#));
}
