use std::{path::PathBuf, process::Command};

use textsampler::{APP_NAME, FontCatalog};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_textsampler")
}

fn fonts_available() -> bool {
    FontCatalog::discover().is_ok()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn missing_phrase_exits_with_code_1() {
    let status = Command::new(bin()).status().unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn generates_samples_and_markup() {
    if !fonts_available() {
        eprintln!("no system fonts available, skipping");
        return;
    }
    let outdir = scratch_dir("ok");

    let status = Command::new(bin())
        .args(["--text", "hello", "--seed", "42", "--samples", "1"])
        .arg("--outdir")
        .arg(&outdir)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));

    let markup = std::fs::read_to_string(outdir.join("gt.txt")).unwrap();
    let lines: Vec<&str> = markup.lines().collect();
    assert_eq!(lines.len(), 1);
    let (rel_path, phrase) = lines[0].split_once('\t').unwrap();
    assert_eq!(phrase, "hello");
    assert!(rel_path.starts_with(&format!("{APP_NAME}/")));
    assert!(rel_path.ends_with(".jpg"));
    assert!(outdir.join(rel_path).is_file());
}

#[test]
fn short_flags_match_long_ones() {
    if !fonts_available() {
        eprintln!("no system fonts available, skipping");
        return;
    }
    let outdir = scratch_dir("short");

    let status = Command::new(bin())
        .args(["-t", "short flags", "-s", "2", "--seed", "9"])
        .arg("-o")
        .arg(&outdir)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));

    let markup = std::fs::read_to_string(outdir.join("gt.txt")).unwrap();
    assert_eq!(markup.lines().count(), 2);
}

#[test]
fn unknown_extension_fails_without_writing_samples() {
    if !fonts_available() {
        eprintln!("no system fonts available, skipping");
        return;
    }
    let outdir = scratch_dir("badext");

    let status = Command::new(bin())
        .args(["--text", "oops", "--extension", "nope"])
        .arg("--outdir")
        .arg(&outdir)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    let entries: Vec<_> = std::fs::read_dir(outdir.join(APP_NAME))
        .unwrap()
        .collect();
    assert!(entries.is_empty());
}

#[test]
fn png_extension_is_respected() {
    if !fonts_available() {
        eprintln!("no system fonts available, skipping");
        return;
    }
    let outdir = scratch_dir("png");

    let status = Command::new(bin())
        .args(["--text", "png run", "--seed", "4", "--samples", "1"])
        .args(["--extension", "png"])
        .arg("--outdir")
        .arg(&outdir)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));

    let markup = std::fs::read_to_string(outdir.join("gt.txt")).unwrap();
    let (rel_path, _) = markup.lines().next().unwrap().split_once('\t').unwrap();
    assert!(rel_path.ends_with(".png"));
    let bytes = std::fs::read(outdir.join(rel_path)).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}
