//! CLI tests driving the compiled binary.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Rgb, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 96])
    });
    let file = File::create(path).unwrap();
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), 90);
    encoder
        .encode(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

#[test]
fn rotate_skips_unloadable_paths_and_continues() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("good.jpg");
    write_jpeg(&good, 60, 40);
    let missing = tmp.path().join("missing.jpg");

    let output = Command::new(env!("CARGO_BIN_EXE_proofsheet"))
        .args([
            "rotate",
            good.to_str().unwrap(),
            missing.to_str().unwrap(),
            "--degrees",
            "90",
        ])
        .output()
        .expect("failed to run proofsheet");

    // The missing path is skipped, not fatal: the good image still rotates.
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Rotated 1 of 2"),
        "unexpected output: {stdout}"
    );

    let img = image::open(&good).unwrap();
    assert_eq!((img.width(), img.height()), (40, 60));
}

#[test]
fn scan_lists_the_catalog() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("dawn.jpg"), 40, 30);
    write_jpeg(&tmp.path().join("dusk.jpg"), 40, 30);

    let output = Command::new(env!("CARGO_BIN_EXE_proofsheet"))
        .args(["scan", tmp.path().to_str().unwrap()])
        .output()
        .expect("failed to run proofsheet");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Catalog (2 images)"));
    assert!(stdout.contains("001 dawn.jpg"));
    assert!(stdout.contains("002 dusk.jpg"));
}
