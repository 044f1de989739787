//! Integration tests for the rasterizer, through the library API and the
//! `svg-rasterize` binary.
#![cfg(feature = "raster")]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use sha2::{Digest, Sha256};
use svgshot::{RasterConfig, Rasterizer, RenderRequest, Strategy, Viewport};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn rasterize_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_svg-rasterize"));
    cmd.arg("--no-system-fonts");
    cmd
}

/// Decoded RGBA8 image
struct Decoded {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Decoded {
    fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }
}

fn decode(path: &Path) -> Decoded {
    let decoder = png::Decoder::new(fs::File::open(path).expect("open png"));
    let mut reader = decoder.read_info().expect("decode");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("frame");
    assert_eq!(info.color_type, png::ColorType::Rgba);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    buf.truncate(info.buffer_size());
    Decoded {
        width: info.width,
        height: info.height,
        pixels: buf,
    }
}

fn rasterizer() -> Rasterizer {
    Rasterizer::new(RasterConfig {
        load_system_fonts: false,
        font_files: Vec::new(),
    })
    .expect("rasterizer")
}

#[test]
fn logo_is_letterboxed_into_square() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("logo.png");
    let request = RenderRequest::rasterize(fixture("logo.svg"), "200", "200", &output).unwrap();

    let result = svgshot::render_to_file(&rasterizer(), &request).unwrap();
    assert_eq!(result.actual, Some(Viewport::new(200, 200)));
    assert_eq!(result.strategy, Strategy::Rasterize);

    let img = decode(&output);
    assert_eq!((img.width, img.height), (200, 200));

    // Transparent bands above and below, solid red in between
    for y in (0..50).chain(150..200) {
        for x in 0..200 {
            assert_eq!(img.rgba(x, y)[3], 0, "pixel ({}, {}) should be transparent", x, y);
        }
    }
    for y in [50, 100, 149] {
        for x in [0, 100, 199] {
            assert_eq!(img.rgba(x, y), [255, 0, 0, 255], "pixel ({}, {}) should be red", x, y);
        }
    }
}

#[test]
fn output_size_ignores_source_aspect() {
    let dir = tempfile::tempdir().unwrap();
    let r = rasterizer();
    for (w, h) in [(16, 16), (300, 20), (20, 300), (1, 1), (512, 256)] {
        let output = dir.path().join(format!("{}x{}.png", w, h));
        let request = RenderRequest::rasterize(fixture("banner.svg"), &w.to_string(), &h.to_string(), &output).unwrap();
        svgshot::render_to_file(&r, &request).unwrap();

        let img = decode(&output);
        assert_eq!((img.width, img.height), (w, h));
    }
}

#[test]
fn existing_output_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.png");
    fs::write(&output, b"stale").unwrap();

    let request = RenderRequest::rasterize(fixture("logo.svg"), "32", "32", &output).unwrap();
    svgshot::render_to_file(&rasterizer(), &request).unwrap();
    assert_eq!(decode(&output).width, 32);
}

#[test]
fn cli_prints_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("logo.png");

    let out = rasterize_bin()
        .arg(fixture("logo.svg"))
        .args(["200", "200"])
        .arg(&output)
        .output()
        .expect("run svg-rasterize");

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with("Rasterized "), "{}", stdout);
    assert!(stdout.trim_end().ends_with("(200x200)"), "{}", stdout);
    assert!(output.exists());
}

#[test]
fn cli_output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let digests: Vec<String> = ["a.png", "b.png"]
        .iter()
        .map(|name| {
            let output = dir.path().join(name);
            let status = rasterize_bin()
                .arg(fixture("logo.svg"))
                .args(["96", "64"])
                .arg(&output)
                .status()
                .expect("run svg-rasterize");
            assert!(status.success());
            hex::encode(Sha256::digest(fs::read(&output).unwrap()))
        })
        .collect();

    assert_eq!(digests[0], digests[1]);
}

#[test]
fn cli_rejects_non_numeric_width() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("logo.png");

    let out = rasterize_bin()
        .arg(fixture("logo.svg"))
        .args(["abc", "200"])
        .arg(&output)
        .output()
        .expect("run svg-rasterize");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Invalid width 'abc'"), "{}", stderr);
    assert!(out.stdout.is_empty());
    assert!(!output.exists());
}

#[test]
fn cli_rejects_zero_and_negative_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("logo.png");

    for (w, h) in [("0", "10"), ("10", "-3")] {
        let status = rasterize_bin()
            .arg(fixture("logo.svg"))
            .args([w, h])
            .arg(&output)
            .status()
            .expect("run svg-rasterize");
        assert!(!status.success(), "{}x{} should fail", w, h);
    }
    assert!(!output.exists());
}

#[test]
fn cli_rejects_oversized_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("huge.png");

    let out = rasterize_bin()
        .arg(fixture("logo.svg"))
        .args(["50000", "50000"])
        .arg(&output)
        .output()
        .expect("run svg-rasterize");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Canvas 50000x50000 exceeds"), "{}", stderr);
    assert!(!output.exists());
}

#[test]
fn cli_reports_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("logo.png");

    let out = rasterize_bin()
        .arg(dir.path().join("nope.svg"))
        .args(["10", "10"])
        .arg(&output)
        .output()
        .expect("run svg-rasterize");

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("I/O error"));
    assert!(!output.exists());
}

#[test]
fn cli_reports_corrupt_svg() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.svg");
    fs::write(&source, "<svg><rect").unwrap();
    let output = dir.path().join("broken.png");

    let out = rasterize_bin()
        .arg(&source)
        .args(["10", "10"])
        .arg(&output)
        .output()
        .expect("run svg-rasterize");

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to parse SVG"));
    assert!(!output.exists());
}

#[test]
fn cli_reports_unwritable_destination() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing-dir/logo.png");

    let out = rasterize_bin()
        .arg(fixture("logo.svg"))
        .args(["10", "10"])
        .arg(&output)
        .output()
        .expect("run svg-rasterize");

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("I/O error"));
}
