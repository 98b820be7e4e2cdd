use std::path::PathBuf;
use std::process::Command;

#[test]
fn cli_renders_png_frames() {
    let dir = PathBuf::from("target").join("cli_smoke_wavefill");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_wavefill"))
        .args(["--width", "32", "--height", "24", "--frames", "2", "--out-dir"])
        .arg(&dir)
        .output()
        .expect("spawn wavefill binary");
    assert!(output.status.success());

    // The binary installs a stderr subscriber, so the library's debug
    // events from start() must show up.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("wave animation started"),
        "missing tracing output: {stderr}"
    );

    for frame in ["frame_0000.png", "frame_0001.png"] {
        let img = image::open(dir.join(frame)).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (32, 24), "{frame}");
    }
}

#[test]
fn cli_rejects_zero_frames() {
    let status = Command::new(env!("CARGO_BIN_EXE_wavefill"))
        .args(["--frames", "0"])
        .status()
        .expect("spawn wavefill binary");
    assert!(!status.success());
}
