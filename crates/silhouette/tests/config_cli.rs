use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use sceneconfig::SceneConfig;
use tempfile::TempDir;

fn silhouette(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_silhouette"))
        .env("SILHOUETTE_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("failed to run silhouette")
}

#[test]
fn config_print_emits_defaults_without_a_scene_file() {
    let root = TempDir::new().unwrap();

    let output = silhouette(root.path(), &["config", "print"]);
    assert!(output.status.success());

    let printed = String::from_utf8(output.stdout).unwrap();
    let config = SceneConfig::from_toml_str(&printed).expect("printed config parses");
    assert_eq!(config, SceneConfig::default());
}

#[test]
fn config_print_reads_discovered_scene_file() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("scene.toml"),
        "[window]\nwidth = 1024\n\n[shaders]\ndir = \"glsl\"\n",
    )
    .unwrap();

    let output = silhouette(root.path(), &["config", "print"]);
    assert!(output.status.success());

    let config = SceneConfig::from_toml_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(config.window.width, 1024);
    assert_eq!(config.shaders.dir, root.path().join("glsl"));
}

#[test]
fn command_line_overrides_apply_to_printed_config() {
    let root = TempDir::new().unwrap();
    let explicit = root.path().join("custom.toml");
    fs::write(&explicit, "[window]\ntitle = \"outline\"\n").unwrap();
    let explicit = explicit.to_str().unwrap();

    let output = silhouette(
        root.path(),
        &[
            "--config",
            explicit,
            "--size",
            "640x480",
            "--no-vsync",
            "config",
            "print",
        ],
    );
    assert!(output.status.success());

    let config = SceneConfig::from_toml_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(config.window.title, "outline");
    assert_eq!((config.window.width, config.window.height), (640, 480));
    assert!(!config.window.vsync);
}

#[test]
fn invalid_scene_file_fails() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("scene.toml"), "[camera]\nzoom = 90.0\n").unwrap();

    let output = silhouette(root.path(), &["config", "print"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("camera.zoom"), "stderr was: {stderr}");
}

#[test]
fn missing_explicit_config_fails() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("absent.toml");

    let output = silhouette(
        root.path(),
        &["--config", missing.to_str().unwrap(), "config", "print"],
    );
    assert!(!output.status.success());
}

#[test]
fn config_where_reports_env_directory() {
    let root = TempDir::new().unwrap();

    let output = silhouette(root.path(), &["config", "where"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&root.path().display().to_string()));
    assert!(stdout.contains("SILHOUETTE_CONFIG_DIR"));
    assert!(stdout.contains("built-in defaults"));
}
