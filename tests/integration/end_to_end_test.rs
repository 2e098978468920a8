//! End-to-end runs of the analysis and repackaging pipeline
//!
//! These go through `run_with_settings`, the same entry point the binary
//! uses once configuration has been loaded.

use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use scene_walker::{
    cli::run_with_settings,
    error::WalkerError,
    models::config::{OutputFormat, Settings},
    scene::NullSceneProvider,
};

use super::fixtures::{create_chair_asset, write_file};

fn quiet_settings(scene: std::path::PathBuf) -> Settings {
    Settings {
        scene_path: scene,
        use_colors: false,
        show_progress: false,
        ..Default::default()
    }
}

#[test]
fn test_analysis_report_and_graph_export() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());
    let report_path = temp_dir.path().join("report.json");
    let graph_path = temp_dir.path().join("refs.dot");

    let settings = Settings {
        output_format: OutputFormat::Json,
        output_file: Some(report_path.clone()),
        graph_output: Some(graph_path.clone()),
        ..quiet_settings(main)
    };
    run_with_settings(&settings, &NullSceneProvider).unwrap();

    let json: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["references"].as_array().unwrap().len(), 3);
    assert_eq!(json["textures"].as_array().unwrap().len(), 2);

    let dot = fs::read_to_string(&graph_path).unwrap();
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("layout.usda"));
    assert!(dot.contains("chair_geo.usda"));
    assert!(dot.contains("missing_payload.usda"));
}

#[test]
fn test_package_run_writes_copy_report() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(&temp_dir.path().join("farm"));
    let dest = temp_dir.path().join("delivery");
    let report_path = temp_dir.path().join("copy.csv");

    let settings = Settings {
        output_format: OutputFormat::Csv,
        output_file: Some(report_path.clone()),
        package_dir: Some(dest.clone()),
        ..quiet_settings(main)
    };
    run_with_settings(&settings, &NullSceneProvider).unwrap();

    let chair = dest.join("filmserver").join("library").join("prop").join("chair");
    assert!(chair.join("main.usda").is_file());
    assert!(chair.join("tex").join("wood.1003.exr").is_file());

    let csv = fs::read_to_string(&report_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Status,Category,Source,Target,Detail");
    assert_eq!(lines.iter().filter(|l| l.starts_with("copied,")).count(), 8);
}

#[test]
fn test_copies_are_byte_identical() {
    let temp_dir = tempdir().unwrap();
    let asset_dir = temp_dir.path().join("filmserver").join("set");
    let scene = write_file(
        &asset_dir.join("set.usda"),
        "#usda 1.0\ndef Shader \"wall\"\n{\n    asset inputs:diffuse_texture = @textures/brick.png@\n}\n",
    );
    write_file(&asset_dir.join("textures").join("brick.png"), "\u{89}PNG brick pixels");
    let dest = temp_dir.path().join("out");

    let settings = Settings {
        output_file: Some(temp_dir.path().join("copy.txt")),
        package_dir: Some(dest.clone()),
        ..quiet_settings(scene.clone())
    };
    run_with_settings(&settings, &NullSceneProvider).unwrap();

    let copied_scene = dest.join("filmserver").join("set").join("set.usda");
    let copied_texture = dest.join("filmserver").join("set").join("textures").join("brick.png");
    assert_eq!(fs::read(&copied_scene).unwrap(), fs::read(&scene).unwrap());
    assert_eq!(
        fs::read(&copied_texture).unwrap(),
        fs::read(asset_dir.join("textures").join("brick.png")).unwrap()
    );

    let text = fs::read_to_string(temp_dir.path().join("copy.txt")).unwrap();
    assert!(text.contains("Copied 1 main file, 0 references, 1 textures"));
}

#[test]
fn test_repackage_into_source_tree_is_reported() {
    let temp_dir = tempdir().unwrap();
    let asset_dir = temp_dir.path().join("filmserver").join("set");
    let scene = write_file(&asset_dir.join("set.usda"), "#usda 1.0\n");

    // destination equal to the source root: every copy targets its own source
    let settings = Settings {
        output_file: Some(temp_dir.path().join("copy.txt")),
        package_dir: Some(temp_dir.path().to_path_buf()),
        ..quiet_settings(scene)
    };
    let err = run_with_settings(&settings, &NullSceneProvider).unwrap_err();
    assert!(matches!(err, WalkerError::Analysis { .. }));

    let text = fs::read_to_string(temp_dir.path().join("copy.txt")).unwrap();
    assert!(text.contains("source and destination are the same file"));
}
