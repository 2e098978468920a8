use std::path::{Path, PathBuf};
use tempfile::tempdir;
use scene_walker::{
    cli::package_scene,
    core::{compute_relative_destination, DestinationContext, GraphWalker, RepackageOptions, Repackager, WalkOptions},
    models::{
        analysis::{AnalysisReport, ReferenceKind},
        config::Settings,
        package::{CopyCategory, RepackageReference, RepackageRequest, RepackageTexture},
    },
    scene::NullSceneProvider,
};

use super::fixtures::{create_chair_asset, write_file};

fn analyze(main: &Path) -> AnalysisReport {
    let mut walker = GraphWalker::new(&NullSceneProvider, WalkOptions::default()).unwrap();
    walker.analyze(main, None)
}

#[test]
fn test_repackage_rebuilds_tree_from_root_marker() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(&temp_dir.path().join("farm"));
    let dest = temp_dir.path().join("out");

    let report = analyze(&main);
    assert_eq!(report.references.len(), 3);
    let copy_report = package_scene(&Settings::default(), &report, &dest, None);

    assert!(copy_report.success, "{}", copy_report.message);
    assert!(!copy_report.dry_run);

    let chair = dest.join("filmserver").join("library").join("prop").join("chair");
    assert!(chair.join("main.usda").is_file());
    assert!(chair.join("layout.usda").is_file());
    assert!(chair.join("geo").join("chair_geo.usda").is_file());
    for tile in 1001..=1004 {
        assert!(chair.join("tex").join(format!("wood.{}.exr", tile)).is_file());
    }
    assert!(chair.join("tex").join("rough.jpg").is_file());

    // main.usda is also listed as a reference through the layout cycle; it is copied once
    assert_eq!(copy_report.copied.references.len(), 2);
    assert!(copy_report.skipped.is_empty());
    // four tiles plus the flat texture
    assert_eq!(copy_report.copied.textures.len(), 5);
    assert_eq!(copy_report.copied.total(), 8);
    assert!(copy_report.message.starts_with("Copied 1 main file, 2 references, 5 textures"));
}

#[test]
fn test_dry_run_plans_without_writing() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(&temp_dir.path().join("farm"));
    let dest = temp_dir.path().join("out");

    let settings = Settings {
        dry_run: true,
        ..Default::default()
    };
    let copy_report = package_scene(&settings, &analyze(&main), &dest, None);

    assert!(copy_report.success);
    assert!(copy_report.dry_run);
    assert!(copy_report.message.starts_with("Would copy"));
    assert_eq!(copy_report.copied.total(), 8);
    assert!(!dest.exists());
}

#[test]
fn test_missing_sources_are_skipped() {
    let temp_dir = tempdir().unwrap();
    let asset_dir = temp_dir.path().join("asset");
    let main = write_file(&asset_dir.join("main.usda"), "#usda 1.0\n");
    let dest = temp_dir.path().join("out");

    let request = RepackageRequest {
        main_asset_path: main,
        dest_root: dest.clone(),
        references: vec![RepackageReference {
            path: asset_dir.join("gone.usda"),
            kind: ReferenceKind::Reference,
        }],
        textures: vec![RepackageTexture {
            path: asset_dir.join("tex").join("skin.<UDIM>.exr"),
            source: "main.usda:UDIM".to_string(),
            tile_count: Some(0),
        }],
    };

    let copy_report = Repackager::new(RepackageOptions::default()).repackage(&request);

    assert!(copy_report.success);
    assert!(dest.join("main.usda").is_file());
    assert_eq!(copy_report.skipped.len(), 2);

    let reasons: Vec<(CopyCategory, &str)> = copy_report
        .skipped
        .iter()
        .map(|s| (s.category, s.reason.as_str()))
        .collect();
    assert!(reasons.contains(&(CopyCategory::Reference, "source does not exist")));
    assert!(reasons.contains(&(CopyCategory::Texture, "no tiles found")));
}

#[test]
fn test_invalid_request_fails() {
    let request = RepackageRequest {
        main_asset_path: PathBuf::new(),
        dest_root: PathBuf::from("/tmp/never"),
        references: Vec::new(),
        textures: Vec::new(),
    };

    let copy_report = Repackager::new(RepackageOptions::default()).repackage(&request);
    assert!(!copy_report.success);
    assert!(copy_report.message.contains("mainAssetPath"));
    assert_eq!(copy_report.copied.total(), 0);
}

#[test]
fn test_missing_main_asset_fails() {
    let temp_dir = tempdir().unwrap();
    let request = RepackageRequest {
        main_asset_path: temp_dir.path().join("nowhere").join("main.usda"),
        dest_root: temp_dir.path().join("out"),
        references: Vec::new(),
        textures: Vec::new(),
    };

    let copy_report = Repackager::new(RepackageOptions::default()).repackage(&request);
    assert!(!copy_report.success);
    assert_eq!(copy_report.skipped.len(), 1);
    assert_eq!(copy_report.skipped[0].category, CopyCategory::Main);
}

#[test]
fn test_destination_rules() {
    let folders = vec!["textures".to_string()];
    let main_dir = PathBuf::from("/jobs/show/asset");
    let context = DestinationContext {
        root_marker: "filmserver",
        main_asset_dir: Some(main_dir.as_path()),
        convention_folders: &folders,
    };

    // root marker segment wins
    assert_eq!(
        compute_relative_destination(Path::new("/mnt/filmserver/lib/a.usda"), &context),
        PathBuf::from("filmserver/lib/a.usda")
    );
    // then the main asset's directory
    assert_eq!(
        compute_relative_destination(Path::new("/jobs/show/asset/geo/b.usda"), &context),
        PathBuf::from("geo/b.usda")
    );
    // then a convention folder
    assert_eq!(
        compute_relative_destination(Path::new("/srv/lib/textures/wood/c.exr"), &context),
        PathBuf::from("textures/wood/c.exr")
    );
    // finally the parent directory name
    assert_eq!(
        compute_relative_destination(Path::new("/srv/lib/misc/d.jpg"), &context),
        PathBuf::from("misc/d.jpg")
    );
}
