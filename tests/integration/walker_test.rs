use std::path::{Path, PathBuf};
use tempfile::tempdir;
use scene_walker::{
    core::{GraphWalker, WalkOptions},
    models::analysis::{AnalysisReport, IssueKind, ReferenceKind},
    scene::{NullSceneProvider, SceneGraphProvider, SceneNode, ShaderInput, StaticSceneProvider, StaticStage},
};

use super::fixtures::{create_chair_asset, file_names, write_file};

fn walk(provider: &dyn SceneGraphProvider, options: WalkOptions, root: &Path) -> AnalysisReport {
    let mut walker = GraphWalker::new(provider, options).unwrap();
    walker.analyze(root, None)
}

#[test]
fn test_walks_layers_references_and_textures() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());

    let report = walk(&NullSceneProvider, WalkOptions::default(), &main);

    assert_eq!(report.root, main);

    let references: Vec<PathBuf> = report
        .references
        .iter()
        .filter_map(|r| r.resolved_path.clone())
        .collect();
    // layout.usda points back at main.usda, which is listed once
    assert_eq!(file_names(&references), vec!["layout.usda", "main.usda", "chair_geo.usda"]);
    assert_eq!(report.references[0].kind, ReferenceKind::SubLayer);
    assert_eq!(report.references[1].kind, ReferenceKind::Reference);
    assert_eq!(report.references[2].kind, ReferenceKind::Reference);

    let wood = report
        .textures
        .iter()
        .find(|t| t.raw_token == "tex/wood.<UDIM>.exr")
        .expect("tiled texture collected");
    assert!(wood.is_tiled);
    assert_eq!(wood.tile_count, 4);
    assert_eq!(wood.source, "main.usda:file");

    let rough = report
        .textures
        .iter()
        .find(|t| t.raw_token == "tex/rough.jpg")
        .expect("flat texture collected");
    assert!(!rough.is_tiled);
    assert_eq!(rough.source, "main.usda:roughness_texture");

    // tiled set size for wood, directory census for rough
    let counts: Vec<(String, usize)> = report
        .tile_counts
        .iter()
        .map(|(path, count)| (path.rsplit('/').next().unwrap().to_string(), *count))
        .collect();
    assert_eq!(
        counts,
        vec![("rough.jpg".to_string(), 5), ("wood.<UDIM>.exr".to_string(), 4)]
    );
}

#[test]
fn test_missing_reference_becomes_issue() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());

    let report = walk(&NullSceneProvider, WalkOptions::default(), &main);

    assert!(report
        .references
        .iter()
        .all(|r| !r.raw_token.contains("missing_payload")));

    let missing: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::NotFound)
        .collect();
    assert_eq!(missing.len(), 1);
    assert!(missing[0].path.ends_with("geo/missing_payload.usda"));
}

#[test]
fn test_cycle_is_walked_once() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());

    let mut walker = GraphWalker::new(&NullSceneProvider, WalkOptions::default()).unwrap();
    let report = walker.analyze(&main, None);

    let back_to_root: Vec<_> = report
        .references
        .iter()
        .filter(|r| r.resolved_path.as_deref() == Some(main.as_path()))
        .collect();
    assert_eq!(back_to_root.len(), 1);
    assert_eq!(back_to_root[0].raw_token, "./main.usda");

    let graph = walker.graph();
    assert_eq!(graph.statistics().cycle_count, 1);
    assert!(graph.cycles.iter().any(|(_, to)| to == &main));
}

#[test]
fn test_self_referencing_document() {
    let temp_dir = tempdir().unwrap();
    let root = write_file(
        &temp_dir.path().join("loop.usda"),
        "#usda 1.0\ndef Xform \"again\" (\n    references = @./loop.usda@\n)\n{\n}\n",
    );

    let report = walk(&NullSceneProvider, WalkOptions::default(), &root);

    assert_eq!(report.references.len(), 1);
    assert_eq!(report.references[0].resolved_path.as_deref(), Some(root.as_path()));
    assert!(report.issues.is_empty());
}

#[test]
fn test_max_depth_stops_walk() {
    let temp_dir = tempdir().unwrap();
    let root = write_file(&temp_dir.path().join("shot.usda"), "#usda 1.0\n(\n    subLayers = [@./a.usda@]\n)\n");
    write_file(&temp_dir.path().join("a.usda"), "#usda 1.0\n(\n    subLayers = [@./b.usda@]\n)\n");
    write_file(
        &temp_dir.path().join("b.usda"),
        "#usda 1.0\ndef \"c\" (\n    references = @./c.usda@\n)\n{\n}\n",
    );
    write_file(&temp_dir.path().join("c.usda"), "#usda 1.0\n");

    let options = WalkOptions {
        max_depth: Some(1),
        ..Default::default()
    };
    let report = walk(&NullSceneProvider, options, &root);

    let names: Vec<PathBuf> = report
        .references
        .iter()
        .filter_map(|r| r.resolved_path.clone())
        .collect();
    // b.usda is discovered but not opened, so c.usda is never seen
    assert_eq!(file_names(&names), vec!["a.usda", "b.usda"]);

    let limited: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::DepthLimit)
        .collect();
    assert_eq!(limited.len(), 1);
    assert!(limited[0].path.ends_with("b.usda"));
}

#[test]
fn test_stage_shading_network() {
    let temp_dir = tempdir().unwrap();
    let root = write_file(&temp_dir.path().join("prop.usda"), "#usda 1.0\n");
    write_file(&temp_dir.path().join("tex").join("color.png"), "png");
    write_file(&temp_dir.path().join("tex").join("normal.png"), "png");
    write_file(&temp_dir.path().join("heavy.usda"), "#usda 1.0\n");

    let stage = StaticStage::new()
        .node(SceneNode::new("/Prop/Geo", "Xform").with_payload("./heavy.usda"))
        .shader(
            "/Prop/Looks/ColorTex",
            "UsdUVTexture",
            vec![ShaderInput::asset("file", "./tex/color.png")],
        )
        .shader(
            "/Prop/Looks/Surface",
            "UsdPreviewSurface",
            vec![ShaderInput::asset("normal_map", "./tex/normal.png")],
        );
    let provider = StaticSceneProvider::new().with_stage(&root, stage);

    let report = walk(&provider, WalkOptions::default(), &root);

    assert_eq!(report.references.len(), 1);
    assert_eq!(report.references[0].kind, ReferenceKind::Payload);

    let sources: Vec<&str> = report.textures.iter().map(|t| t.source.as_str()).collect();
    assert!(sources.contains(&"UsdUVTexture:ColorTex"));
    assert!(sources.contains(&"Surface:normal_map"));
}

#[test]
fn test_provider_failure_keeps_text_results() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());

    let provider = StaticSceneProvider::new().failing_on(&main);
    let report = walk(&provider, WalkOptions::default(), &main);

    assert!(report
        .issues
        .iter()
        .any(|i| i.kind == IssueKind::ProviderFailure && i.path == main));
    assert_eq!(report.references.len(), 3);
    assert_eq!(report.textures.len(), 2);
}

#[test]
fn test_shader_override_replaces_document_textures() {
    let temp_dir = tempdir().unwrap();
    let asset_dir = temp_dir.path().join("lamp");
    let root = write_file(
        &asset_dir.join("lamp.usda"),
        "#usda 1.0\ndef Shader \"old\"\n{\n    asset inputs:diffuse_texture = @tex/old.jpg@\n}\n",
    );
    write_file(
        &asset_dir.join("shader").join("main.usda"),
        "#usda 1.0\ndef Shader \"new\"\n{\n    asset inputs:diffuse_texture = @../tex/new.jpg@\n}\n",
    );
    write_file(&asset_dir.join("tex").join("old.jpg"), "jpg");
    write_file(&asset_dir.join("tex").join("new.jpg"), "jpg");

    let report = walk(&NullSceneProvider, WalkOptions::default(), &root);

    let textures: Vec<PathBuf> = report
        .textures
        .iter()
        .filter_map(|t| t.resolved_path.clone())
        .collect();
    assert_eq!(file_names(&textures), vec!["new.jpg"]);

    assert_eq!(report.references.len(), 1);
    assert_eq!(report.references[0].kind, ReferenceKind::ShaderTexture);
}

#[test]
fn test_staging_alias_resolves_missing_texture() {
    let temp_dir = tempdir().unwrap();
    let work_dir = temp_dir.path().join("asset").join("work");
    let root = write_file(
        &work_dir.join("asset.usda"),
        "#usda 1.0\ndef Shader \"s\"\n{\n    asset inputs:diffuse_texture = @./paint.tif@\n}\n",
    );
    let published = write_file(
        &temp_dir.path().join("asset").join("publish").join("v003").join("paint.tif"),
        "tif",
    );

    let report = walk(&NullSceneProvider, WalkOptions::default(), &root);

    assert_eq!(report.textures.len(), 1);
    assert_eq!(report.textures[0].resolved_path.as_deref(), Some(published.as_path()));
}

#[test]
fn test_walker_is_reusable() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());

    let mut walker = GraphWalker::new(&NullSceneProvider, WalkOptions::default()).unwrap();
    let first = walker.analyze(&main, None);
    let second = walker.analyze(&main, None);

    assert_eq!(first.references, second.references);
    assert_eq!(first.textures, second.textures);
    assert_eq!(first.issues, second.issues);
}
