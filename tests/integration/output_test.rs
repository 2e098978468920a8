use serde_json::Value;
use tempfile::{tempdir, TempDir};
use scene_walker::{
    cli::package_scene,
    core::{GraphWalker, WalkOptions},
    models::{
        analysis::AnalysisReport,
        config::{OutputFormat, Settings},
    },
    output::{create_formatter, FileWriter, Formatter, OutputWriter},
    scene::NullSceneProvider,
};

use super::fixtures::create_chair_asset;

fn analyzed_chair() -> (TempDir, AnalysisReport) {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());
    let mut walker = GraphWalker::new(&NullSceneProvider, WalkOptions::default()).unwrap();
    let report = walker.analyze(&main, None);
    (temp_dir, report)
}

#[test]
fn test_json_report_shape() {
    let (_temp_dir, report) = analyzed_chair();

    let formatter = create_formatter(OutputFormat::Json, false, false, false);
    let output = formatter.format_report(&report).unwrap();
    let json: Value = serde_json::from_str(&output).unwrap();

    let references = json["references"].as_array().unwrap();
    assert_eq!(references.len(), 3);
    assert_eq!(references[0]["type"], "subLayer");
    assert_eq!(references[0]["exists"], true);

    let textures = json["textures"].as_array().unwrap();
    assert_eq!(textures.len(), 2);
    let wood = textures
        .iter()
        .find(|t| t["path"].as_str().unwrap().ends_with("wood.<UDIM>.exr"))
        .unwrap();
    assert_eq!(wood["actualTextureCount"], 4);
    assert_eq!(wood["source"], "main.usda:file");

    let counts = json["textureUdimCounts"].as_object().unwrap();
    assert_eq!(counts.len(), 2);
    let count_of = |suffix: &str| {
        counts
            .iter()
            .find(|(path, _)| path.ends_with(suffix))
            .map(|(_, count)| count.clone())
            .unwrap()
    };
    assert_eq!(count_of("wood.<UDIM>.exr"), 4);
    assert_eq!(count_of("rough.jpg"), 5);

    // the missing payload is reported, not listed
    assert_eq!(json["issues"].as_array().unwrap().len(), 1);
}

#[test]
fn test_text_and_summary_output() {
    let (_temp_dir, report) = analyzed_chair();

    let text = create_formatter(OutputFormat::Text, false, false, false)
        .format_report(&report)
        .unwrap();
    assert!(text.contains("References (3)"));
    assert!(text.contains("Textures (2)"));
    assert!(text.contains("4 tiles"));
    assert!(!text.contains("\x1b["));

    let summary = create_formatter(OutputFormat::Text, false, false, true)
        .format_report(&report)
        .unwrap();
    assert_eq!(summary, "References: 3, Textures: 2, Tiled sets: 1, Issues: 1\n");
}

#[test]
fn test_csv_report_rows() {
    let (_temp_dir, report) = analyzed_chair();

    let csv = create_formatter(OutputFormat::Csv, false, false, false)
        .format_report(&report)
        .unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "Category,Path,Kind,Source,Tiled,Texture Count");
    // three references, two textures, one issue
    assert_eq!(lines.len(), 7);
    assert_eq!(lines.iter().filter(|l| l.starts_with("reference,")).count(), 3);
    assert_eq!(lines.iter().filter(|l| l.starts_with("texture,")).count(), 2);
    assert_eq!(lines.iter().filter(|l| l.starts_with("issue,")).count(), 1);
}

#[test]
fn test_copy_report_written_to_file() {
    let (temp_dir, report) = analyzed_chair();
    let settings = Settings {
        dry_run: true,
        ..Default::default()
    };
    let copy_report = package_scene(&settings, &report, temp_dir.path().join("out"), None);

    let output = create_formatter(OutputFormat::Json, false, false, false)
        .format_copy_report(&copy_report)
        .unwrap();
    let path = temp_dir.path().join("copy.json");
    FileWriter::new(&path).write(&output).unwrap();

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["dryRun"], true);
    assert!(json["message"].as_str().unwrap().starts_with("Would copy"));
}
