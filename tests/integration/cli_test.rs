use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use scene_walker::{
    cli::{args::OutputFormat as CliFormat, Args, Command},
    error::WalkerError,
    models::config::OutputFormat,
};

use super::fixtures::create_chair_asset;

#[test]
fn test_cli_parsing() {
    let args = Args::parse_from([
        "scene-walker",
        "main.usda",
        "-b",
        "/show/base",
        "-f",
        "json",
        "-o",
        "report.json",
        "--root-marker",
        "library",
        "--staging-alias",
        "txt",
        "--staging-alias",
        "wip",
        "--max-depth",
        "3",
        "--graph",
        "refs.dot",
        "--no-parallel",
        "--no-progress",
        "-v",
    ]);

    assert_eq!(args.scene, Some(PathBuf::from("main.usda")));
    assert_eq!(args.base_dir, Some(PathBuf::from("/show/base")));
    assert_eq!(args.format, Some(CliFormat::Json));
    assert_eq!(args.output, Some(PathBuf::from("report.json")));
    assert_eq!(args.root_marker.as_deref(), Some("library"));
    assert_eq!(args.staging_aliases, vec!["txt".to_string(), "wip".to_string()]);
    assert_eq!(args.max_depth, Some(3));
    assert_eq!(args.graph, Some(PathBuf::from("refs.dot")));
    assert!(args.no_parallel);
    assert!(args.no_progress);
    assert!(args.verbose);
    assert!(!args.quiet);
    assert!(args.package_to.is_none());
}

#[test]
fn test_invalid_format_is_rejected() {
    let result = Args::try_parse_from(["scene-walker", "main.usda", "--format", "xml"]);
    assert!(result.is_err());
}

#[test]
fn test_command_selection() {
    assert!(matches!(
        Command::from_args(Args::parse_from(["scene-walker", "--init"])),
        Command::Init
    ));
    assert!(matches!(
        Command::from_args(Args::parse_from(["scene-walker", "main.usda"])),
        Command::Analyze(_)
    ));
    assert!(matches!(
        Command::from_args(Args::parse_from(["scene-walker", "main.usda", "--package-to", "/tmp/pkg"])),
        Command::Package(_)
    ));
}

#[test]
fn test_settings_from_config_file_and_flags() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());
    let config_path = temp_dir.path().join("walker.toml");
    fs::write(
        &config_path,
        "output_format = \"csv\"\nroot_marker = \"library\"\nstaging_aliases = [\"wip\"]\ndry_run = true\n",
    )
    .unwrap();

    let command = Command::from_args(Args::parse_from([
        "scene-walker".to_string(),
        main.to_string_lossy().into_owned(),
        "--config".to_string(),
        config_path.to_string_lossy().into_owned(),
        "--root-marker".to_string(),
        "prop".to_string(),
        "--no-color".to_string(),
    ]));

    let settings = command.settings().unwrap();
    assert_eq!(settings.scene_path, main);
    // config file values survive when the flag is absent
    assert_eq!(settings.output_format, OutputFormat::Csv);
    assert_eq!(settings.staging_aliases, vec!["wip".to_string()]);
    assert!(settings.dry_run);
    // command line wins over the file
    assert_eq!(settings.root_marker, "prop");
    assert!(!settings.use_colors);
}

#[test]
fn test_settings_reject_missing_scene() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("walker.toml");
    fs::write(&config_path, "").unwrap();

    let command = Command::from_args(Args::parse_from([
        "scene-walker".to_string(),
        temp_dir.path().join("absent.usda").to_string_lossy().into_owned(),
        "--config".to_string(),
        config_path.to_string_lossy().into_owned(),
    ]));

    let err = command.settings().unwrap_err();
    assert!(matches!(err, WalkerError::InvalidPath { .. }));
}

#[test]
fn test_malformed_config_file() {
    let temp_dir = tempdir().unwrap();
    let main = create_chair_asset(temp_dir.path());
    let config_path = temp_dir.path().join("walker.toml");
    fs::write(&config_path, "root_marker = [\n").unwrap();

    let command = Command::from_args(Args::parse_from([
        "scene-walker".to_string(),
        main.to_string_lossy().into_owned(),
        "--config".to_string(),
        config_path.to_string_lossy().into_owned(),
    ]));

    let err = command.settings().unwrap_err();
    assert!(matches!(err, WalkerError::ConfigParse { .. }));
    assert_eq!(command.run(), 2);
}
