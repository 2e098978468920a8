//! Scene trees shared by the integration tests

use std::fs;
use std::path::{Path, PathBuf};

pub const MAIN_DOCUMENT: &str = r#"#usda 1.0
(
    subLayers = [
        @./layout.usda@
    ]
)

def Xform "chair" (
    prepend references = @./geo/chair_geo.usda@
)
{
    def Material "wood"
    {
        def Shader "diffuse"
        {
            asset inputs:file = @tex/wood.<UDIM>.exr@
        }

        def Shader "rough"
        {
            asset inputs:roughness_texture = @tex/rough.jpg@
        }
    }
}
"#;

pub const LAYOUT_DOCUMENT: &str = r#"#usda 1.0

def Xform "layout" (
    references = @./main.usda@
)
{
}
"#;

pub const GEO_DOCUMENT: &str = r#"#usda 1.0

def Mesh "seat" (
    payload = @./missing_payload.usda@
)
{
}
"#;

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: &Path, contents: &str) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// A chair asset under `<base>/filmserver/library/prop/chair`:
///
/// ```text
/// main.usda         subLayer layout.usda, reference geo/chair_geo.usda
/// layout.usda       references main.usda back (cycle)
/// geo/chair_geo.usda  payload to a document that does not exist
/// tex/wood.1001-1004.exr, tex/rough.jpg
/// ```
///
/// Returns the main document.
pub fn create_chair_asset(base: &Path) -> PathBuf {
    let asset_dir = base.join("filmserver").join("library").join("prop").join("chair");

    let main = write_file(&asset_dir.join("main.usda"), MAIN_DOCUMENT);
    write_file(&asset_dir.join("layout.usda"), LAYOUT_DOCUMENT);
    write_file(&asset_dir.join("geo").join("chair_geo.usda"), GEO_DOCUMENT);

    for tile in 1001..=1004 {
        write_file(&asset_dir.join("tex").join(format!("wood.{}.exr", tile)), "exr");
    }
    write_file(&asset_dir.join("tex").join("rough.jpg"), "jpg");

    main
}

/// File names of the given paths
pub fn file_names<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}
