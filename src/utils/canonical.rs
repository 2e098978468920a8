//! Path canonicalization shared by the walker, the normalizer and the repackager
//!
//! All comparisons between discovered paths go through these helpers so a
//! path is spelled the same way wherever it is stored or looked up. Nothing
//! here touches the filesystem.

use std::path::{Path, PathBuf};

/// Returns true when a raw token names an absolute location on any platform:
/// a POSIX root, a backslash/UNC root, or a Windows drive letter.
pub fn is_absolute_token(token: &str) -> bool {
    if token.starts_with('/') || token.starts_with('\\') {
        return true;
    }
    let bytes = token.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Lexically normalize a path into its canonical string form.
///
/// Backslashes become forward slashes, `.` segments are dropped, `..`
/// segments fold into their parent and a Windows drive letter is
/// upper-cased. Case is otherwise preserved.
pub fn canonical_string(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let (root, rest) = split_root(&raw);

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if root.is_empty() {
                    parts.push("..");
                }
                // `..` above a root stays at the root
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if root.is_empty() && joined.is_empty() {
        return ".".to_string();
    }
    format!("{}{}", root, joined)
}

/// Canonical form as a `PathBuf`
pub fn canonical_path(path: &Path) -> PathBuf {
    PathBuf::from(canonical_string(path))
}

/// Case-insensitive comparison key for a path
pub fn comparison_key(path: &Path) -> String {
    canonical_string(path).to_lowercase()
}

/// Split the canonical root (`C:/`, `//`, `/` or nothing) from the remainder.
fn split_root(raw: &str) -> (String, &str) {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        let drive = (bytes[0] as char).to_ascii_uppercase();
        let rest = &raw[2..];
        return match rest.strip_prefix('/') {
            Some(stripped) => (format!("{}:/", drive), stripped),
            None => (format!("{}:", drive), rest),
        };
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return ("//".to_string(), rest);
    }
    if let Some(rest) = raw.strip_prefix('/') {
        return ("/".to_string(), rest);
    }
    (String::new(), raw)
}

/// Segments of a canonical path, skipping the root
pub fn segments(path: &Path) -> Vec<String> {
    let canonical = canonical_string(path);
    let (_, rest) = split_root(&canonical);
    rest.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_tokens() {
        assert!(is_absolute_token("/farm/library/a.usda"));
        assert!(is_absolute_token("\\\\server\\share\\a.usda"));
        assert!(is_absolute_token("e:/filmserver/a.usda"));
        assert!(!is_absolute_token("./a.usda"));
        assert!(!is_absolute_token("textures/wood.jpg"));
    }

    #[test]
    fn test_canonical_string_folds_segments() {
        assert_eq!(
            canonical_string(Path::new("/lib/prop/./usd/../tex/wood.jpg")),
            "/lib/prop/tex/wood.jpg"
        );
        assert_eq!(canonical_string(Path::new("a/../../b")), "../b");
        assert_eq!(canonical_string(Path::new("/../a")), "/a");
        assert_eq!(canonical_string(Path::new("")), ".");
    }

    #[test]
    fn test_canonical_string_windows_spelling() {
        assert_eq!(
            canonical_string(Path::new("e:\\FilmServer\\Prop\\main.usda")),
            "E:/FilmServer/Prop/main.usda"
        );
    }

    #[test]
    fn test_comparison_key_is_case_insensitive() {
        assert_eq!(
            comparison_key(Path::new("/Lib/Tex/Wood.JPG")),
            comparison_key(Path::new("/lib/tex/wood.jpg"))
        );
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            segments(Path::new("C:\\farm\\library\\a.usda")),
            vec!["farm", "library", "a.usda"]
        );
        assert_eq!(segments(Path::new("/a/b")), vec!["a", "b"]);
    }
}
