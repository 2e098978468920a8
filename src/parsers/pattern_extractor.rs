//! Textual reference and texture extraction
//!
//! Scene and material documents are scanned with an ordered battery of
//! regular expressions covering the usual authoring idioms (composition
//! arcs, shader file inputs, MDL texture constructors) plus two generic
//! catch-alls. This runs independently of any structural scene engine and
//! picks up paths the engine does not surface, such as tokens in comments
//! or in documents the engine refuses to open.

use crate::error::Result;
use crate::models::analysis::ReferenceKind;
use crate::utils::path_resolver::clean_token;
use crate::utils::tiles::TilePlaceholder;
use regex::Regex;
use std::collections::HashMap;

/// Image extensions recognized as textures
pub const TEXTURE_EXTENSIONS: [&str; 17] = [
    "jpg", "jpeg", "png", "tif", "tiff", "exr", "hdr", "tx", "tex", "bmp", "gif", "psd", "tga",
    "iff", "dpx", "cin", "svg",
];

/// Scene document extensions
pub const SCENE_EXTENSIONS: [&str; 4] = ["usd", "usda", "usdc", "usdz"];

/// Material definition extensions scanned for textures only
pub const MATERIAL_EXTENSIONS: [&str; 1] = ["mdl"];

/// Directory names that mark a path as texture content
pub const TEXTURE_DIRECTORIES: [&str; 6] = ["texture", "textures", "tex", "maps", "images", "txt"];

/// Directory names that mark a path as scene content
pub const SCENE_DIRECTORIES: [&str; 6] = ["usd", "assets", "publish", "model", "lookdev", "animation"];

/// Magic bytes at the start of a binary crate file
const USDC_MAGIC: &[u8] = b"PXR-USDC";

/// How a token was found, which drives its reference kind and provenance label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenHint {
    /// Reference arc or asset info identifier
    Reference,
    /// Sub-layer list entry
    SubLayer,
    /// Payload arc
    Payload,
    /// Shader or material input, carrying the input/attribute name
    ShaderInput(String),
    /// Generic `@...@` asset token
    Marker,
    /// Generic quoted path with an image extension
    QuotedPath,
}

impl TokenHint {
    /// Composition kind used when the token turns out to be a reference
    pub fn reference_kind(&self) -> ReferenceKind {
        match self {
            TokenHint::SubLayer => ReferenceKind::SubLayer,
            TokenHint::Payload => ReferenceKind::Payload,
            _ => ReferenceKind::Reference,
        }
    }
}

/// A path token found in document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub hint: TokenHint,
}

impl RawToken {
    /// Short provenance label: the input name for shader inputs, otherwise
    /// the discovery mechanism (`UDIM` for tiled generic tokens)
    pub fn label(&self) -> String {
        match &self.hint {
            TokenHint::Reference => "reference".to_string(),
            TokenHint::SubLayer => "subLayer".to_string(),
            TokenHint::Payload => "payload".to_string(),
            TokenHint::ShaderInput(name) => name.clone(),
            TokenHint::Marker | TokenHint::QuotedPath if TilePlaceholder::detect(&self.text).is_some() => {
                "UDIM".to_string()
            }
            TokenHint::Marker => "texture".to_string(),
            TokenHint::QuotedPath => "generic".to_string(),
        }
    }

    pub fn class(&self) -> TokenClass {
        classify(&self.text)
    }
}

/// Classification of a raw token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Texture,
    Reference,
    MaterialDefinition,
    Noise,
}

/// How the hint of a pattern rule is built from its captures
#[derive(Debug, Clone, Copy)]
enum RuleHint {
    Reference,
    SubLayer,
    Payload,
    /// Hint carries the `name` capture group
    NamedInput,
    /// Hint carries a fixed input name
    FixedInput(&'static str),
    Marker,
    QuotedPath,
}

impl RuleHint {
    fn build(self, name: Option<&str>) -> TokenHint {
        match self {
            RuleHint::Reference => TokenHint::Reference,
            RuleHint::SubLayer => TokenHint::SubLayer,
            RuleHint::Payload => TokenHint::Payload,
            RuleHint::NamedInput => TokenHint::ShaderInput(name.unwrap_or("input").to_string()),
            RuleHint::FixedInput(name) => TokenHint::ShaderInput(name.to_string()),
            RuleHint::Marker => TokenHint::Marker,
            RuleHint::QuotedPath => TokenHint::QuotedPath,
        }
    }
}

/// One entry of the pattern battery.
///
/// A rule either captures a `path` group directly or captures a `block`
/// group that is scanned again with the rule's inner expression.
#[derive(Debug)]
struct PatternRule {
    regex: Regex,
    inner: Option<Regex>,
    hint: RuleHint,
}

impl PatternRule {
    fn direct(pattern: &str, hint: RuleHint) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            inner: None,
            hint,
        })
    }

    fn block(pattern: &str, inner: &str, hint: RuleHint) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            inner: Some(Regex::new(inner)?),
            hint,
        })
    }
}

/// A match before deduplication
struct Candidate {
    position: usize,
    priority: usize,
    hint: TokenHint,
}

/// Prioritized textual pattern scanner
#[derive(Debug)]
pub struct PatternExtractor {
    rules: Vec<PatternRule>,
}

impl PatternExtractor {
    /// Build the pattern battery
    pub fn new() -> Result<Self> {
        const ASSET: &str = r#"@(?P<path>[^@\s"']+)@"#;
        const LIST_ITEM: &str = r"@(?P<path>[^@\r\n]+)@";
        let list_op = r"(?:\b(?:prepend|append|add)\s+)?";

        let rules = vec![
            PatternRule::direct(
                &format!(r"{}\breferences\s*=\s*{}", list_op, ASSET),
                RuleHint::Reference,
            )?,
            PatternRule::block(r"\breferences\s*=\s*\[(?P<block>[^\]]*)\]", LIST_ITEM, RuleHint::Reference)?,
            PatternRule::direct(&format!(r"\breference\s*=\s*{}", ASSET), RuleHint::Reference)?,
            PatternRule::block(r"\bsubLayers\s*=\s*\[(?P<block>[^\]]*)\]", LIST_ITEM, RuleHint::SubLayer)?,
            PatternRule::direct(
                &format!(r"{}\bpayloads?\s*=\s*{}", list_op, ASSET),
                RuleHint::Payload,
            )?,
            PatternRule::block(r"\bpayloads?\s*=\s*\[(?P<block>[^\]]*)\]", LIST_ITEM, RuleHint::Payload)?,
            PatternRule::block(
                r"\bassetInfo\s*=\s*\{(?P<block>[^}]*)\}",
                r"\bidentifier\s*=\s*@(?P<path>[^@]+)@",
                RuleHint::Reference,
            )?,
            PatternRule::direct(
                r"\basset\s+inputs:(?P<name>[A-Za-z0-9_]+):file\s*=\s*@(?P<path>[^@]+)@",
                RuleHint::NamedInput,
            )?,
            PatternRule::direct(
                r"\basset\s+inputs:(?P<name>[A-Za-z0-9_]+)\s*=\s*@(?P<path>[^@]+)@",
                RuleHint::NamedInput,
            )?,
            PatternRule::direct(
                r"\binputs:(?P<name>file|[A-Za-z0-9_]+_texture)\s*=\s*@(?P<path>[^@]+)@",
                RuleHint::NamedInput,
            )?,
            PatternRule::direct(
                r"\b(?P<name>filename|file|texture|colorMap)\s*=\s*@(?P<path>[^@]+)@",
                RuleHint::NamedInput,
            )?,
            PatternRule::direct(
                r"\basset\s+(?P<name>[A-Za-z0-9_:]+)\s*=\s*@(?P<path>[^@]+)@",
                RuleHint::NamedInput,
            )?,
            PatternRule::direct(
                r#"\b(?:tex::)?texture_2d\s*\(?\s*"(?P<path>[^"]+)""#,
                RuleHint::FixedInput("texture_2d"),
            )?,
            PatternRule::direct(
                r#"\b(?P<name>sourceColorFile|colorFile|filename|file)\s*=\s*"(?P<path>[^"]+)""#,
                RuleHint::NamedInput,
            )?,
            PatternRule::direct(LIST_ITEM, RuleHint::Marker)?,
            PatternRule::direct(
                &format!(
                    r#"["'](?P<path>[^"'\s]+\.(?i:{}))["']"#,
                    TEXTURE_EXTENSIONS.join("|")
                ),
                RuleHint::QuotedPath,
            )?,
        ];

        Ok(Self { rules })
    }

    /// Extract tokens from raw bytes; binary documents yield nothing
    pub fn extract_bytes(&self, bytes: &[u8]) -> Vec<RawToken> {
        if is_binary_document(bytes) {
            return Vec::new();
        }
        self.extract(&String::from_utf8_lossy(bytes))
    }

    /// Extract path tokens in order of first appearance.
    ///
    /// A token matched by several rules appears once, carrying the hint of
    /// the highest-priority rule that matched it.
    pub fn extract(&self, text: &str) -> Vec<RawToken> {
        let mut candidates: HashMap<String, Candidate> = HashMap::new();

        for (priority, rule) in self.rules.iter().enumerate() {
            for caps in rule.regex.captures_iter(text) {
                let name = caps.name("name").map(|m| m.as_str());
                let hint = rule.hint.build(name);

                match (&rule.inner, caps.name("block"), caps.name("path")) {
                    (Some(inner), Some(block), _) => {
                        for inner_caps in inner.captures_iter(block.as_str()) {
                            if let Some(path) = inner_caps.name("path") {
                                record(
                                    &mut candidates,
                                    path.as_str(),
                                    block.start() + path.start(),
                                    priority,
                                    hint.clone(),
                                );
                            }
                        }
                    }
                    (None, _, Some(path)) => {
                        record(&mut candidates, path.as_str(), path.start(), priority, hint);
                    }
                    _ => {}
                }
            }
        }

        let mut ordered: Vec<(String, Candidate)> = candidates.into_iter().collect();
        ordered.sort_by(|a, b| a.1.position.cmp(&b.1.position).then_with(|| a.0.cmp(&b.0)));
        ordered
            .into_iter()
            .map(|(text, candidate)| RawToken {
                text,
                hint: candidate.hint,
            })
            .collect()
    }
}

fn record(
    candidates: &mut HashMap<String, Candidate>,
    raw: &str,
    position: usize,
    priority: usize,
    hint: TokenHint,
) {
    let text = clean_token(raw);
    if text.is_empty() {
        return;
    }

    match candidates.get_mut(text) {
        Some(existing) => {
            existing.position = existing.position.min(position);
            if priority < existing.priority {
                existing.priority = priority;
                existing.hint = hint;
            }
        }
        None => {
            candidates.insert(
                text.to_string(),
                Candidate {
                    position,
                    priority,
                    hint,
                },
            );
        }
    }
}

/// Returns true for binary crate files and other NUL-bearing content
pub fn is_binary_document(bytes: &[u8]) -> bool {
    bytes.starts_with(USDC_MAGIC) || bytes.iter().take(1024).any(|b| *b == 0)
}

fn has_extension(lower: &str, extensions: &[&str]) -> bool {
    lower
        .rsplit_once('.')
        .is_some_and(|(_, ext)| extensions.contains(&ext))
}

/// Classify a token as texture, reference, material definition or noise
pub fn classify(token: &str) -> TokenClass {
    let token = clean_token(token);
    if token.is_empty() || token.contains("://") {
        return TokenClass::Noise;
    }

    let lower = token.to_lowercase().replace('\\', "/");
    let file_name = lower.rsplit('/').next().unwrap_or(&lower);

    if has_extension(file_name, &TEXTURE_EXTENSIONS) || TilePlaceholder::detect(token).is_some() {
        return TokenClass::Texture;
    }
    if has_extension(file_name, &MATERIAL_EXTENSIONS) {
        return TokenClass::MaterialDefinition;
    }

    // A texture directory outranks a scene extension
    let directories: Vec<&str> = lower.split('/').rev().skip(1).collect();
    if directories.iter().any(|d| TEXTURE_DIRECTORIES.contains(d)) {
        return TokenClass::Texture;
    }
    if has_extension(file_name, &SCENE_EXTENSIONS) {
        return TokenClass::Reference;
    }

    let looks_like_path = lower.contains('/') && !lower.starts_with("http");
    if looks_like_path && directories.iter().any(|d| SCENE_DIRECTORIES.contains(d)) {
        TokenClass::Reference
    } else {
        TokenClass::Noise
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> PatternExtractor {
        PatternExtractor::new().expect("pattern battery compiles")
    }

    fn texts(tokens: &[RawToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_composition_arcs() {
        let doc = r#"#usda 1.0
(
    subLayers = [
        @./layers/anim.usda@,
        @./layers/fx.usda@
    ]
)

def Xform "Prop" (
    prepend references = @../geo/body.usda@
    payload = @./heavy/payload.usdc@
)
{
}
"#;
        let tokens = extractor().extract(doc);
        assert_eq!(
            texts(&tokens),
            vec!["./layers/anim.usda", "./layers/fx.usda", "../geo/body.usda", "./heavy/payload.usdc"]
        );
        assert_eq!(tokens[0].hint, TokenHint::SubLayer);
        assert_eq!(tokens[2].hint, TokenHint::Reference);
        assert_eq!(tokens[3].hint, TokenHint::Payload);
        assert_eq!(tokens[3].hint.reference_kind(), ReferenceKind::Payload);
    }

    #[test]
    fn test_reference_list_and_asset_info() {
        let doc = r#"
def "Set" (
    references = [@./a.usda@, @./b.usd@]
    assetInfo = { asset identifier = @./set.usda@ }
)
"#;
        let tokens = extractor().extract(doc);
        assert_eq!(texts(&tokens), vec!["./a.usda", "./b.usd", "./set.usda"]);
        assert!(tokens.iter().all(|t| t.hint == TokenHint::Reference));
    }

    #[test]
    fn test_shader_inputs_carry_input_names() {
        let doc = r#"
def Shader "Wood" {
    asset inputs:diffuse_texture = @./tex/wood_diff.jpg@
    asset inputs:normal:file = @./tex/wood_nrm.<UDIM>.exr@
    asset inputs:file = @./tex/wood_rough.tx@
}
"#;
        let tokens = extractor().extract(doc);
        let labels: Vec<String> = tokens.iter().map(RawToken::label).collect();
        assert_eq!(labels, vec!["diffuse_texture", "normal", "file"]);
        assert!(tokens.iter().all(|t| t.class() == TokenClass::Texture));
    }

    #[test]
    fn test_mdl_idioms() {
        let doc = r#"
export material Wood() = let {
    texture_2d diffuse = texture_2d("./maps/wood.png");
    color tint = tex::texture_2d( "./maps/tint.tga" );
} in material();
"#;
        let tokens = extractor().extract(doc);
        assert_eq!(texts(&tokens), vec!["./maps/wood.png", "./maps/tint.tga"]);
        assert_eq!(tokens[0].label(), "texture_2d");
    }

    #[test]
    fn test_generic_patterns_and_dedup() {
        let doc = r#"
# legacy: @./old/prop.usda@
custom string note = "see ./refs/board.png"
custom string img = "./refs/board.png"
def "A" ( references = @./old/prop.usda@ ) {}
"#;
        let tokens = extractor().extract(doc);
        assert_eq!(texts(&tokens), vec!["./old/prop.usda", "./refs/board.png"]);
        // The reference rule outranks the generic marker for the same token
        assert_eq!(tokens[0].hint, TokenHint::Reference);
        assert_eq!(tokens[1].hint, TokenHint::QuotedPath);
        assert_eq!(tokens[1].label(), "generic");
    }

    #[test]
    fn test_binary_documents_are_skipped() {
        let mut bytes = b"PXR-USDC".to_vec();
        bytes.extend_from_slice(b"@./a.usda@");
        assert!(extractor().extract_bytes(&bytes).is_empty());
        assert!(extractor().extract_bytes(b"\0\0@./a.usda@").is_empty());
        assert_eq!(extractor().extract_bytes(b"references = @./a.usda@").len(), 1);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("./tex/wood.JPG"), TokenClass::Texture);
        assert_eq!(classify("wood.<UDIM>.exr"), TokenClass::Texture);
        assert_eq!(classify("wood.####.exr"), TokenClass::Texture);
        assert_eq!(classify("../geo/body.usdc"), TokenClass::Reference);
        assert_eq!(classify("./materials/wood.mdl"), TokenClass::MaterialDefinition);
        assert_eq!(classify("./textures/wood_diffuse"), TokenClass::Texture);
        assert_eq!(classify("/show/assets/prop/model"), TokenClass::Reference);
        assert_eq!(classify("./textures/wood.usda"), TokenClass::Texture);
        assert_eq!(classify("./publish/textures/wood.usda"), TokenClass::Texture);
        assert_eq!(classify("./publish/geo/wood.usda"), TokenClass::Reference);
        assert_eq!(classify("C:\\show\\tex\\layer.usd"), TokenClass::Texture);
        assert_eq!(classify("https://example.com/a.usda"), TokenClass::Noise);
        assert_eq!(classify("/Root/Materials/Wood"), TokenClass::Noise);
        assert_eq!(classify("diffuse"), TokenClass::Noise);
        assert_eq!(classify(""), TokenClass::Noise);
    }
}
