//! Scene dependency traversal
//!
//! A depth-first walk over the documents reachable from one root. Each
//! document gets one `visit`: an optional shading override, a textual scan
//! with the pattern battery, and a structural pass through the scene
//! provider. Documents are keyed by their canonical, case-folded path and
//! carry a visit state, so cycles and diamonds are walked once.

use crate::core::normalizer::ResultNormalizer;
use crate::error::{Result, WalkerError};
use crate::models::analysis::{AnalysisReport, IssueKind, ReferenceEntry, ReferenceKind, TextureEntry, WalkIssue};
use crate::models::config::Settings;
use crate::models::dependency_graph::DependencyGraph;
use crate::parsers::pattern_extractor::{classify, PatternExtractor, RawToken, TokenClass};
use crate::scene::{NodeKind, SceneGraphProvider, SceneNode, SceneStage};
use crate::utils::canonical::{canonical_path, comparison_key};
use crate::utils::path_resolver::{PathResolver, DEFAULT_STAGING_ALIASES};
use crate::utils::tiles::{is_tiled, TileSetEnumerator};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Directory next to a document that may hold its shading override
pub const DEFAULT_SHADER_OVERRIDE_DIR: &str = "shader";

/// File name of the shading override document
pub const DEFAULT_SHADER_OVERRIDE_DOCUMENT: &str = "main.usda";

/// Shader input names containing one of these are inspected for textures
pub const TEXTURE_INPUT_KEYWORDS: [&str; 18] = [
    "texture", "file", "map", "image", "tex", "diffuse", "albedo", "normal", "roughness", "metallic",
    "specular", "emission", "occlusion", "height", "bump", "color", "opacity", "displacement",
];

/// Shader id whose `file` input is always a texture
const UV_TEXTURE_SHADER: &str = "UsdUVTexture";

/// Options controlling one walker
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Deepest reference level followed; the root is level 0
    pub max_depth: Option<usize>,
    pub shader_override_dir: String,
    pub shader_override_document: String,
    pub staging_aliases: Vec<String>,
    /// Evaluate textures on the rayon pool during normalization
    pub parallel: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            shader_override_dir: DEFAULT_SHADER_OVERRIDE_DIR.to_string(),
            shader_override_document: DEFAULT_SHADER_OVERRIDE_DOCUMENT.to_string(),
            staging_aliases: DEFAULT_STAGING_ALIASES.iter().map(|s| s.to_string()).collect(),
            parallel: true,
        }
    }
}

impl From<&Settings> for WalkOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            max_depth: settings.max_depth,
            shader_override_dir: settings.shader_override_dir.clone(),
            shader_override_document: settings.shader_override_document.clone(),
            staging_aliases: settings.staging_aliases.clone(),
            parallel: settings.parallel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Done,
}

/// A texture before normalization, tagged with where it came from
#[derive(Debug, Clone)]
struct CollectedTexture {
    entry: TextureEntry,
    /// Comparison key of the directory of the document that named it
    origin_dir: String,
    from_override: bool,
}

/// How texture sources are labelled while scanning a document
#[derive(Debug, Clone, Copy)]
enum ScanMode<'n> {
    /// Regular document: `"<file name>:<label>"`
    Document(&'n str),
    /// Shading override: `"shader:<label>"`, `"shader:UDIM"` when tiled
    Override,
}

impl ScanMode<'_> {
    fn source_for(&self, token: &RawToken) -> String {
        match self {
            ScanMode::Document(file_name) => format!("{}:{}", file_name, token.label()),
            ScanMode::Override if is_tiled(Path::new(&token.text)) => "shader:UDIM".to_string(),
            ScanMode::Override => format!("shader:{}", token.label()),
        }
    }
}

/// Depth-first dependency walker over one root asset
pub struct GraphWalker<'p> {
    provider: &'p dyn SceneGraphProvider,
    options: WalkOptions,
    extractor: PatternExtractor,
    resolver: PathResolver,
    normalizer: ResultNormalizer,

    visit_states: HashMap<String, VisitState>,
    /// Override document key → whether it produced textures
    override_outcomes: HashMap<String, bool>,
    scanned_materials: HashSet<String>,
    recorded_references: HashSet<String>,
    references: Vec<ReferenceEntry>,
    textures: Vec<CollectedTexture>,
    issues: Vec<WalkIssue>,
    graph: DependencyGraph,
}

impl<'p> GraphWalker<'p> {
    /// Create a walker reading documents through `provider`
    pub fn new(provider: &'p dyn SceneGraphProvider, options: WalkOptions) -> Result<Self> {
        let resolver = PathResolver::new().with_staging_aliases(options.staging_aliases.clone());
        let normalizer = ResultNormalizer::new(TileSetEnumerator::new(), options.parallel);

        Ok(Self {
            provider,
            extractor: PatternExtractor::new()?,
            resolver,
            normalizer,
            options,
            visit_states: HashMap::new(),
            override_outcomes: HashMap::new(),
            scanned_materials: HashSet::new(),
            recorded_references: HashSet::new(),
            references: Vec::new(),
            textures: Vec::new(),
            issues: Vec::new(),
            graph: DependencyGraph::new(),
        })
    }

    /// Reference graph of the last `analyze` run
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Forget everything collected by a previous run
    pub fn reset(&mut self) {
        self.visit_states.clear();
        self.override_outcomes.clear();
        self.scanned_materials.clear();
        self.recorded_references.clear();
        self.references.clear();
        self.textures.clear();
        self.issues.clear();
        self.graph.clear();
        self.resolver.clear_cache();
    }

    /// Analyze `root` and everything it transitively depends on.
    ///
    /// `base_dir` overrides the directory the root document's own tokens
    /// are resolved against; dependencies always resolve against their own
    /// directory. Per-item failures end up in the report's `issues`.
    pub fn analyze(&mut self, root: &Path, base_dir: Option<&Path>) -> AnalysisReport {
        self.reset();

        let Some(root_path) = self.resolver.resolve(&root.to_string_lossy(), None) else {
            warn!("Empty root path given");
            return AnalysisReport::empty(root);
        };
        let root_path = canonical_path(&root_path);
        info!("Analyzing {}", root_path.display());

        self.graph.set_root(root_path.clone());

        let base = match base_dir {
            Some(dir) => canonical_path(dir),
            None => parent_dir(&root_path),
        };
        self.visit(&root_path, &base, 0);

        let textures = self.textures.iter().map(|t| t.entry.clone()).collect();
        let mut report = self
            .normalizer
            .normalize(self.references.clone(), textures, self.issues.clone());
        report.root = root_path;

        info!(
            "Found {} references and {} textures ({} issues)",
            report.references.len(),
            report.textures.len(),
            report.issues.len()
        );
        report
    }

    /// Walk one document. `base` is the directory its tokens resolve against.
    fn visit(&mut self, path: &Path, base: &Path, depth: usize) {
        let key = comparison_key(path);
        if self.visit_states.contains_key(&key) {
            return;
        }

        if let Some(max_depth) = self.options.max_depth {
            if depth > max_depth {
                warn!("Depth limit {} reached at {}", max_depth, path.display());
                self.graph.add_node(path.to_path_buf(), path.is_file());
                self.issues.push(WalkIssue::new(
                    IssueKind::DepthLimit,
                    path,
                    format!("not followed beyond depth {}", max_depth),
                ));
                return;
            }
        }

        self.visit_states.insert(key.clone(), VisitState::Visiting);

        if !path.is_file() {
            let err = WalkerError::not_found(path);
            warn!("{}", err);
            self.graph.add_node(path.to_path_buf(), false);
            self.issues.push(WalkIssue::from_error(&err));
            self.visit_states.insert(key, VisitState::Done);
            return;
        }

        info!("Visiting {}", path.display());
        self.graph.add_node(path.to_path_buf(), true);

        if !self.apply_shader_override(path, depth) && self.scan_document(path, base, depth) {
            self.scan_stage(path, base, depth);
        }

        self.visit_states.insert(key, VisitState::Done);
    }

    /// Resolve a discovered document token, record it and walk it
    fn follow(&mut self, token: &str, base: &Path, kind: ReferenceKind, parent: &Path, depth: usize) {
        let Some(resolved) = self.resolver.resolve(token, Some(base)) else {
            return;
        };
        let resolved = canonical_path(&resolved);
        let key = comparison_key(&resolved);

        if self.recorded_references.insert(key.clone()) {
            debug!("Reference ({}) {} -> {}", kind, token, resolved.display());
            self.references
                .push(ReferenceEntry::new(token, kind, Some(resolved.clone())));
        }
        self.graph.add_edge(parent.to_path_buf(), resolved.clone(), kind);

        match self.visit_states.get(&key) {
            Some(VisitState::Visiting) => {
                debug!("Cycle: {} -> {}", parent.display(), resolved.display());
                self.graph.add_cycle(parent.to_path_buf(), resolved);
            }
            Some(VisitState::Done) => {}
            None => {
                let child_base = parent_dir(&resolved);
                self.visit(&resolved, &child_base, depth + 1);
            }
        }
    }

    /// Apply the shading override next to `path`, if any.
    ///
    /// Returns true when the override produced textures, in which case the
    /// document itself is not scanned further.
    fn apply_shader_override(&mut self, path: &Path, depth: usize) -> bool {
        let dir = parent_dir(path);
        let override_dir = dir.join(&self.options.shader_override_dir);
        let override_path = canonical_path(&override_dir.join(&self.options.shader_override_document));
        if !override_path.is_file() {
            return false;
        }

        let override_key = comparison_key(&override_path);
        if override_key == comparison_key(path) {
            return false;
        }

        if self.recorded_references.insert(override_key.clone()) {
            self.references.push(ReferenceEntry::new(
                override_path.to_string_lossy(),
                ReferenceKind::ShaderTexture,
                Some(override_path.clone()),
            ));
        }
        self.graph
            .add_edge(path.to_path_buf(), override_path.clone(), ReferenceKind::ShaderTexture);

        let produced = match self.override_outcomes.get(&override_key) {
            Some(&produced) => {
                debug!("Reusing shading override {}", override_path.display());
                produced
            }
            None => {
                info!("Applying shading override {}", override_path.display());
                self.visit_states.insert(override_key.clone(), VisitState::Visiting);
                self.graph.add_node(override_path.clone(), true);

                let before = self.textures.len();
                self.scan_tokens(&override_path, &canonical_path(&override_dir), depth, ScanMode::Override);
                let produced = self.textures[before..].iter().any(|t| t.from_override);

                self.visit_states.insert(override_key.clone(), VisitState::Done);
                self.override_outcomes.insert(override_key, produced);
                produced
            }
        };

        if produced {
            // The override is authoritative for textures named from this folder
            let dir_key = comparison_key(&dir);
            self.textures
                .retain(|t| t.from_override || t.origin_dir != dir_key);
        }
        produced
    }

    /// Text pass over a scene document. Returns false when it is unreadable.
    fn scan_document(&mut self, path: &Path, base: &Path, depth: usize) -> bool {
        let file_name = file_name_of(path);
        self.scan_tokens(path, base, depth, ScanMode::Document(&file_name))
    }

    fn scan_tokens(&mut self, path: &Path, base: &Path, depth: usize, mode: ScanMode<'_>) -> bool {
        let Some(tokens) = self.read_tokens(path) else {
            return false;
        };

        for token in tokens {
            match token.class() {
                TokenClass::Texture => {
                    let source = mode.source_for(&token);
                    self.record_texture(&token.text, base, source, path, matches!(mode, ScanMode::Override));
                }
                TokenClass::Reference => {
                    self.follow(&token.text, base, token.hint.reference_kind(), path, depth);
                }
                TokenClass::MaterialDefinition => {
                    if let Some(mdl) = self.resolver.resolve(&token.text, Some(base)) {
                        self.scan_material(&canonical_path(&mdl), matches!(mode, ScanMode::Override));
                    }
                }
                TokenClass::Noise => trace!("Ignoring token {}", token.text),
            }
        }
        true
    }

    /// Scan a material definition once for texture tokens
    fn scan_material(&mut self, path: &Path, from_override: bool) {
        if !self.scanned_materials.insert(comparison_key(path)) {
            return;
        }
        if !path.is_file() {
            let err = WalkerError::not_found(path);
            warn!("{}", err);
            self.issues.push(WalkIssue::from_error(&err));
            return;
        }

        let Some(tokens) = self.read_tokens(path) else {
            return;
        };
        let file_name = file_name_of(path);
        let base = parent_dir(path);
        for token in tokens.iter().filter(|t| t.class() == TokenClass::Texture) {
            let source = format!("{}:{}", file_name, token.label());
            self.record_texture(&token.text, &base, source, path, from_override);
        }
    }

    fn read_tokens(&mut self, path: &Path) -> Option<Vec<RawToken>> {
        match fs::read(path) {
            Ok(bytes) => {
                let tokens = self.extractor.extract_bytes(&bytes);
                debug!("{} tokens in {}", tokens.len(), path.display());
                Some(tokens)
            }
            Err(e) => {
                let err = WalkerError::unreadable(path, e);
                warn!("{}", err);
                self.issues.push(WalkIssue::from_error(&err));
                None
            }
        }
    }

    fn record_texture(&mut self, token: &str, base: &Path, source: String, document: &Path, from_override: bool) {
        let Some(resolved) = self.resolver.resolve(token, Some(base)) else {
            return;
        };
        debug!("Texture {} -> {} ({})", token, resolved.display(), source);
        self.textures.push(CollectedTexture {
            entry: TextureEntry::new(token, source, Some(resolved)),
            origin_dir: comparison_key(&parent_dir(document)),
            from_override,
        });
    }

    /// Structural pass through the scene provider
    fn scan_stage(&mut self, path: &Path, base: &Path, depth: usize) {
        let provider = self.provider;
        let stage = match provider.open(path) {
            Ok(stage) => stage,
            Err(e) => {
                let err = match e {
                    WalkerError::ProviderFailure { .. } => e,
                    other => WalkerError::provider_failure(path, other.to_string()),
                };
                warn!("{}", err);
                self.issues.push(WalkIssue::from_error(&err));
                return;
            }
        };

        let own_key = comparison_key(path);
        for layer in best_effort(stage.sub_layers(), "sub-layers", path) {
            let is_self = self
                .resolver
                .resolve(&layer, Some(base))
                .is_some_and(|p| comparison_key(&p) == own_key);
            if !is_self {
                self.follow(&layer, base, ReferenceKind::SubLayer, path, depth);
            }
        }

        let nodes = best_effort(stage.nodes(), "nodes", path);
        for node in &nodes {
            for reference in &node.references {
                self.follow(reference, base, ReferenceKind::Reference, path, depth);
            }
            for payload in &node.payloads {
                self.follow(payload, base, ReferenceKind::Payload, path, depth);
            }
        }

        let mut shading = ShadingPass {
            stage: stage.as_ref(),
            nodes: nodes.iter().map(|n| (n.path.as_str(), n)).collect(),
            inspected: HashSet::new(),
            document: path,
            base,
        };
        for node in &nodes {
            match node.kind() {
                NodeKind::Material => shading.inspect_material(self, node),
                NodeKind::Shader => shading.inspect_shader(self, node),
                NodeKind::Other => {}
            }
        }
    }
}

/// Shading-network inspection state for one opened document
struct ShadingPass<'s> {
    stage: &'s dyn SceneStage,
    nodes: HashMap<&'s str, &'s SceneNode>,
    /// Nodes already inspected in this document
    inspected: HashSet<String>,
    document: &'s Path,
    base: &'s Path,
}

impl ShadingPass<'_> {
    fn inspect_material(&mut self, walker: &mut GraphWalker<'_>, node: &SceneNode) {
        if !self.inspected.insert(node.path.clone()) {
            return;
        }
        self.inspect_inputs(walker, node, false);

        for output in best_effort(self.stage.outputs(node), "outputs", self.document) {
            if let Some(source) = output.connected_source {
                self.follow_connection(walker, &source);
            }
        }
    }

    fn inspect_shader(&mut self, walker: &mut GraphWalker<'_>, node: &SceneNode) {
        if !self.inspected.insert(node.path.clone()) {
            return;
        }
        let shader_id = best_effort(self.stage.shader_id(node), "shader id", self.document);
        let is_uv_texture = shader_id.as_deref() == Some(UV_TEXTURE_SHADER);
        self.inspect_inputs(walker, node, is_uv_texture);
    }

    fn inspect_inputs(&mut self, walker: &mut GraphWalker<'_>, node: &SceneNode, is_uv_texture: bool) {
        for input in best_effort(self.stage.inputs(node), "inputs", self.document) {
            if let Some(asset) = &input.asset {
                if is_uv_texture && input.name == "file" {
                    let source = format!("{}:{}", UV_TEXTURE_SHADER, node.name());
                    walker.record_texture(asset, self.base, source, self.document, false);
                } else if is_texture_input(&input.name) && classify(asset) == TokenClass::Texture {
                    let source = format!("{}:{}", node.name(), input.name);
                    walker.record_texture(asset, self.base, source, self.document, false);
                }
            }
            if let Some(source) = &input.connected_source {
                self.follow_connection(walker, source);
            }
        }
    }

    fn follow_connection(&mut self, walker: &mut GraphWalker<'_>, source: &str) {
        // Connections may point at an output attribute, e.g. `/Mat/Tex.outputs:rgb`
        let node_path = source.split_once(".outputs:").map_or(source, |(node, _)| node);
        let Some(node) = self.nodes.get(node_path).copied() else {
            trace!("Connection to unknown node {}", source);
            return;
        };
        match node.kind() {
            NodeKind::Material => self.inspect_material(walker, node),
            _ => self.inspect_shader(walker, node),
        }
    }
}

fn is_texture_input(name: &str) -> bool {
    let lower = name.to_lowercase();
    TEXTURE_INPUT_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Unwrap a provider result, logging a failure and treating it as empty
fn best_effort<T: Default>(result: Result<T>, what: &str, document: &Path) -> T {
    result.unwrap_or_else(|e| {
        warn!("Could not read {} of {}: {}", what, document.display(), e);
        T::default()
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
