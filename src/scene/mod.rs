//! Boundary to the structural scene engine
//!
//! The walker never parses scene formats structurally itself. It asks a
//! [`SceneGraphProvider`] to open each document and walks what the returned
//! [`SceneStage`] exposes: sub-layers, nodes with their composition arcs, and
//! the inputs and outputs of shading nodes. Every call is best-effort; the
//! walker logs failures and carries on with the text pass.

pub mod static_provider;

pub use static_provider::{StaticSceneProvider, StaticStage};

use crate::error::Result;
use std::path::Path;

/// Opens scene documents
pub trait SceneGraphProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn SceneStage>>;

    /// Provider name for log messages
    fn name(&self) -> &str;
}

/// An opened scene document
pub trait SceneStage {
    /// Sub-layer identifiers as authored
    fn sub_layers(&self) -> Result<Vec<String>>;

    /// Every node (prim) in the composed stage
    fn nodes(&self) -> Result<Vec<SceneNode>>;

    /// Shader implementation id, e.g. `UsdUVTexture`
    fn shader_id(&self, node: &SceneNode) -> Result<Option<String>>;

    fn inputs(&self, node: &SceneNode) -> Result<Vec<ShaderInput>>;

    fn outputs(&self, node: &SceneNode) -> Result<Vec<ShaderOutput>>;
}

/// Broad role of a node, derived from its type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Material,
    Shader,
    Other,
}

/// A node (prim) of an opened stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneNode {
    /// Scene path, e.g. `/Root/Materials/Wood`
    pub path: String,
    pub type_name: String,
    /// Asset paths of the node's reference arcs
    pub references: Vec<String>,
    /// Asset paths of the node's payload arcs
    pub payloads: Vec<String>,
}

impl SceneNode {
    pub fn new(path: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            type_name: type_name.into(),
            references: Vec::new(),
            payloads: Vec::new(),
        }
    }

    pub fn with_reference(mut self, asset: impl Into<String>) -> Self {
        self.references.push(asset.into());
        self
    }

    pub fn with_payload(mut self, asset: impl Into<String>) -> Self {
        self.payloads.push(asset.into());
        self
    }

    /// Last segment of the node path
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn kind(&self) -> NodeKind {
        match self.type_name.as_str() {
            "Material" => NodeKind::Material,
            "Shader" => NodeKind::Shader,
            _ => NodeKind::Other,
        }
    }
}

/// A shading input, either holding a value or connected to another node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderInput {
    pub name: String,
    /// Asset path value, when the input holds one
    pub asset: Option<String>,
    /// Path of the node this input is connected to
    pub connected_source: Option<String>,
}

impl ShaderInput {
    pub fn asset(name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset: Some(asset.into()),
            connected_source: None,
        }
    }

    pub fn connected(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset: None,
            connected_source: Some(source.into()),
        }
    }
}

/// A shading output and the node it is connected to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderOutput {
    pub name: String,
    pub connected_source: Option<String>,
}

impl ShaderOutput {
    pub fn connected(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connected_source: Some(source.into()),
        }
    }
}

/// Provider that opens every document as an empty stage, leaving all
/// discovery to the text pass
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSceneProvider;

impl SceneGraphProvider for NullSceneProvider {
    fn open(&self, _path: &Path) -> Result<Box<dyn SceneStage>> {
        Ok(Box::new(StaticStage::default()))
    }

    fn name(&self) -> &str {
        "null"
    }
}
