//! In-memory scene provider
//!
//! Stages are registered per document path up front. Documents without a
//! registered stage open as empty stages; documents marked as failing make
//! `open` return a provider failure.

use super::{SceneGraphProvider, SceneNode, SceneStage, ShaderInput, ShaderOutput};
use crate::error::{Result, WalkerError};
use crate::utils::canonical::comparison_key;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A fully materialized stage
#[derive(Debug, Clone, Default)]
pub struct StaticStage {
    sub_layers: Vec<String>,
    nodes: Vec<SceneNode>,
    shader_ids: HashMap<String, String>,
    inputs: HashMap<String, Vec<ShaderInput>>,
    outputs: HashMap<String, Vec<ShaderOutput>>,
}

impl StaticStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sub_layer(mut self, identifier: impl Into<String>) -> Self {
        self.sub_layers.push(identifier.into());
        self
    }

    pub fn node(mut self, node: SceneNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a `Shader` node with an implementation id and inputs
    pub fn shader(mut self, path: &str, shader_id: &str, inputs: Vec<ShaderInput>) -> Self {
        self.nodes.push(SceneNode::new(path, "Shader"));
        self.shader_ids.insert(path.to_string(), shader_id.to_string());
        self.inputs.insert(path.to_string(), inputs);
        self
    }

    /// Add a `Material` node with inputs and outputs
    pub fn material(mut self, path: &str, inputs: Vec<ShaderInput>, outputs: Vec<ShaderOutput>) -> Self {
        self.nodes.push(SceneNode::new(path, "Material"));
        self.inputs.insert(path.to_string(), inputs);
        self.outputs.insert(path.to_string(), outputs);
        self
    }
}

impl SceneStage for StaticStage {
    fn sub_layers(&self) -> Result<Vec<String>> {
        Ok(self.sub_layers.clone())
    }

    fn nodes(&self) -> Result<Vec<SceneNode>> {
        Ok(self.nodes.clone())
    }

    fn shader_id(&self, node: &SceneNode) -> Result<Option<String>> {
        Ok(self.shader_ids.get(&node.path).cloned())
    }

    fn inputs(&self, node: &SceneNode) -> Result<Vec<ShaderInput>> {
        Ok(self.inputs.get(&node.path).cloned().unwrap_or_default())
    }

    fn outputs(&self, node: &SceneNode) -> Result<Vec<ShaderOutput>> {
        Ok(self.outputs.get(&node.path).cloned().unwrap_or_default())
    }
}

/// Provider serving pre-registered stages
#[derive(Debug, Clone, Default)]
pub struct StaticSceneProvider {
    stages: HashMap<String, StaticStage>,
    failing: HashSet<String>,
}

impl StaticSceneProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the stage served for `path`
    pub fn with_stage(mut self, path: impl AsRef<Path>, stage: StaticStage) -> Self {
        self.stages.insert(comparison_key(path.as_ref()), stage);
        self
    }

    /// Make opening `path` fail
    pub fn failing_on(mut self, path: impl AsRef<Path>) -> Self {
        self.failing.insert(comparison_key(path.as_ref()));
        self
    }
}

impl SceneGraphProvider for StaticSceneProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn SceneStage>> {
        let key = comparison_key(path);
        if self.failing.contains(&key) {
            return Err(WalkerError::provider_failure(path, "stage could not be opened"));
        }
        let stage = self.stages.get(&key).cloned().unwrap_or_default();
        Ok(Box::new(stage))
    }

    fn name(&self) -> &str {
        "static"
    }
}
