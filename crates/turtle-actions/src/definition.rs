//! Declarative tree files.
//!
//! ```yaml
//! name: square
//! root:
//!   type: Sequence
//!   name: DrawSquare
//!   children:
//!     - { type: PenDown, r: 0, g: 0, b: 255 }
//!     - { type: GoToPose, name: Corner1, x: 3.0, y: 3.0 }
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{DefinitionError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub root: NodeSpec,
}

impl TreeSpec {
    pub fn from_yaml_str(origin: &str, yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|source| DefinitionError::Yaml {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&path.display().to_string(), &yaml)
    }

    /// Visit every node spec, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a NodeSpec, usize)) {
        self.root.walk_at(0, visit);
    }
}

/// One node: its action type, an optional display name, children for control nodes, and the
/// remaining keys as action parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,

    #[serde(flatten)]
    pub params: Mapping,
}

impl NodeSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            children: Vec::new(),
            params: Mapping::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(Value::from(key), value.into());
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// The node name, falling back to the action type.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.params.get(key).and_then(Value::as_f64)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.params.get(key).and_then(Value::as_bool)
    }

    /// Deserialize the parameters into an action's parameter struct.
    pub fn params<P>(&self) -> Result<P>
    where
        P: DeserializeOwned,
    {
        serde_yaml::from_value(Value::Mapping(self.params.clone())).map_err(|err| {
            DefinitionError::InvalidParams {
                action: self.kind.clone(),
                node: self.display_name().to_string(),
                message: err.to_string(),
            }
        })
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut dyn FnMut(&'a NodeSpec, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}
