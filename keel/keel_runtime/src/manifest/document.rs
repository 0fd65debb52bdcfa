//! Manifest document model.

use indexmap::IndexMap;
use keel_core::error::ManifestError;
use serde::Deserialize;

use super::loader::ManifestSource;

/// An `environments` node value: scalar or ordered sequence.
///
/// The node's shape selects the directive mode: a scalar replaces, a
/// sequence prepends.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    /// Single value; applied with replace semantics.
    Scalar(String),

    /// Ordered values; applied with prepend semantics.
    Sequence(Vec<String>),
}

/// How an environment directive is applied to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    /// Overwrite whatever value the entry held.
    Replace,

    /// Formalize each element and push it to the front of the existing
    /// value, in listed order, so the last-listed element ends up frontmost.
    Prepend,
}

/// One environment directive extracted from the manifest.
#[derive(Debug, Clone)]
pub struct EnvDirective {
    /// Environment entry name.
    pub name: String,

    /// Application mode, derived from the node shape.
    pub mode: EnvMode,

    /// Value(s) to apply, in document order.
    pub values: Vec<String>,
}

/// The subtree for one host OS: environment directives and the ordered
/// module list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostSection {
    /// Environment directives in document order.
    #[serde(default)]
    pub environments: IndexMap<String, EnvValue>,

    /// Module paths in load order.
    #[serde(default)]
    pub modules: Vec<String>,
}

impl HostSection {
    /// Environment directives in document order.
    pub fn directives(&self) -> Vec<EnvDirective> {
        self.environments
            .iter()
            .map(|(name, value)| match value {
                EnvValue::Scalar(v) => EnvDirective {
                    name: name.clone(),
                    mode: EnvMode::Replace,
                    values: vec![v.clone()],
                },
                EnvValue::Sequence(vs) => EnvDirective {
                    name: name.clone(),
                    mode: EnvMode::Prepend,
                    values: vs.clone(),
                },
            })
            .collect()
    }

    /// Raw environment node for `name`, if declared.
    pub fn environment(&self, name: &str) -> Option<&EnvValue> {
        self.environments.get(name)
    }
}

/// An immutable-after-load manifest document.
#[derive(Debug, Clone)]
pub struct Manifest {
    context: String,
    host_os: IndexMap<String, HostSection>,
}

impl Manifest {
    /// Parse a manifest from raw text and validate the required shape.
    ///
    /// A document missing `app` or `app.host_os` is rejected here; the
    /// current-OS subtree is checked at [`Manifest::host_section`] time.
    pub fn from_text(text: &str) -> Result<Self, ManifestError> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ManifestError::Parse(e.to_string()))?;

        let app = value
            .get("app")
            .ok_or_else(|| ManifestError::MissingNode("app".to_string()))?;
        let host_os = app
            .get("host_os")
            .ok_or_else(|| ManifestError::MissingNode("app.host_os".to_string()))?;

        let host_os: IndexMap<String, HostSection> = serde_yaml::from_value(host_os.clone())
            .map_err(|e| ManifestError::Parse(e.to_string()))?;

        Ok(Self {
            context: text.to_string(),
            host_os,
        })
    }

    /// Load a manifest from a source (raw content or a file path).
    pub fn load(source: &ManifestSource) -> Result<Self, ManifestError> {
        Self::from_text(&source.read()?)
    }

    /// Slice the document to `app.host_os.<os_id>`.
    ///
    /// The identifier is an opaque key supplied by the platform layer and
    /// matched exactly.
    pub fn host_section(&self, os_id: &str) -> Result<&HostSection, ManifestError> {
        self.host_os
            .get(os_id)
            .ok_or_else(|| ManifestError::HostOsNotFound(os_id.to_string()))
    }

    /// Host OS identifiers the manifest declares, in document order.
    pub fn host_os_ids(&self) -> impl Iterator<Item = &str> {
        self.host_os.keys().map(String::as_str)
    }

    /// The raw text this manifest was loaded from.
    pub fn context(&self) -> &str {
        &self.context
    }
}
