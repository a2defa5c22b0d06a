//! Declarative configuration schema
//!
//! A schema is an ordered sequence of [`SchemaNode`]s, one per expected
//! configuration key. Nodes are built once at startup and checked for
//! internal consistency at construction, so a malformed schema is a
//! programming error caught before any document is validated.

use serde_json::Value;
use thiserror::Error;

/// Expected JSON type of a configuration value.
///
/// `Map` matches both JSON objects and arrays: the config format has always
/// treated list-valued keys (paths, mimetypes) as plain maps of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Str,
    Num,
    Map,
}

impl ValueKind {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueKind::Bool => value.is_boolean(),
            ValueKind::Str => value.is_string(),
            ValueKind::Num => value.is_number(),
            ValueKind::Map => value.is_object() || value.is_array(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Str => "string",
            ValueKind::Num => "number",
            ValueKind::Map => "map",
        }
    }
}

/// Key matched by a schema node: one named key, or every key present in the
/// source at this level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeName {
    Named(String),
    Wildcard,
}

/// One declarative rule describing an expected configuration key
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub name: NodeName,
    pub kind: ValueKind,
    pub default: Option<Value>,
    pub allowed: Option<Vec<String>>,
    pub children: Option<Vec<SchemaNode>>,
}

impl SchemaNode {
    pub fn named(name: &str, kind: ValueKind) -> Self {
        Self {
            name: NodeName::Named(name.to_string()),
            kind,
            default: None,
            allowed: None,
            children: None,
        }
    }

    pub fn wildcard(kind: ValueKind) -> Self {
        Self {
            name: NodeName::Wildcard,
            kind,
            default: None,
            allowed: None,
            children: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_children(mut self, children: Vec<SchemaNode>) -> Self {
        self.children = Some(children);
        self
    }

    fn key_label(&self) -> &str {
        match &self.name {
            NodeName::Named(name) => name,
            NodeName::Wildcard => "*",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema level '{0}' mixes a wildcard node with other nodes")]
    MixedWildcard(String),
    #[error("schema node '{0}' declares allowed values but no default")]
    AllowedWithoutDefault(String),
    #[error("schema node '{0}' declares allowed values on a non-string kind")]
    AllowedOnNonString(String),
    #[error("schema node '{0}' declares children on a non-map kind")]
    ChildrenOnNonMap(String),
}

/// An ordered sequence of schema nodes, checked for consistency once
#[derive(Debug, Clone)]
pub struct Schema {
    nodes: Vec<SchemaNode>,
}

impl Schema {
    pub fn new(nodes: Vec<SchemaNode>) -> Result<Self, SchemaError> {
        check_level(&nodes, "")?;
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }
}

fn check_level(nodes: &[SchemaNode], prefix: &str) -> Result<(), SchemaError> {
    let wildcards = nodes
        .iter()
        .filter(|n| n.name == NodeName::Wildcard)
        .count();
    if wildcards > 0 && nodes.len() > 1 {
        return Err(SchemaError::MixedWildcard(prefix.to_string()));
    }

    for node in nodes {
        let path = format!("{prefix}{}", node.key_label());

        if node.allowed.is_some() {
            if node.kind != ValueKind::Str {
                return Err(SchemaError::AllowedOnNonString(path));
            }
            if node.default.is_none() {
                return Err(SchemaError::AllowedWithoutDefault(path));
            }
        }

        if let Some(children) = &node.children {
            if node.kind != ValueKind::Map {
                return Err(SchemaError::ChildrenOnNonMap(path));
            }
            check_level(children, &format!("{path}."))?;
        }
    }
    Ok(())
}
