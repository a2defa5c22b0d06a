//! Schema-driven validation of a raw configuration document
//!
//! Produces a cleaned document containing only keys the schema knows about,
//! with wrong-typed values replaced by defaults or dropped. Anomalies are
//! reported through the diagnostic sink and never abort validation; parsing
//! the document at all is the caller's responsibility.

use serde_json::{Map, Value};

use crate::diagnostics::{DiagnosticSink, Level};
use crate::schema::{NodeName, Schema, SchemaNode, ValueKind};

/// Validate `source` against `schema`, returning the defaulted, filtered
/// document. Key order follows schema declaration order; wildcard matches
/// follow source document order.
pub fn validate(
    source: &Map<String, Value>,
    schema: &Schema,
    sink: &mut dyn DiagnosticSink,
) -> Map<String, Value> {
    validate_level(source, schema.nodes(), "", sink)
}

fn validate_level(
    source: &Map<String, Value>,
    nodes: &[SchemaNode],
    prefix: &str,
    sink: &mut dyn DiagnosticSink,
) -> Map<String, Value> {
    let mut target = Map::new();

    for node in nodes {
        match &node.name {
            NodeName::Wildcard => {
                validate_wildcard(source, node, prefix, sink, &mut target);
            }
            NodeName::Named(name) => {
                validate_named(source, node, name, prefix, sink, &mut target);
            }
        }
    }

    target
}

/// A wildcard node takes every source key of the declared kind. Defaults do
/// not apply to wildcard entries.
fn validate_wildcard(
    source: &Map<String, Value>,
    node: &SchemaNode,
    prefix: &str,
    sink: &mut dyn DiagnosticSink,
    target: &mut Map<String, Value>,
) {
    for (key, value) in source {
        if !node.kind.matches(value) {
            sink.emit(
                Level::Error,
                format!("config {prefix}{key}: {value} - invalid value, ignoring the parameter"),
            );
            continue;
        }
        match (&node.children, value.as_object()) {
            (Some(children), Some(map)) => {
                let nested = validate_level(map, children, &format!("{prefix}{key}."), sink);
                target.insert(key.clone(), Value::Object(nested));
            }
            _ => {
                sink.emit(Level::Debug, format!("config {prefix}{key}: {value}"));
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn validate_named(
    source: &Map<String, Value>,
    node: &SchemaNode,
    name: &str,
    prefix: &str,
    sink: &mut dyn DiagnosticSink,
    target: &mut Map<String, Value>,
) {
    let Some(value) = source.get(name) else {
        // Missing key: default if one exists, silent omission otherwise
        if let Some(default) = &node.default {
            sink.emit(
                Level::Info,
                format!("no value for property {prefix}{name}, using default value: {default}"),
            );
            target.insert(name.to_string(), default.clone());
        }
        return;
    };

    if !node.kind.matches(value) {
        match &node.default {
            Some(default) => {
                sink.emit(
                    Level::Error,
                    format!(
                        "config {prefix}{name}: {value} - invalid value, \
                         using default value: {default}"
                    ),
                );
                target.insert(name.to_string(), default.clone());
            }
            None => {
                sink.emit(
                    Level::Error,
                    format!("config {prefix}{name}: {value} - invalid value, ignoring the value"),
                );
            }
        }
        return;
    }

    if node.kind == ValueKind::Map {
        match (&node.children, value.as_object()) {
            (Some(children), Some(map)) => {
                let nested = validate_level(map, children, &format!("{prefix}{name}."), sink);
                target.insert(name.to_string(), Value::Object(nested));
            }
            _ => {
                // No nested schema: the map (or array) passes through verbatim
                sink.emit(Level::Debug, format!("config {prefix}{name}: {value}"));
                target.insert(name.to_string(), value.clone());
            }
        }
        return;
    }

    if let (Some(allowed), Some(text)) = (&node.allowed, value.as_str()) {
        let lowered = text.to_lowercase();
        if allowed.iter().any(|candidate| candidate == &lowered) {
            sink.emit(Level::Debug, format!("config {prefix}{name}: {lowered}"));
            target.insert(name.to_string(), Value::String(lowered));
        } else {
            // Schema construction guarantees allowed-values nodes carry a default
            let default = node.default.clone().unwrap_or(Value::Null);
            sink.emit(
                Level::Error,
                format!(
                    "config {prefix}{name}: {value} - invalid value, \
                     using default value: {default}"
                ),
            );
            target.insert(name.to_string(), default);
        }
        return;
    }

    sink.emit(Level::Debug, format!("config {prefix}{name}: {value}"));
    target.insert(name.to_string(), value.clone());
}
