//! Accessibility domain types.
//!
//! The Accessibility domain exposes the browser's computed accessibility
//! tree. Nodes arrive as a flat, ordered list linked by child ids; every
//! value-carrying field uses the AXValue wrapper, but some producers flatten
//! it to the raw value, so reads tolerate both shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for Accessibility.enable (empty).
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnableParams {}

/// Parameters for Accessibility.getFullAXTree.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetFullAxTreeParams {
    /// The maximum depth at which descendants of the root node should be
    /// retrieved. If omitted, the full tree is returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<i64>,
}

/// Result of Accessibility.getFullAXTree.
#[derive(Debug, Clone, Deserialize)]
pub struct GetFullAxTreeResult {
    /// Flat list of nodes in tree pre-order.
    pub nodes: Vec<AxNode>,
}

/// A single value in the accessibility tree.
///
/// Tolerates both the documented `{type, value}` wrapper and a bare value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxValue {
    /// The documented wrapper shape.
    Wrapped {
        /// Type of the value.
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        value_type: Option<String>,
        /// The wrapped value.
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    /// A bare value with no wrapper.
    Raw(Value),
}

impl AxValue {
    /// The carried value, unwrapping the typed shape.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Wrapped { value, .. } => value.as_ref(),
            Self::Raw(value) => Some(value),
        }
    }

    /// The carried value as a string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// The carried value as a boolean.
    ///
    /// String `"true"`/`"false"` renderings count; some producers stringify
    /// their booleans.
    pub fn as_bool(&self) -> Option<bool> {
        let value = self.as_value()?;
        value.as_bool().or_else(|| match value.as_str() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        })
    }

    /// The carried value as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }
}

/// A named property attached to an accessibility node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxProperty {
    /// Property name.
    pub name: String,
    /// Property value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AxValue>,
}

/// A node in the accessibility tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxNode {
    /// Unique identifier of the node within its tree.
    pub node_id: String,
    /// Whether the node is ignored for accessibility.
    #[serde(default)]
    pub ignored: bool,
    /// The role of the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AxValue>,
    /// The accessible name of the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<AxValue>,
    /// The accessible description of the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<AxValue>,
    /// The value of the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AxValue>,
    /// Additional properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<AxProperty>>,
    /// Identifiers of the node's children, in order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_ids: Option<Vec<String>>,
    /// The backend id of the associated DOM node, stable across CDP domains.
    #[serde(rename = "backendDOMNodeId", skip_serializing_if = "Option::is_none")]
    pub backend_dom_node_id: Option<i64>,
}

impl AxNode {
    /// The node's role string.
    pub fn role_str(&self) -> Option<&str> {
        self.role.as_ref().and_then(AxValue::as_str)
    }

    /// The node's accessible name, when non-empty.
    pub fn name_str(&self) -> Option<&str> {
        self.name
            .as_ref()
            .and_then(AxValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The node's accessible description, when non-empty.
    pub fn description_str(&self) -> Option<&str> {
        self.description
            .as_ref()
            .and_then(AxValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Look up a property by name.
    ///
    /// Inspects the dedicated top-level fields first, then the property
    /// list, so both layouts a producer may use are covered.
    pub fn property(&self, name: &str) -> Option<&AxValue> {
        match name {
            "name" => {
                if let Some(v) = self.name.as_ref() {
                    return Some(v);
                }
            }
            "description" => {
                if let Some(v) = self.description.as_ref() {
                    return Some(v);
                }
            }
            "value" => {
                if let Some(v) = self.value.as_ref() {
                    return Some(v);
                }
            }
            _ => {}
        }
        self.properties
            .as_ref()?
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_ref())
    }

    /// Whether a boolean property is present and true.
    pub fn bool_property(&self, name: &str) -> bool {
        self.property(name)
            .and_then(AxValue::as_bool)
            .unwrap_or(false)
    }

    /// The node's children, or an empty slice.
    pub fn children(&self) -> &[String] {
        self.child_ids.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests;
