//! Runtime domain types.
//!
//! The Runtime domain exposes JavaScript evaluation inside a page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for Runtime.enable (empty).
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnableParams {}

/// Parameters for Runtime.evaluate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    /// Expression to evaluate.
    pub expression: String,
    /// Whether to return the result by value instead of as a remote handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    /// Whether to await the promise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
}

impl EvaluateParams {
    /// Evaluate an expression, returning its value directly.
    pub fn by_value(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            return_by_value: Some(true),
            await_promise: None,
        }
    }
}

/// Mirror object referencing the original JavaScript object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    /// Object type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Object subtype hint.
    pub subtype: Option<String>,
    /// Remote object value when returned by value.
    pub value: Option<Value>,
    /// String representation of the object.
    pub description: Option<String>,
}

impl RemoteObject {
    /// The value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }
}

/// Detailed information about an exception raised during evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    /// Exception message text.
    pub text: String,
    /// Line number of the exception location (0-based).
    pub line_number: i32,
    /// Column number of the exception location (0-based).
    pub column_number: i32,
    /// Exception object if available.
    pub exception: Option<RemoteObject>,
}

/// Result of Runtime.evaluate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    /// Evaluation result.
    pub result: RemoteObject,
    /// Exception details if the evaluation threw.
    pub exception_details: Option<ExceptionDetails>,
}
