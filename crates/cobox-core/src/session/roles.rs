// ── Role normalization ──
//
// Sign-in responses carry roles in several shapes. They are classified
// first, then flattened into a list of trimmed, upper-cased names.

use serde_json::Value;

/// Role granting access to route management.
pub const MANAGER_ROLE: &str = "ROLE_MANAGER";

/// The shape a `roles` value arrived in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoleShape<'a> {
    /// Absent or `null`.
    Missing,
    /// `"ROLE_A, ROLE_B"`
    Text(&'a str),
    /// `["ROLE_A", {"name": "ROLE_B"}, ...]`
    List(&'a [Value]),
    /// Anything else (numbers, booleans, bare objects).
    Other,
}

impl<'a> RoleShape<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items),
            Value::Bool(_) | Value::Number(_) | Value::Object(_) => Self::Other,
        }
    }
}

/// Flatten any supported roles value into normalized role names.
pub fn normalize_roles(value: &Value) -> Vec<String> {
    match RoleShape::classify(value) {
        RoleShape::Missing | RoleShape::Other => Vec::new(),
        RoleShape::Text(text) => text.split(',').filter_map(clean).collect(),
        RoleShape::List(items) => items.iter().filter_map(list_item).collect(),
    }
}

/// Whether `roles` grants manager access.
pub fn is_manager(roles: &[String]) -> bool {
    roles.iter().any(|r| r == MANAGER_ROLE)
}

fn list_item(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => clean(s),
        Value::Object(obj) => ["name", "role", "authority"]
            .iter()
            .find_map(|field| obj.get(*field).and_then(Value::as_str))
            .and_then(clean),
        Value::Number(n) => clean(&n.to_string()),
        Value::Bool(b) => clean(&b.to_string()),
        Value::Null | Value::Array(_) => None,
    }
}

fn clean(raw: &str) -> Option<String> {
    let role = raw.trim().to_uppercase();
    (!role.is_empty()).then_some(role)
}
