// Schema validation at the network boundary
//
// Outbound payloads are checked with `validator` derives before a request is
// built; inbound bodies are parsed with serde into the typed models. Both
// directions report failures as a list of `{path, message}` issues keyed by
// wire (camelCase) field names.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::Error;

// ── Issues & reports ────────────────────────────────────────────────

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Wire path of the offending field (`licenceNumber`, `[2].id`, `$`).
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered list of validation issues for one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Message of the first issue reported for `path`, if any.
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|i| i.path == path)
            .map(|i| i.message.as_str())
    }
}

impl From<Vec<ValidationIssue>> for ValidationReport {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        let mut issues: Vec<ValidationIssue> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map_or_else(|| format!("failed `{}` check", e.code), ToString::to_string);
                    ValidationIssue::new(issue_path(field, e), message)
                })
            })
            .collect();
        issues.sort_by(|a, b| a.path.cmp(&b.path));
        Self { issues }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Struct-level checks report under `__all__`; they name their field
/// through a `field` param.
fn issue_path(field: &str, error: &ValidationError) -> String {
    if field == SCHEMA_ERRORS {
        if let Some(named) = error.params.get("field").and_then(serde_json::Value::as_str) {
            return named.to_owned();
        }
        return "$".to_owned();
    }
    camel_case(field)
}

const SCHEMA_ERRORS: &str = "__all__";

/// Map a Rust field name onto its camelCase wire name.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

// ── Outbound ────────────────────────────────────────────────────────

/// Validate a request payload before it is sent.
pub fn check_request<B: Validate>(body: &B) -> Result<(), Error> {
    body.validate()
        .map_err(|errors| Error::Validation(ValidationReport::from(errors)))
}

// ── Inbound ─────────────────────────────────────────────────────────

/// Parse a response body against the schema of `T`.
///
/// An empty body is treated as JSON `null`, so only schemas that accept
/// `null` (e.g. `Option<T>`) succeed on it.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let value = parse_json(body)?;
    serde_json::from_value(value).map_err(|e| invalid_response(String::new(), &e, body))
}

/// Parse a response body as a list, reporting the index of the first
/// element that fails the schema of `T`.
pub fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, Error> {
    let value = parse_json(body)?;
    let serde_json::Value::Array(items) = value else {
        return Err(Error::InvalidResponse {
            report: ValidationReport::from(vec![ValidationIssue::new(
                "$",
                format!("expected an array, got {}", json_kind(&value)),
            )]),
            body: body.to_owned(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item)
                .map_err(|e| invalid_response(format!("[{idx}]"), &e, body))
        })
        .collect()
}

fn parse_json(body: &str) -> Result<serde_json::Value, Error> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(body).map_err(|e| Error::InvalidResponse {
        report: ValidationReport::from(vec![ValidationIssue::new(
            "$",
            format!("invalid JSON: {e}"),
        )]),
        body: body.to_owned(),
    })
}

fn invalid_response(prefix: String, err: &serde_json::Error, body: &str) -> Error {
    let message = err.to_string();
    let path = match missing_field(&message) {
        Some(field) if prefix.is_empty() => field.to_owned(),
        Some(field) => format!("{prefix}.{field}"),
        None if prefix.is_empty() => "$".to_owned(),
        None => prefix,
    };
    Error::InvalidResponse {
        report: ValidationReport::from(vec![ValidationIssue::new(path, message)]),
        body: body.to_owned(),
    }
}

/// Extract `x` from serde's "missing field `x`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ── Optional fields ─────────────────────────────────────────────────

/// Field that may be absent or an explicit `null`: `None` when absent,
/// `Some(None)` for `null`. Pair with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Field that may be absent but must not be `null` when present. Pair
/// with `#[serde(default)]`.
pub fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ── FlexId ──────────────────────────────────────────────────────────

/// Identifier that may arrive as a JSON number or string.
///
/// Always normalized to its string form, so downstream code never
/// branches on the wire type. Serializes as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlexId(String);

impl FlexId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlexId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for FlexId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for FlexId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for FlexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FlexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(Self(s)),
            Raw::Number(n) => Ok(Self(n.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Plate {
        id: i64,
        plate_number: String,
    }

    #[test]
    fn flex_id_accepts_numbers_and_strings() {
        let ids: Vec<FlexId> = serde_json::from_value(json!([7, "7", "abc"])).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2].as_str(), "abc");
        assert_eq!(serde_json::to_value(&ids[0]).unwrap(), json!("7"));
    }

    #[test]
    fn flex_id_rejects_other_shapes() {
        assert!(serde_json::from_value::<FlexId>(json!({"id": 1})).is_err());
        assert!(serde_json::from_value::<FlexId>(json!(null)).is_err());
    }

    #[test]
    fn parse_list_points_at_failing_element() {
        let body = r#"[{"id":1,"plateNumber":"AB-1"},{"id":2}]"#;
        let err = parse_list::<Plate>(body).unwrap_err();
        let Error::InvalidResponse { report, body: raw } = err else {
            panic!("expected InvalidResponse");
        };
        assert_eq!(report.issues()[0].path, "[1].plateNumber");
        assert_eq!(raw, body);
    }

    #[test]
    fn parse_list_rejects_non_arrays() {
        let err = parse_list::<Plate>(r#"{"id":1}"#).unwrap_err();
        assert!(err.to_string().contains("expected an array, got an object"));
    }

    #[test]
    fn parse_body_reports_invalid_json_with_raw_text() {
        let err = parse_body::<Plate>("<html>oops</html>").unwrap_err();
        match err {
            Error::InvalidResponse { report, body } => {
                assert_eq!(report.issues()[0].path, "$");
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_null() {
        let parsed: Option<Plate> = parse_body("").unwrap();
        assert!(parsed.is_none());
        assert!(parse_body::<Plate>("  ").is_err());
    }

    #[test]
    fn camel_case_maps_rust_field_names() {
        assert_eq!(camel_case("licence_number"), "licenceNumber");
        assert_eq!(camel_case("email"), "email");
        assert_eq!(camel_case("first_name"), "firstName");
    }
}
