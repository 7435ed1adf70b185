//! Declarative parameter validation
//!
//! Service parameters are checked against a data-driven [`Schema`] before any
//! request is built. The schema is applied to the serde_json projection of
//! the merged parameters, so rules address fields by their wire names
//! (`"maxAlternatives"`, `"vehicle.weightKg"`).
//!
//! Violations are collected in rule-declaration order; the base-URL
//! cross-field invariant is checked on every schema and appended after the
//! field-level issues.

use serde_json::Value;
use thiserror::Error;

/// JSON value categories a rule can require
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    /// Boolean
    Bool,
    /// Number (integer or float)
    Number,
    /// String
    String,
    /// Array
    Array,
    /// Object
    Object,
}

impl JsonKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// A single declarative constraint
#[derive(Debug, Clone)]
pub enum Rule {
    /// The field must be present and non-null
    Required,
    /// The field, when present, must have this JSON kind
    TypeOf(JsonKind),
    /// The field, when present, must be a number within inclusive bounds
    Range {
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
    /// The field, when present, must be one of these string values
    OneOf(&'static [&'static str]),
    /// The field, when present, must be an array of this JSON kind
    ArrayOf(JsonKind),
    /// The field, when present, must be an array with at least this many items
    MinItems(usize),
    /// The field, when present, must be an object satisfying nested rules
    ObjectShape(&'static [FieldRule]),
}

/// A constraint bound to a dot-separated field path
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Dot-separated path using wire field names
    pub path: &'static str,
    /// The constraint applied at that path
    pub rule: Rule,
}

/// Declarative parameter schema for one service
#[derive(Debug, Clone)]
pub struct Schema {
    /// Field rules, checked in declaration order
    pub fields: &'static [FieldRule],
}

/// Machine-readable category of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    /// Required field missing
    Required,
    /// Wrong JSON kind
    Type,
    /// Number out of bounds
    Range,
    /// Value not in the allowed set
    Enum,
    /// Array/object shape violation
    Shape,
    /// Cross-field configuration violation
    Configuration,
}

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .path.as_deref().unwrap_or("(params)"))]
pub struct ValidationIssue {
    /// Wire-name path of the offending field; `None` for cross-field issues
    pub path: Option<String>,
    /// Violation category
    pub code: IssueCode,
    /// Human-readable description
    pub message: String,
}

/// Exact message of the base-URL cross-field invariant
pub const BASE_URL_ISSUE_MESSAGE: &str = "commonBaseURL or customServiceBaseURL is required";

/// Check `params` against `schema`
///
/// A confirming pass-through: the caller keeps using its own params value on
/// success.
///
/// # Errors
///
/// Returns the ordered list of violations, field-level issues first (in rule
/// declaration order), then the base-URL cross-field issue if applicable.
pub fn validate(params: &Value, schema: &Schema) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    check_fields(params, schema.fields, "", &mut issues);

    if !has_base_url(params) {
        issues.push(ValidationIssue {
            path: None,
            code: IssueCode::Configuration,
            message: BASE_URL_ISSUE_MESSAGE.to_string(),
        });
    }

    if issues.is_empty() { Ok(()) } else { Err(issues) }
}

fn check_fields(params: &Value, fields: &[FieldRule], prefix: &str, issues: &mut Vec<ValidationIssue>) {
    for field in fields {
        let path = join_path(prefix, field.path);
        let value = lookup(params, field.path);
        check_rule(&field.rule, value, &path, issues);
    }
}

fn check_rule(rule: &Rule, value: Option<&Value>, path: &str, issues: &mut Vec<ValidationIssue>) {
    // Only `Required` fires on an absent field; every other rule is a
    // constraint on a value the caller chose to supply.
    let present = match value {
        None | Some(Value::Null) => {
            if matches!(rule, Rule::Required) {
                issues.push(issue(path, IssueCode::Required, "is required"));
            }
            return;
        }
        Some(value) => value,
    };

    match rule {
        Rule::Required => {}
        Rule::TypeOf(kind) => {
            if !kind.matches(present) {
                issues.push(issue(
                    path,
                    IssueCode::Type,
                    &format!("must be a {}", kind.name()),
                ));
            }
        }
        Rule::Range { min, max } => match present.as_f64() {
            Some(number) if (*min..=*max).contains(&number) => {}
            Some(_) => issues.push(issue(
                path,
                IssueCode::Range,
                &format!("must be between {min} and {max}"),
            )),
            None => issues.push(issue(path, IssueCode::Type, "must be a number")),
        },
        Rule::OneOf(allowed) => match present.as_str() {
            Some(text) if allowed.contains(&text) => {}
            _ => issues.push(issue(
                path,
                IssueCode::Enum,
                &format!("must be one of: {}", allowed.join(", ")),
            )),
        },
        Rule::ArrayOf(kind) => match present.as_array() {
            Some(items) => {
                if !items.iter().all(|item| kind.matches(item)) {
                    issues.push(issue(
                        path,
                        IssueCode::Shape,
                        &format!("must be an array of {} values", kind.name()),
                    ));
                }
            }
            None => issues.push(issue(path, IssueCode::Type, "must be an array")),
        },
        Rule::MinItems(min) => match present.as_array() {
            Some(items) if items.len() >= *min => {}
            Some(_) => issues.push(issue(
                path,
                IssueCode::Shape,
                &format!("must contain at least {min} items"),
            )),
            None => issues.push(issue(path, IssueCode::Type, "must be an array")),
        },
        Rule::ObjectShape(nested) => {
            if present.is_object() {
                check_fields(present, nested, path, issues);
            } else {
                issues.push(issue(path, IssueCode::Type, "must be an object"));
            }
        }
    }
}

fn issue(path: &str, code: IssueCode, message: &str) -> ValidationIssue {
    ValidationIssue {
        path: Some(path.to_string()),
        code,
        message: message.to_string(),
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{prefix}.{path}")
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |acc, segment| acc.get(segment))
}

fn has_base_url(params: &Value) -> bool {
    ["commonBaseURL", "customServiceBaseURL"]
        .iter()
        .any(|key| matches!(params.get(key), Some(Value::String(url)) if !url.is_empty()))
}
