//! Filter criteria and how they match a single column.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::models::{AttributesJson, FieldValue, Numeric};

/// Comparison operator of an operator-object criterion.
///
/// Unrecognized operator text decodes to [`Operator::Unknown`], which
/// matches every record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `=` or `==`
    Eq,
    /// `includes`: the sequence contains the value.
    Includes,
    /// `count`: the sequence has exactly `value` elements.
    Count,
    /// `count>`
    CountGt,
    /// `count<`
    CountLt,
    /// Anything else, kept verbatim.
    Unknown(String),
}

impl Operator {
    /// Operator text as written in a filter.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Includes => "includes",
            Self::Count => "count",
            Self::CountGt => "count>",
            Self::CountLt => "count<",
            Self::Unknown(s) => s,
        }
    }

    /// Whether the operator compares a numeric column.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Gt | Self::Lt | Self::Ge | Self::Le | Self::Eq)
    }

    /// Whether the operator inspects a sequence column.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Includes | Self::Count | Self::CountGt | Self::CountLt)
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        match s.as_str() {
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            "=" | "==" => Self::Eq,
            "includes" => Self::Includes,
            "count" => Self::Count,
            "count>" => Self::CountGt,
            "count<" => Self::CountLt,
            _ => Self::Unknown(s),
        }
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unknown(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{ "operator": ..., "value": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// The operator.
    pub operator: Operator,
    /// Right-hand operand.
    pub value: Value,
}

/// One criterion of a [`SearchFilter`](super::SearchFilter).
///
/// Decoding tries the shapes in declaration order: an object with
/// `operator` and `value` is a comparison, any other object an attribute
/// match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Criterion {
    /// Operator-object criterion.
    Comparison(Comparison),
    /// "Any of": at least one listed value is in the sequence column.
    Any(Vec<Value>),
    /// Every key must equal the record's attribute of the same name.
    Attributes(Map<String, Value>),
    /// Membership for sequence columns, equality otherwise.
    Exact(Value),
}

impl Criterion {
    /// Creates an operator-object criterion.
    pub fn compare(operator: impl Into<Operator>, value: impl Into<Value>) -> Self {
        Self::Comparison(Comparison {
            operator: operator.into(),
            value: value.into(),
        })
    }

    /// Evaluates the criterion against one column of a record.
    ///
    /// # Rules
    /// - Comparison on a numeric column (or a numeric extra column): the
    ///   numeric operators compare; sequence operators match.
    /// - Comparison on a well-formed sequence column: the sequence
    ///   operators test membership or length; numeric operators fall back
    ///   to direct equality and fail.
    /// - An unknown operator matches any column.
    /// - Scalar on a sequence column: membership. List: any-of.
    /// - Object on `AttributesJSON`: per-key equality; broken JSON never
    ///   matches.
    /// - Anything else: direct equality. A missing column never matches.
    pub fn matches(&self, field: FieldValue<'_>) -> bool {
        match self {
            Self::Comparison(c) => c.matches(field),
            Self::Any(options) if is_sequence(field) => options
                .iter()
                .any(|option| membership(field, option).unwrap_or(false)),
            Self::Any(options) => equals(field, &Value::Array(options.clone())),
            Self::Attributes(expected) => match field {
                FieldValue::Attributes(attrs) if !attrs.is_blank() => {
                    attributes_match(attrs, expected)
                }
                _ => equals(field, &Value::Object(expected.clone())),
            },
            Self::Exact(value) => membership(field, value).unwrap_or_else(|| equals(field, value)),
        }
    }
}

impl Comparison {
    fn matches(&self, field: FieldValue<'_>) -> bool {
        let op = &self.operator;
        if let Operator::Unknown(_) = op {
            return true;
        }

        if let Some(x) = numeric_column(field) {
            return if op.is_numeric() { compare(x, op, &self.value) } else { true };
        }
        if let Some(len) = sequence_len(field).filter(|_| op.is_sequence()) {
            return match op {
                Operator::Includes => membership(field, &self.value).unwrap_or(false),
                _ => number_of(&self.value).is_some_and(|n| {
                    let len = len as f64;
                    match op {
                        Operator::Count => len == n,
                        Operator::CountGt => len > n,
                        _ => len < n,
                    }
                }),
            };
        }

        let object = serde_json::to_value(self).unwrap_or(Value::Null);
        equals(field, &object)
    }
}

/// Reading of a numeric-shaped column. `Some(None)` for a numeric cell
/// holding non-numeric text, which fails every comparison.
fn numeric_column(field: FieldValue<'_>) -> Option<Option<f64>> {
    match field {
        FieldValue::Number(n) => Some(n.value()),
        FieldValue::Other(v) => number_of(v).map(Some),
        _ => None,
    }
}

fn compare(x: Option<f64>, op: &Operator, value: &Value) -> bool {
    let (Some(x), Some(y)) = (x, number_of(value)) else {
        return false;
    };
    match op {
        Operator::Gt => x > y,
        Operator::Lt => x < y,
        Operator::Ge => x >= y,
        Operator::Le => x <= y,
        Operator::Eq => x == y,
        _ => true,
    }
}

fn is_sequence(field: FieldValue<'_>) -> bool {
    sequence_len(field).is_some()
}

/// Length of a well-formed sequence column.
fn sequence_len(field: FieldValue<'_>) -> Option<usize> {
    match field {
        FieldValue::Labels(seq) => seq.items().map(<[String]>::len),
        FieldValue::Numbers(seq) => seq.items().map(<[Numeric]>::len),
        _ => None,
    }
}

/// Whether a well-formed sequence column contains `value`; `None` for
/// other columns.
fn membership(field: FieldValue<'_>, value: &Value) -> Option<bool> {
    match field {
        FieldValue::Labels(seq) => seq
            .items()
            .map(|items| value.as_str().is_some_and(|s| items.iter().any(|i| i == s))),
        FieldValue::Numbers(seq) => seq.items().map(|items| {
            value.is_number() && items.iter().any(|i| values_equal(&i.to_value(), value))
        }),
        _ => None,
    }
}

fn attributes_match(attrs: &AttributesJson, expected: &Map<String, Value>) -> bool {
    match attrs.parsed() {
        Some(Value::Object(actual)) => expected
            .iter()
            .all(|(key, want)| actual.get(key).is_some_and(|got| values_equal(got, want))),
        Some(_) => expected.is_empty(),
        None => {
            tracing::trace!("attribute criterion skipped: AttributesJSON is not valid JSON");
            false
        }
    }
}

fn equals(field: FieldValue<'_>, value: &Value) -> bool {
    field.is_present() && values_equal(&field.to_value(), value)
}

/// JSON equality, with numbers compared by value (`3` equals `3.0`).
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Numbers and numeric text.
fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sequence;
    use serde_json::json;

    fn criterion(value: Value) -> Criterion {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_criterion_shapes() {
        assert!(matches!(
            criterion(json!({"operator": ">", "value": 3})),
            Criterion::Comparison(Comparison { operator: Operator::Gt, .. })
        ));
        assert!(matches!(criterion(json!(["a", "b"])), Criterion::Any(_)));
        assert!(matches!(
            criterion(json!({"location": "north"})),
            Criterion::Attributes(_)
        ));
        assert!(matches!(criterion(json!("python")), Criterion::Exact(_)));
        assert!(matches!(
            criterion(json!({"operator": "==", "value": 1})),
            Criterion::Comparison(Comparison { operator: Operator::Eq, .. })
        ));
        assert!(matches!(
            criterion(json!({"operator": "between", "value": 1})),
            Criterion::Comparison(Comparison { operator: Operator::Unknown(_), .. })
        ));
    }

    #[test]
    fn test_operator_round_trip() {
        let json = serde_json::to_value(Criterion::compare("count>", 2)).unwrap();
        assert_eq!(json, json!({"operator": "count>", "value": 2}));
        assert_eq!(Operator::from("nearly").to_string(), "nearly");
    }

    #[test]
    fn test_numeric_comparisons() {
        let five = Numeric::from(5);
        let field = FieldValue::Number(&five);
        assert!(Criterion::compare(">", 3).matches(field));
        assert!(!Criterion::compare("<", 3).matches(field));
        assert!(Criterion::compare(">=", 5).matches(field));
        assert!(Criterion::compare("<=", 5.0).matches(field));
        assert!(Criterion::compare("=", 5).matches(field));
        assert!(Criterion::compare("==", "5").matches(field));
        assert!(Criterion::compare("between", 99).matches(field));
        assert!(Criterion::compare("count", 1).matches(field));
    }

    #[test]
    fn test_non_numeric_cell_fails_comparisons() {
        let bad = Numeric::from("high");
        assert!(!Criterion::compare(">", 0).matches(FieldValue::Number(&bad)));
        assert!(Criterion::compare("~", 0).matches(FieldValue::Number(&bad)));
    }

    #[test]
    fn test_missing_column() {
        assert!(!Criterion::compare(">", 0).matches(FieldValue::Missing));
        assert!(Criterion::compare("?", 0).matches(FieldValue::Missing));
        assert!(!Criterion::Exact(Value::Null).matches(FieldValue::Missing));
    }

    #[test]
    fn test_sequence_operators() {
        let phases = Sequence::from(vec![Numeric::from(1), Numeric::from(2), Numeric::from(3)]);
        let field = FieldValue::Numbers(&phases);
        assert!(Criterion::compare("includes", 2).matches(field));
        assert!(!Criterion::compare("includes", 4).matches(field));
        assert!(Criterion::compare("count", 3).matches(field));
        assert!(Criterion::compare("count>", 2).matches(field));
        assert!(!Criterion::compare("count<", 3).matches(field));
    }

    #[test]
    fn test_numeric_operator_on_sequence_fails() {
        let skills = Sequence::from(vec!["python".to_string()]);
        assert!(!Criterion::compare(">", 100).matches(FieldValue::Labels(&skills)));

        let phases = Sequence::from(vec![Numeric::from(1), Numeric::from(2)]);
        assert!(!Criterion::compare("=", 2).matches(FieldValue::Numbers(&phases)));
        assert!(!Criterion::compare("<", 0).matches(FieldValue::Numbers(&phases)));
        assert!(Criterion::compare("between", 0).matches(FieldValue::Numbers(&phases)));
    }

    #[test]
    fn test_membership_and_any_of() {
        let skills = Sequence::from(vec!["python".to_string(), "sql".to_string()]);
        let field = FieldValue::Labels(&skills);
        assert!(criterion(json!("sql")).matches(field));
        assert!(!criterion(json!("java")).matches(field));
        assert!(criterion(json!(["java", "python"])).matches(field));
        assert!(!criterion(json!(["java", "go"])).matches(field));
        assert!(!criterion(json!(3)).matches(field));

        let slots = Sequence::from(vec![Numeric::from(1), Numeric::from(4)]);
        assert!(criterion(json!(4)).matches(FieldValue::Numbers(&slots)));
        assert!(!criterion(json!("4")).matches(FieldValue::Numbers(&slots)));
    }

    #[test]
    fn test_malformed_sequence_uses_equality() {
        let raw: Sequence<String> = serde_json::from_value(json!("python,sql")).unwrap();
        let field = FieldValue::Labels(&raw);
        assert!(!criterion(json!("python")).matches(field));
        assert!(criterion(json!("python,sql")).matches(field));
        assert!(!Criterion::compare("includes", "python").matches(field));
    }

    #[test]
    fn test_attribute_criteria() {
        let attrs = AttributesJson::from(r#"{"location": "north", "tier": 2}"#);
        let field = FieldValue::Attributes(&attrs);
        assert!(criterion(json!({"location": "north"})).matches(field));
        assert!(criterion(json!({"location": "north", "tier": 2})).matches(field));
        assert!(!criterion(json!({"location": "south"})).matches(field));
        assert!(!criterion(json!({"region": "north"})).matches(field));

        let broken = AttributesJson::from("{location: north");
        assert!(!criterion(json!({"location": "north"})).matches(FieldValue::Attributes(&broken)));
    }

    #[test]
    fn test_exact_equality() {
        assert!(criterion(json!("GroupA")).matches(FieldValue::Text("GroupA")));
        assert!(!criterion(json!("groupa")).matches(FieldValue::Text("GroupA")));
        let three = Numeric::from(3);
        assert!(criterion(json!(3.0)).matches(FieldValue::Number(&three)));
    }

    #[test]
    fn test_numeric_extra_column() {
        let rate = json!(40);
        assert!(Criterion::compare(">", 30).matches(FieldValue::Other(&rate)));
        let name = json!("Ana");
        assert!(!Criterion::compare(">", 30).matches(FieldValue::Other(&name)));
    }
}
