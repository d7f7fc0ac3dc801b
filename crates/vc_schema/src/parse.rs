//! The validation driver.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::schema::{ActionKind, Node};
use crate::{FieldPath, Issue, IssueKind, Record, Schema, UnknownKeys, ValidationError, Value};

// -----------------------------------------------------------------------------
// Context

/// Marker for a rejected value. The reasons are recorded in the `Context`.
struct Rejected;

/// `Ok(None)` means "absent": the key is missing from the input and stays missing.
type Outcome = Result<Option<Value>, Rejected>;

struct Context {
    path: FieldPath,
    issues: Vec<Issue>,
}

impl Context {
    fn report(&mut self, kind: IssueKind) -> Rejected {
        self.issues.push(Issue {
            path: self.path.clone(),
            kind,
        });
        Rejected
    }

    fn mismatch(&mut self, expected: &'static str, received: Option<&Value>) -> Rejected {
        let received = match received {
            None => "undefined",
            Some(Value::Number(v)) if v.is_nan() => "NaN",
            Some(value) => value.kind_name(),
        };
        self.report(IssueKind::Type {
            expected: Cow::Borrowed(expected),
            received,
        })
    }
}

// -----------------------------------------------------------------------------
// API

/// Validates `input` against `schema`.
///
/// Returns the output value, which differs from the input where the schema
/// fills defaults, strips unknown keys or runs transforms.
/// On failure every issue found is returned, not only the first one.
///
/// # Examples
///
/// ```
/// use vc_schema::{Value, parse};
///
/// let schema = vc_schema::object([("name", vc_schema::string())]);
///
/// let error = parse(&schema, Value::record([("name", Value::from(7))])).unwrap_err();
/// assert_eq!(error.issues()[0].path.to_string(), "name");
/// ```
pub fn parse(schema: &Schema, input: Value) -> Result<Value, ValidationError> {
    let mut cx = Context {
        path: FieldPath::root(),
        issues: Vec::new(),
    };

    let outcome = run(schema, Some(input), &mut cx);

    match outcome {
        Ok(output) if cx.issues.is_empty() => Ok(output.unwrap_or_default()),
        _ => Err(ValidationError::new(cx.issues)),
    }
}

/// Returns `true` if `schema` accepts `value`.
pub fn is(schema: &Schema, value: &Value) -> bool {
    parse(schema, value.clone()).is_ok()
}

// -----------------------------------------------------------------------------
// Driver

fn run(schema: &Schema, input: Option<Value>, cx: &mut Context) -> Outcome {
    match schema.node() {
        Node::Any => Ok(input),
        Node::Null => match input {
            Some(Value::Null) => Ok(input),
            other => Err(cx.mismatch("null", other.as_ref())),
        },
        Node::Boolean => match input {
            Some(Value::Bool(_)) => Ok(input),
            other => Err(cx.mismatch("boolean", other.as_ref())),
        },
        Node::Number => match input {
            Some(Value::Number(v)) if !v.is_nan() => Ok(input),
            other => Err(cx.mismatch("number", other.as_ref())),
        },
        Node::Integer => match input {
            Some(ref value) if value.is_integer() => Ok(input),
            other => Err(cx.mismatch("integer", other.as_ref())),
        },
        Node::String => match input {
            Some(Value::String(_)) => Ok(input),
            other => Err(cx.mismatch("string", other.as_ref())),
        },
        Node::Literal(expected) => match input {
            Some(value) if value == *expected => Ok(Some(value)),
            other => {
                let received = other.as_ref().map_or("undefined", Value::kind_name);
                Err(cx.report(IssueKind::Type {
                    expected: Cow::Owned(format!("{expected:?}")),
                    received,
                }))
            }
        },
        Node::Optional { inner, default } => match input {
            None => match default {
                Some(default) => run(inner, Some(default.clone()), cx),
                None => Ok(None),
            },
            some => run(inner, some, cx),
        },
        Node::Nullable { inner, default } => match input {
            Some(Value::Null) => match default {
                Some(default) => run(inner, Some(default.clone()), cx),
                None => Ok(Some(Value::Null)),
            },
            other => run(inner, other, cx),
        },
        Node::Nullish { inner } => match input {
            None | Some(Value::Null) => Ok(input),
            other => run(inner, other, cx),
        },
        Node::Array(item) => match input {
            Some(Value::Array(items)) => run_array(item, items, cx),
            other => Err(cx.mismatch("array", other.as_ref())),
        },
        Node::Object {
            entries,
            unknown_keys,
        } => match input {
            Some(Value::Record(record)) => run_object(entries, *unknown_keys, record, cx),
            // Objects are read through their plain view.
            Some(Value::Instance(instance)) => match instance.to_plain() {
                Value::Record(record) => run_object(entries, *unknown_keys, record, cx),
                other => Err(cx.mismatch("record", Some(&other))),
            },
            other => Err(cx.mismatch("record", other.as_ref())),
        },
        Node::Pipe { inner, actions } => {
            let Some(mut value) = run(inner, input, cx)? else {
                return Ok(None);
            };
            for action in actions {
                match &action.0 {
                    ActionKind::Check { test, message, .. } => {
                        if !test(&value) {
                            return Err(cx.report(IssueKind::Check {
                                message: message.clone(),
                            }));
                        }
                    }
                    ActionKind::Transform(map) => match map(value) {
                        Ok(mapped) => value = mapped,
                        Err(message) => return Err(cx.report(IssueKind::Transform { message })),
                    },
                }
            }
            Ok(Some(value))
        }
        Node::Unresolved(label) => Err(cx.report(IssueKind::Unresolved {
            label: label.clone(),
        })),
    }
}

fn run_array(item: &Schema, items: Vec<Value>, cx: &mut Context) -> Outcome {
    let mut output = Vec::with_capacity(items.len());
    let mut rejected = false;

    for (index, value) in items.into_iter().enumerate() {
        cx.path.push_index(index);
        match run(item, Some(value), cx) {
            Ok(value) => output.push(value.unwrap_or_default()),
            Err(Rejected) => rejected = true,
        }
        cx.path.pop();
    }

    if rejected {
        Err(Rejected)
    } else {
        Ok(Some(Value::Array(output)))
    }
}

fn run_object(
    entries: &[(String, Schema)],
    unknown_keys: UnknownKeys,
    mut record: Record,
    cx: &mut Context,
) -> Outcome {
    let mut output = Record::new();
    let mut rejected = false;

    for (name, schema) in entries {
        cx.path.push_key(name.as_str());
        match run(schema, record.remove(name), cx) {
            Ok(Some(value)) => {
                output.insert(name.clone(), value);
            }
            Ok(None) => {}
            Err(Rejected) => rejected = true,
        }
        cx.path.pop();
    }

    match unknown_keys {
        UnknownKeys::Strip => {}
        UnknownKeys::Reject => {
            for key in record.into_keys() {
                cx.path.push_key(key);
                cx.report(IssueKind::UnknownKey);
                cx.path.pop();
                rejected = true;
            }
        }
        UnknownKeys::Passthrough => output.extend(record),
    }

    if rejected {
        Err(Rejected)
    } else {
        Ok(Some(Value::Record(output)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;

    use crate::*;

    fn person() -> Schema {
        object([
            ("name", string()),
            ("age", optional_with(number(), 0)),
            ("nickname", optional(string())),
        ])
    }

    #[test]
    fn fills_defaults_and_keeps_absent_keys_absent() {
        let output = parse(&person(), Value::record([("name", Value::from("John Doe"))])).unwrap();
        assert_eq!(output.get("age"), Some(&Value::Number(0.0)));
        assert_eq!(output.get("nickname"), None);
    }

    #[test]
    fn collects_every_issue_in_declaration_order() {
        let input = Value::record([("age", Value::from("old")), ("nickname", Value::from(1))]);
        let error = parse(&person(), input).unwrap_err();

        let paths: vec::Vec<String> = error.issues().iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, ["name", "age", "nickname"]);
        assert_eq!(
            error.issues()[0].kind,
            IssueKind::Type {
                expected: "string".into(),
                received: "undefined",
            }
        );
    }

    #[test]
    fn unknown_key_policies() {
        let input = Value::record([("name", Value::from("a")), ("extra", Value::from(true))]);

        let stripped = parse(&object([("name", string())]), input.clone()).unwrap();
        assert_eq!(stripped.get("extra"), None);

        let loose = parse(&loose_object([("name", string())]), input.clone()).unwrap();
        assert_eq!(loose.get("extra"), Some(&Value::Bool(true)));

        let error = parse(&strict_object([("name", string())]), input).unwrap_err();
        assert_eq!(error.issue_at("extra").map(|i| &i.kind), Some(&IssueKind::UnknownKey));
    }

    #[test]
    fn array_items_report_indices() {
        let schema = object([("tags", array(string()))]);
        let input = Value::record([(
            "tags",
            Value::Array(vec![Value::from("a"), Value::from(2), Value::from("c")]),
        )]);
        let error = parse(&schema, input).unwrap_err();
        assert_eq!(error.issues().len(), 1);
        assert!(error.issue_at("tags[1]").is_some());
    }

    #[test]
    fn pipeline_stops_at_first_failing_action() {
        let schema = string().with(min_length(3)).transform(|_| Err("unreachable".into()));
        let error = schema.parse(Value::from("ab")).unwrap_err();
        assert_eq!(error.issues().len(), 1);
        assert!(matches!(error.issues()[0].kind, IssueKind::Check { .. }));

        let error = schema.parse(Value::from("abc")).unwrap_err();
        assert!(matches!(error.issues()[0].kind, IssueKind::Transform { .. }));
    }

    #[test]
    fn nullable_and_nullish() {
        assert_eq!(nullable_with(number(), 5).parse(Value::Null).unwrap(), Value::from(5));
        assert!(nullable(number()).parse(Value::Null).unwrap().is_null());
        assert!(is(&nullish(string()), &Value::Null));
        assert!(!is(&optional(string()), &Value::Null));

        let schema = object([("note", nullish(string()))]);
        assert!(is(&schema, &Value::record::<&str, _>([])));
    }

    #[test]
    fn numbers_integers_and_literals() {
        assert!(!is(&number(), &Value::Number(f64::NAN)));
        assert!(is(&integer(), &Value::from(4)));
        assert!(!is(&integer(), &Value::from(4.5)));
        assert!(is(&literal("admin"), &Value::from("admin")));
        assert!(!is(&literal("admin"), &Value::from("user")));
        assert!(is(&min_value_schema(), &Value::from(18)));
        assert!(!is(&min_value_schema(), &Value::from(17)));
    }

    fn min_value_schema() -> Schema {
        integer().with(min_value(18.0)).with(max_value(130.0))
    }

    #[test]
    fn unresolved_rejects_everything() {
        let schema = object([("address", unresolved("Address"))]);
        let input = Value::record([("address", Value::record([("city", Value::from("x"))]))]);
        let error = parse(&schema, input).unwrap_err();
        assert_eq!(
            error.issue_at("address").unwrap().to_string(),
            "`address`: `Address` is not a schema"
        );
    }
}
