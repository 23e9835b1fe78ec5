//! Rendering registry records into runtime values for `inspect`,
//! `describe` and `builtins`

use super::{CallableInfo, registry};
use crate::interp::{Dict, InterpResult, RuntimeError, TypeTag, Value};

/// `{type, name, receiver?, arity, description, params, category}`
pub fn record_value(info: &CallableInfo) -> Value {
    let mut dict = Dict::new();
    dict.insert("type", Value::str(info.kind.as_str()));
    dict.insert("name", Value::str(info.name));
    if let Some(receiver) = info.receiver {
        dict.insert("receiver", Value::str(receiver.name()));
    }
    dict.insert("arity", Value::str(info.arity.to_string()));
    dict.insert("description", Value::str(info.description));
    dict.insert(
        "params",
        Value::array(info.params.iter().map(Value::str).collect()),
    );
    dict.insert("category", Value::str(info.category));
    Value::dict(dict)
}

/// Registry record behind a builtin or bound-method value
fn callable_info(value: &Value) -> InterpResult<Option<&'static CallableInfo>> {
    let info = match value {
        Value::Builtin(name) => registry().builtin(name),
        Value::Method(bound) => registry().method(bound.receiver.tag(), &bound.name),
        _ => return Ok(None),
    };
    info.map(Some).ok_or_else(|| {
        RuntimeError::internal(format!("no metadata for callable value {value}"))
    })
}

pub fn inspect_value(value: &Value) -> InterpResult<Value> {
    if let Some(info) = callable_info(value)? {
        return Ok(record_value(info));
    }

    let tag = value.tag();
    let mut dict = Dict::new();
    dict.insert("type", Value::str(tag.name()));
    let methods = registry()
        .methods_of(tag)
        .iter()
        .map(|info| Value::str(info.name))
        .collect();
    dict.insert("methods", Value::array(methods));
    match value {
        Value::Dict(d) => {
            dict.insert("keys", Value::array(d.keys().map(Value::str).collect()));
        }
        Value::Function(closure) => {
            let params = closure
                .params
                .iter()
                .map(|p| Value::str(p.to_string()))
                .collect();
            dict.insert("params", Value::array(params));
        }
        _ => {}
    }
    Ok(Value::dict(dict))
}

/// One line for callables, a `Type:` / `Methods:` summary otherwise
pub fn describe_value(value: &Value) -> InterpResult<Value> {
    if let Some(info) = callable_info(value)? {
        return Ok(Value::str(info.describe_line()));
    }

    Ok(Value::str(describe_type(value.tag())))
}

/// `Type: <name>` followed by one line per method of the type
pub fn describe_type(tag: TypeTag) -> String {
    let mut out = format!("Type: {tag}");
    let methods = registry().methods_of(tag);
    if !methods.is_empty() {
        out.push_str("\n\nMethods:");
        for info in methods {
            out.push_str(&format!("\n  .{}", info.describe_line()));
        }
    }
    out
}

/// `{category: [record, ...]}`, categories and names sorted
pub fn builtins_value(category: Option<&str>) -> InterpResult<Value> {
    let registry = registry();
    let categories = registry.categories();
    let selected: Vec<&str> = match category {
        None => categories,
        Some(wanted) if categories.contains(&wanted) => vec![wanted],
        Some(unknown) => {
            return Err(RuntimeError::invalid_argument(format!(
                "unknown builtin category '{unknown}' (known: {})",
                categories.join(", ")
            )));
        }
    };

    let mut dict = Dict::new();
    for cat in selected {
        let records = registry
            .builtins()
            .iter()
            .filter(|info| info.category == cat)
            .map(record_value)
            .collect();
        dict.insert(cat, Value::array(records));
    }
    Ok(Value::dict(dict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::{BoundMethod, ErrorKind};
    use std::rc::Rc;

    fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
        value.as_dict().unwrap().get(key).unwrap()
    }

    #[test]
    fn test_inspect_builtin_record() {
        let record = inspect_value(&Value::Builtin("builtins")).unwrap();
        assert_eq!(field(&record, "type"), &Value::str("builtin"));
        assert_eq!(field(&record, "name"), &Value::str("builtins"));
        assert_eq!(field(&record, "arity"), &Value::str("0-1"));
        assert_eq!(field(&record, "category"), &Value::str("introspection"));
        assert_eq!(
            field(&record, "params"),
            &Value::array(vec![Value::str("category?")])
        );
    }

    #[test]
    fn test_inspect_method_record_has_receiver() {
        let bound = Value::Method(Rc::new(BoundMethod {
            receiver: Value::array(vec![]),
            name: "take".to_string(),
        }));
        let record = inspect_value(&bound).unwrap();
        assert_eq!(field(&record, "type"), &Value::str("method"));
        assert_eq!(field(&record, "receiver"), &Value::str("array"));
        assert_eq!(
            record.as_dict().unwrap().keys().collect::<Vec<_>>(),
            vec!["type", "name", "receiver", "arity", "description", "params", "category"]
        );
    }

    #[test]
    fn test_describe_method_line() {
        let bound = Value::Method(Rc::new(BoundMethod {
            receiver: Value::array(vec![]),
            name: "pick".to_string(),
        }));
        assert_eq!(
            describe_value(&bound).unwrap(),
            Value::str("pick(n?) - Pick random element(s)")
        );
    }

    #[test]
    fn test_describe_plain_value() {
        let text = describe_value(&Value::Int(3)).unwrap();
        assert_eq!(
            text.as_str().unwrap(),
            "Type: integer\n\nMethods:\n  .abs() - Absolute value\n  .type() - Get type name"
        );
    }

    #[test]
    fn test_inspect_dict_lists_keys() {
        let d: Dict = [("x", Value::Int(1))].into_iter().collect();
        let info = inspect_value(&Value::dict(d)).unwrap();
        assert_eq!(field(&info, "type"), &Value::str("dictionary"));
        assert_eq!(field(&info, "keys"), &Value::array(vec![Value::str("x")]));
    }

    #[test]
    fn test_builtins_by_category() {
        let all = builtins_value(None).unwrap();
        let categories: Vec<&str> = all.as_dict().unwrap().keys().collect();
        assert_eq!(
            categories,
            vec!["control", "conversion", "format", "introspection"]
        );

        let one = builtins_value(Some("control")).unwrap();
        let records = field(&one, "control").as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(field(&records[0], "name"), &Value::str("fail"));
    }

    #[test]
    fn test_builtins_unknown_category() {
        let err = builtins_value(Some("network")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert!(err.message.contains("network"));
    }
}
