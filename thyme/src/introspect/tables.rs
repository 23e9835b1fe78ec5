//! Documentation tables
//!
//! Every entry here must have an executable counterpart in
//! `interp::builtins::BUILTINS` or `interp::methods::TABLES`, with the same
//! arity. `Registry::load` enforces this.

use super::{BuiltinInfo, MethodInfo};
use crate::interp::TypeTag::{self, Array, Dictionary, Error, Float, Integer, String};

pub static BUILTIN_DOCS: &[BuiltinInfo] = &[
    // introspection
    BuiltinInfo {
        name: "inspect",
        arity: "1",
        description: "Get introspection data for value",
        params: &["value"],
        category: "introspection",
    },
    BuiltinInfo {
        name: "describe",
        arity: "1",
        description: "Get human-readable description of value",
        params: &["value"],
        category: "introspection",
    },
    BuiltinInfo {
        name: "builtins",
        arity: "0-1",
        description: "List all builtin functions by category",
        params: &["category?"],
        category: "introspection",
    },
    // conversion
    BuiltinInfo {
        name: "toInt",
        arity: "1",
        description: "Convert value to integer",
        params: &["value"],
        category: "conversion",
    },
    BuiltinInfo {
        name: "toFloat",
        arity: "1",
        description: "Convert value to float",
        params: &["value"],
        category: "conversion",
    },
    BuiltinInfo {
        name: "toString",
        arity: "1",
        description: "Convert value to string",
        params: &["value"],
        category: "conversion",
    },
    BuiltinInfo {
        name: "repr",
        arity: "1",
        description: "Convert value to a literal string",
        params: &["value"],
        category: "conversion",
    },
    // control
    BuiltinInfo {
        name: "fail",
        arity: "1",
        description: "Throw an error with message",
        params: &["message"],
        category: "control",
    },
    // format
    BuiltinInfo {
        name: "format",
        arity: "1+",
        description: "Format string with {} placeholders",
        params: &["template", "values..."],
        category: "format",
    },
];

const fn type_doc(receiver: TypeTag) -> MethodInfo {
    MethodInfo {
        receiver,
        name: "type",
        arity: "0",
        description: "Get type name",
        params: &[],
        category: "introspection",
    }
}

const fn method(
    receiver: TypeTag,
    name: &'static str,
    arity: &'static str,
    params: &'static [&'static str],
    description: &'static str,
    category: &'static str,
) -> MethodInfo {
    MethodInfo {
        receiver,
        name,
        arity,
        description,
        params,
        category,
    }
}

pub static METHOD_DOCS: &[MethodInfo] = &[
    type_doc(TypeTag::Null),
    type_doc(TypeTag::Boolean),
    type_doc(Integer),
    type_doc(Float),
    type_doc(String),
    type_doc(Array),
    type_doc(Dictionary),
    type_doc(TypeTag::Function),
    type_doc(TypeTag::Builtin),
    type_doc(TypeTag::Method),
    type_doc(Error),
    // array
    method(Array, "length", "0", &[], "Get element count", "query"),
    method(Array, "has", "1", &["item"], "Check if array contains item", "query"),
    method(Array, "reverse", "0", &[], "Reverse order", "transform"),
    method(Array, "sort", "0", &[], "Sort elements", "transform"),
    method(Array, "join", "0-1", &["separator?"], "Join elements into string", "transform"),
    method(Array, "insert", "2", &["index", "value"], "Insert at index", "transform"),
    method(Array, "map", "1", &["fn"], "Transform each element", "higher-order"),
    method(Array, "filter", "1", &["fn"], "Filter by predicate", "higher-order"),
    method(
        Array,
        "reduce",
        "2",
        &["fn", "initial"],
        "Reduce to single value with accumulator function",
        "higher-order",
    ),
    method(Array, "pick", "0-1", &["n?"], "Pick random element(s)", "random"),
    method(Array, "take", "1", &["n"], "Take n unique random elements", "random"),
    method(Array, "shuffle", "0", &[], "Randomly shuffle elements", "random"),
    // string
    method(String, "length", "0", &[], "Get character count", "query"),
    method(String, "includes", "1", &["substring"], "Check if contains substring", "query"),
    method(String, "toUpper", "0", &[], "Convert to uppercase", "transform"),
    method(String, "toLower", "0", &[], "Convert to lowercase", "transform"),
    method(String, "trim", "0", &[], "Remove leading/trailing whitespace", "transform"),
    method(String, "split", "1", &["delimiter"], "Split by delimiter into array", "transform"),
    method(
        String,
        "replace",
        "2",
        &["search", "replacement"],
        "Replace all occurrences",
        "transform",
    ),
    // numbers
    method(Integer, "abs", "0", &[], "Absolute value", "math"),
    method(Float, "abs", "0", &[], "Absolute value", "math"),
    method(Float, "round", "0-1", &["decimals?"], "Round to n decimals", "math"),
    method(Float, "floor", "0", &[], "Round down", "math"),
    method(Float, "ceil", "0", &[], "Round up", "math"),
    // dictionary
    method(Dictionary, "keys", "0", &[], "Get all keys", "query"),
    method(Dictionary, "values", "0", &[], "Get all values", "query"),
    method(Dictionary, "entries", "0", &[], "Get [key, value] pairs", "query"),
    method(Dictionary, "has", "1", &["key"], "Check if key exists", "query"),
    method(Dictionary, "delete", "1", &["key"], "Copy without key", "transform"),
    // error
    method(Error, "message", "0", &[], "Get error message", "query"),
];
