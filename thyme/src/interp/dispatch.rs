//! Value method dispatch
//!
//! Two-level lookup: receiver type tag, then method name. Tables are built
//! once from `methods::TABLES` and never change afterwards.

use super::error::{InterpResult, RuntimeError};
use super::methods;
use super::value::{TypeTag, Value};
use crate::introspect::Arity;
use crate::util::find_similar_name;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::LazyLock;

/// What a native method may ask of the running interpreter
pub trait Runtime {
    /// Shared randomness source
    fn rng(&mut self) -> &mut StdRng;

    /// Call any callable value (closure, builtin, bound method)
    fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> InterpResult<Value>;
}

/// Native method: receiver and already-evaluated arguments in, new value out
pub type MethodFn = fn(&mut dyn Runtime, &Value, &[Value]) -> InterpResult<Value>;

#[derive(Debug, Clone, Copy)]
pub struct MethodEntry {
    pub name: &'static str,
    pub arity: Arity,
    pub func: MethodFn,
}

#[derive(Debug)]
pub struct MethodTable {
    by_type: HashMap<TypeTag, HashMap<&'static str, &'static MethodEntry>>,
}

static METHOD_TABLE: LazyLock<MethodTable> = LazyLock::new(MethodTable::build);

/// Process-wide method table
pub fn method_table() -> &'static MethodTable {
    &METHOD_TABLE
}

/// Resolve and invoke `receiver.method(args)`
pub fn dispatch(
    rt: &mut dyn Runtime,
    receiver: &Value,
    method: &str,
    args: &[Value],
) -> InterpResult<Value> {
    method_table().dispatch(rt, receiver, method, args)
}

impl MethodTable {
    fn build() -> Self {
        let mut by_type: HashMap<TypeTag, HashMap<&'static str, &'static MethodEntry>> =
            HashMap::new();
        for (tag, entries) in methods::TABLES {
            let table = by_type.entry(*tag).or_default();
            for entry in *entries {
                table.insert(entry.name, entry);
            }
        }
        MethodTable { by_type }
    }

    pub fn lookup(&self, receiver: TypeTag, method: &str) -> Option<&'static MethodEntry> {
        self.by_type.get(&receiver)?.get(method).copied()
    }

    pub fn has_method(&self, receiver: TypeTag, method: &str) -> bool {
        self.lookup(receiver, method).is_some()
    }

    /// Method names of a type, sorted
    pub fn names(&self, receiver: TypeTag) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .by_type
            .get(&receiver)
            .map(|table| table.keys().copied().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    pub fn dispatch(
        &self,
        rt: &mut dyn Runtime,
        receiver: &Value,
        method: &str,
        args: &[Value],
    ) -> InterpResult<Value> {
        let tag = receiver.tag();
        let table = self
            .by_type
            .get(&tag)
            .ok_or_else(|| RuntimeError::internal(format!("no method table for type {tag}")))?;

        let Some(entry) = table.get(method) else {
            let names = self.names(tag);
            let hint = find_similar_name(method, names.iter().copied());
            return Err(RuntimeError::method_not_found(tag.name(), method).with_hint(hint));
        };

        if !entry.arity.accepts(args.len()) {
            return Err(RuntimeError::arity_mismatch(
                &format!("{tag}.{}", entry.name),
                entry.arity,
                args.len(),
            ));
        }

        tracing::debug!(receiver = %tag, method, argc = args.len(), "dispatch");
        (entry.func)(rt, receiver, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;
    use rand::SeedableRng;

    /// Runtime without closures, enough for methods that never call back
    struct Plain {
        rng: StdRng,
    }

    impl Runtime for Plain {
        fn rng(&mut self) -> &mut StdRng {
            &mut self.rng
        }

        fn call_value(&mut self, callee: &Value, _args: Vec<Value>) -> InterpResult<Value> {
            Err(RuntimeError::not_callable(callee.type_name()))
        }
    }

    fn plain() -> Plain {
        Plain {
            rng: StdRng::seed_from_u64(7),
        }
    }

    fn ints(values: &[i64]) -> Value {
        Value::array(values.iter().map(|n| Value::Int(*n)).collect())
    }

    #[test]
    fn test_every_type_has_a_table() {
        for tag in TypeTag::ALL {
            assert!(method_table().has_method(tag, "type"), "{tag}");
        }
    }

    #[test]
    fn test_dispatch_length() {
        let result = dispatch(&mut plain(), &ints(&[1, 2, 3]), "length", &[]).unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn test_dispatch_type_on_null() {
        let result = dispatch(&mut plain(), &Value::Null, "type", &[]).unwrap();
        assert_eq!(result, Value::str("null"));
    }

    #[test]
    fn test_unknown_method_suggests() {
        let err = dispatch(&mut plain(), &ints(&[1]), "shufle", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MethodNotFound);
        assert_eq!(err.message, "unknown method 'shufle' for array");
        assert_eq!(err.hint.as_deref(), Some("shuffle"));
    }

    #[test]
    fn test_method_of_other_type_not_found() {
        let err = dispatch(&mut plain(), &Value::Int(3), "shuffle", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MethodNotFound);
        assert!(err.message.contains("integer"));
    }

    #[test]
    fn test_arity_checked_before_call() {
        let err = dispatch(&mut plain(), &ints(&[1, 2]), "pick", &[Value::Int(1), Value::Int(2)])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
        assert_eq!(err.message, "array.pick expects 0-1 argument(s), got 2");

        let err = dispatch(&mut plain(), &ints(&[1, 2]), "take", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_names_sorted() {
        let names = method_table().names(TypeTag::Dictionary);
        assert_eq!(names, vec!["delete", "entries", "has", "keys", "type", "values"]);
    }
}
