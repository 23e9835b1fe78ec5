//! Pattern binder
//!
//! Binding is all-or-nothing. Sub-bindings are staged in a scratch frame
//! (a child of the target) and copied into the target only after the whole
//! pattern has matched, so a failure leaves the target untouched.

use super::env::{EnvRef, child_env};
use super::error::{InterpResult, RuntimeError};
use super::eval::Interpreter;
use super::value::{Dict, Value};
use crate::ast::{PLACEHOLDER, Pattern};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// How staged names reach the target frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    /// `let`: define in the target frame
    Let,
    /// Plain assignment: update the declaring frame, else define in the target
    Assign,
}

/// Bindings collected while matching, in binding order
#[derive(Default)]
struct Staged {
    bindings: Vec<(String, Value)>,
    seen: HashSet<String>,
}

/// Bindings of every frame from the target up to the global frame
struct ChainSnapshot(Vec<(EnvRef, HashMap<String, Value>)>);

impl ChainSnapshot {
    fn capture(env: &EnvRef) -> Self {
        let mut frames = Vec::new();
        let mut current = Some(Rc::clone(env));
        while let Some(frame) = current {
            let (bindings, parent) = {
                let borrowed = frame.borrow();
                (borrowed.bindings().clone(), borrowed.parent().cloned())
            };
            frames.push((frame, bindings));
            current = parent;
        }
        ChainSnapshot(frames)
    }

    fn restore(self) {
        for (frame, bindings) in self.0 {
            frame.borrow_mut().restore_bindings(bindings);
        }
    }
}

impl Interpreter {
    /// Destructure `value` with `pattern` into `env`
    pub fn bind(
        &mut self,
        pattern: &Pattern,
        value: Value,
        env: &EnvRef,
        mode: BindMode,
    ) -> InterpResult<()> {
        self.bind_all(vec![(pattern, value)], env, mode)
    }

    /// Bind several patterns as one unit, e.g. the parameters of a call.
    /// A name bound by two of them is a malformed pattern.
    pub fn bind_all(
        &mut self,
        pairs: Vec<(&Pattern, Value)>,
        env: &EnvRef,
        mode: BindMode,
    ) -> InterpResult<()> {
        // Default expressions may assign to outer names; those writes are
        // undone if the pattern fails.
        let snapshot = pairs
            .iter()
            .any(|(pattern, _)| pattern.has_defaults())
            .then(|| ChainSnapshot::capture(env));

        let scratch = child_env(env);
        let mut staged = Staged::default();
        for (pattern, value) in pairs {
            if let Err(err) = self.stage(pattern, value, &scratch, &mut staged) {
                if let Some(snapshot) = snapshot {
                    snapshot.restore();
                }
                return Err(err);
            }
        }

        let count = staged.bindings.len();
        let mut frame = env.borrow_mut();
        for (name, value) in staged.bindings {
            match mode {
                BindMode::Let => frame.define(name, value),
                BindMode::Assign => frame.assign(&name, value),
            }
        }
        tracing::trace!(names = count, ?mode, "bindings committed");
        Ok(())
    }

    fn stage(
        &mut self,
        pattern: &Pattern,
        value: Value,
        scratch: &EnvRef,
        staged: &mut Staged,
    ) -> InterpResult<()> {
        match pattern {
            Pattern::Placeholder => Ok(()),
            Pattern::Name(name) => stage_name(name, value, scratch, staged),
            Pattern::Array(array) => {
                let Value::Array(items) = &value else {
                    return Err(RuntimeError::type_mismatch("array", value.type_name()));
                };
                for (i, element) in array.elements().iter().enumerate() {
                    let item = items.get(i).cloned().unwrap_or(Value::Null);
                    self.stage(element, item, scratch, staged)?;
                }
                if let Some(rest) = array.rest_target() {
                    let tail = items
                        .get(array.elements().len()..)
                        .map(<[Value]>::to_vec)
                        .unwrap_or_default();
                    stage_name(rest, Value::array(tail), scratch, staged)?;
                }
                Ok(())
            }
            Pattern::Dict(dict_pattern) => {
                let Value::Dict(dict) = &value else {
                    return Err(RuntimeError::type_mismatch("dictionary", value.type_name()));
                };
                for entry in dict_pattern.entries() {
                    let operand = match (dict.get(&entry.key), &entry.default) {
                        (Some(found), _) => found.clone(),
                        // Defaults see the names staged so far.
                        (None, Some(default)) => self.eval(default, scratch)?,
                        (None, None) => Value::Null,
                    };
                    self.stage(&entry.target, operand, scratch, staged)?;
                }
                if let Some(rest) = dict_pattern.rest_target() {
                    let matched: HashSet<&str> = dict_pattern
                        .entries()
                        .iter()
                        .map(|entry| entry.key.as_str())
                        .collect();
                    let remaining: Dict = dict
                        .iter()
                        .filter(|(key, _)| !matched.contains(key))
                        .map(|(key, v)| (key, v.clone()))
                        .collect();
                    stage_name(rest, Value::dict(remaining), scratch, staged)?;
                }
                Ok(())
            }
        }
    }
}

fn stage_name(name: &str, value: Value, scratch: &EnvRef, staged: &mut Staged) -> InterpResult<()> {
    if name == PLACEHOLDER {
        return Ok(());
    }
    if name.is_empty() {
        return Err(RuntimeError::pattern_shape("empty binding name"));
    }
    if !staged.seen.insert(name.to_string()) {
        return Err(RuntimeError::pattern_shape(format!("name `{name}` bound twice")));
    }
    scratch.borrow_mut().define(name, value.clone());
    staged.bindings.push((name.to_string(), value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DictEntry, Expr};
    use crate::interp::env::Environment;
    use crate::interp::error::ErrorKind;

    fn ints(values: &[i64]) -> Value {
        Value::array(values.iter().map(|n| Value::Int(*n)).collect())
    }

    fn setup() -> (Interpreter, EnvRef) {
        (Interpreter::with_seed(1), Environment::new().into_ref())
    }

    fn get(env: &EnvRef, name: &str) -> Option<Value> {
        env.borrow().get(name)
    }

    #[test]
    fn test_array_with_rest() {
        let (mut interp, env) = setup();
        let pattern = Pattern::array_with_rest(vec![Pattern::name("a"), Pattern::name("b")], "rest");
        interp.bind(&pattern, ints(&[1, 2, 3, 4]), &env, BindMode::Let).unwrap();
        assert_eq!(get(&env, "a"), Some(Value::Int(1)));
        assert_eq!(get(&env, "b"), Some(Value::Int(2)));
        assert_eq!(get(&env, "rest"), Some(ints(&[3, 4])));
    }

    #[test]
    fn test_short_array_binds_null_and_empty_rest() {
        let (mut interp, env) = setup();
        let pattern = Pattern::array_with_rest(vec![Pattern::name("a"), Pattern::name("b")], "rest");
        interp.bind(&pattern, ints(&[1]), &env, BindMode::Let).unwrap();
        assert_eq!(get(&env, "a"), Some(Value::Int(1)));
        assert_eq!(get(&env, "b"), Some(Value::Null));
        assert_eq!(get(&env, "rest"), Some(ints(&[])));
    }

    #[test]
    fn test_extra_elements_dropped() {
        let (mut interp, env) = setup();
        let pattern = Pattern::array(vec![Pattern::name("a"), Pattern::Placeholder]);
        interp.bind(&pattern, ints(&[1, 2, 3]), &env, BindMode::Let).unwrap();
        assert_eq!(env.borrow().bindings().len(), 1);
        assert_eq!(get(&env, "a"), Some(Value::Int(1)));
    }

    #[test]
    fn test_placeholder_rest_binds_nothing() {
        let (mut interp, env) = setup();
        let pattern = Pattern::array_with_rest(vec![Pattern::name("head")], "_");
        interp.bind(&pattern, ints(&[1, 2]), &env, BindMode::Let).unwrap();
        assert_eq!(env.borrow().bindings().len(), 1);
        assert!(!env.borrow().contains("_"));
    }

    #[test]
    fn test_dict_missing_key_and_rest() {
        let (mut interp, env) = setup();
        let value = Value::dict(
            [("a", Value::Int(1)), ("c", Value::Int(3)), ("d", Value::Int(4))]
                .into_iter()
                .collect(),
        );
        let pattern = Pattern::dict_with_rest(
            vec![DictEntry::shorthand("a"), DictEntry::shorthand("b")],
            "others",
        );
        interp.bind(&pattern, value, &env, BindMode::Let).unwrap();
        assert_eq!(get(&env, "a"), Some(Value::Int(1)));
        assert_eq!(get(&env, "b"), Some(Value::Null));
        assert_eq!(get(&env, "others").unwrap().to_string(), "{c: 3, d: 4}");
    }

    #[test]
    fn test_dict_default_only_when_absent() {
        let (mut interp, env) = setup();
        let value = Value::dict([("a", Value::Null)].into_iter().collect());
        let pattern = Pattern::dict(vec![
            DictEntry::shorthand("a").or_default(Expr::IntLit(10)),
            DictEntry::shorthand("b").or_default(Expr::IntLit(20)),
        ]);
        interp.bind(&pattern, value, &env, BindMode::Let).unwrap();
        assert_eq!(get(&env, "a"), Some(Value::Null));
        assert_eq!(get(&env, "b"), Some(Value::Int(20)));
    }

    #[test]
    fn test_dict_default_sees_earlier_bindings() {
        let (mut interp, env) = setup();
        let value = Value::dict([("width", Value::Int(4))].into_iter().collect());
        let pattern = Pattern::dict(vec![
            DictEntry::shorthand("width"),
            DictEntry::shorthand("height").or_default(Expr::var("width")),
        ]);
        interp.bind(&pattern, value, &env, BindMode::Let).unwrap();
        assert_eq!(get(&env, "height"), Some(Value::Int(4)));
    }

    #[test]
    fn test_dict_alias_and_nested() {
        let (mut interp, env) = setup();
        let value = Value::dict(
            [("name", Value::str("ada")), ("pos", ints(&[3, 4]))]
                .into_iter()
                .collect(),
        );
        let pattern = Pattern::dict(vec![
            DictEntry::with_target("name", Pattern::name("who")),
            DictEntry::with_target(
                "pos",
                Pattern::array(vec![Pattern::name("x"), Pattern::name("y")]),
            ),
        ]);
        interp.bind(&pattern, value, &env, BindMode::Let).unwrap();
        assert_eq!(get(&env, "who"), Some(Value::str("ada")));
        assert_eq!(get(&env, "name"), None);
        assert_eq!(get(&env, "y"), Some(Value::Int(4)));
    }

    #[test]
    fn test_kind_mismatch() {
        let (mut interp, env) = setup();
        let err = interp
            .bind(&Pattern::array(vec![Pattern::name("a")]), Value::Int(5), &env, BindMode::Let)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);

        let err = interp
            .bind(&Pattern::dict(vec![DictEntry::shorthand("a")]), ints(&[1]), &env, BindMode::Let)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.message, "type mismatch: expected dictionary, got array");
    }

    #[test]
    fn test_failed_bind_leaves_scope_unchanged() {
        let (mut interp, env) = setup();
        env.borrow_mut().define("a", Value::str("before"));
        let pattern = Pattern::array(vec![
            Pattern::name("a"),
            Pattern::array(vec![Pattern::name("b")]),
        ]);
        let err = interp
            .bind(&pattern, ints(&[1, 2]), &env, BindMode::Let)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(get(&env, "a"), Some(Value::str("before")));
        assert_eq!(get(&env, "b"), None);
    }

    #[test]
    fn test_failed_bind_undoes_assignment_in_default() {
        let (mut interp, env) = setup();
        env.borrow_mut().define("x", Value::Int(0));
        // {k = (x = 99), m: [y]} against {m: 5}
        let pattern = Pattern::dict(vec![
            DictEntry::shorthand("k").or_default(Expr::Block(vec![
                Expr::assign(Pattern::name("x"), Expr::IntLit(99)),
                Expr::var("x"),
            ])),
            DictEntry::with_target("m", Pattern::array(vec![Pattern::name("y")])),
        ]);
        let value = Value::dict([("m", Value::Int(5))].into_iter().collect());
        let err = interp
            .bind(&pattern, value, &env, BindMode::Let)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(get(&env, "x"), Some(Value::Int(0)));
        assert_eq!(env.borrow().bindings().len(), 1);
    }

    #[test]
    fn test_default_assignment_kept_on_success() {
        let (mut interp, outer) = setup();
        outer.borrow_mut().define("hits", Value::Int(0));
        let inner = child_env(&outer);
        let pattern = Pattern::dict(vec![DictEntry::shorthand("k").or_default(Expr::Block(vec![
            Expr::assign(Pattern::name("hits"), Expr::IntLit(1)),
            Expr::IntLit(7),
        ]))]);
        interp
            .bind(&pattern, Value::dict(Dict::new()), &inner, BindMode::Let)
            .unwrap();
        assert_eq!(get(&inner, "k"), Some(Value::Int(7)));
        assert_eq!(get(&outer, "hits"), Some(Value::Int(1)));
    }

    #[test]
    fn test_duplicate_name_is_pattern_shape() {
        let (mut interp, env) = setup();
        let pattern = Pattern::array(vec![Pattern::name("a"), Pattern::name("a")]);
        let err = interp
            .bind(&pattern, ints(&[1, 2]), &env, BindMode::Let)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PatternShape);
        assert!(env.borrow().bindings().is_empty());
    }

    #[test]
    fn test_assign_mode_updates_declaring_frame() {
        let (mut interp, outer) = setup();
        outer.borrow_mut().define("total", Value::Int(0));
        let inner = child_env(&outer);
        let pattern = Pattern::array(vec![Pattern::name("total"), Pattern::name("fresh")]);
        interp.bind(&pattern, ints(&[5, 6]), &inner, BindMode::Assign).unwrap();
        assert_eq!(get(&outer, "total"), Some(Value::Int(5)));
        assert_eq!(get(&outer, "fresh"), None);
        assert_eq!(get(&inner, "fresh"), Some(Value::Int(6)));
    }

    #[test]
    fn test_let_mode_shadows() {
        let (mut interp, outer) = setup();
        outer.borrow_mut().define("x", Value::Int(0));
        let inner = child_env(&outer);
        interp.bind(&Pattern::name("x"), Value::Int(1), &inner, BindMode::Let).unwrap();
        assert_eq!(get(&outer, "x"), Some(Value::Int(0)));
        assert_eq!(get(&inner, "x"), Some(Value::Int(1)));
    }
}
