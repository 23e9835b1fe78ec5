//! Environment for variable bindings
//!
//! A chain of frames. Blocks and function calls push a frame whose parent is
//! the enclosing one; closures keep their defining frame alive through `EnvRef`.

use super::Value;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Shared reference to an environment
pub type EnvRef = Rc<RefCell<Environment>>;

/// Environment holding variable bindings
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Variable bindings in this frame
    bindings: HashMap<String, Value>,
    /// Parent environment for lexical scoping
    parent: Option<EnvRef>,
}

impl Environment {
    /// Create a new global environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new environment with a parent
    pub fn with_parent(parent: EnvRef) -> Self {
        Environment {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Define a variable in this frame, shadowing any outer binding
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a variable in the scope chain
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            Some(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            None
        }
    }

    /// Update the frame that declared `name`; false when no frame did
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            true
        } else if let Some(parent) = &self.parent {
            parent.borrow_mut().set(name, value)
        } else {
            false
        }
    }

    /// Assignment without `let`: update the declaring frame, or define here
    pub fn assign(&mut self, name: &str, value: Value) {
        if !self.set(name, value.clone()) {
            self.define(name, value);
        }
    }

    /// Check if a variable exists in the scope chain
    pub fn contains(&self, name: &str) -> bool {
        if self.bindings.contains_key(name) {
            true
        } else if let Some(parent) = &self.parent {
            parent.borrow().contains(name)
        } else {
            false
        }
    }

    /// Bindings of this frame only
    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }

    pub fn parent(&self) -> Option<&EnvRef> {
        self.parent.as_ref()
    }

    /// Replace this frame's bindings wholesale (rollback of a failed bind)
    pub fn restore_bindings(&mut self, bindings: HashMap<String, Value>) {
        self.bindings = bindings;
    }

    /// Every name visible from this frame, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names.into_iter().collect()
    }

    fn collect_names(&self, out: &mut BTreeSet<String>) {
        out.extend(self.bindings.keys().cloned());
        if let Some(parent) = &self.parent {
            parent.borrow().collect_names(out);
        }
    }
}

/// Create a child environment from a parent reference
pub fn child_env(parent: &EnvRef) -> EnvRef {
    Environment::with_parent(Rc::clone(parent)).into_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        env.define("x", Value::Int(42));
        assert_eq!(env.get("x"), Some(Value::Int(42)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_scope_chain() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("x", Value::Int(1));

        let child = child_env(&parent);
        child.borrow_mut().define("y", Value::Int(2));

        assert_eq!(child.borrow().get("x"), Some(Value::Int(1)));
        assert_eq!(child.borrow().get("y"), Some(Value::Int(2)));
        assert_eq!(parent.borrow().get("y"), None);
    }

    #[test]
    fn test_shadowing() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("x", Value::Int(1));

        let child = child_env(&parent);
        child.borrow_mut().define("x", Value::str("inner"));

        assert_eq!(child.borrow().get("x"), Some(Value::str("inner")));
        assert_eq!(parent.borrow().get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_set_nonexistent_variable() {
        let mut env = Environment::new();
        assert!(!env.set("x", Value::Int(1)));
        assert!(env.bindings().is_empty());
    }

    #[test]
    fn test_set_updates_nearest_declaration() {
        let gp = Environment::new().into_ref();
        gp.borrow_mut().define("x", Value::Int(1));

        let parent = child_env(&gp);
        parent.borrow_mut().define("x", Value::Int(10));

        let child = child_env(&parent);
        assert!(child.borrow_mut().set("x", Value::Int(99)));

        assert_eq!(parent.borrow().get("x"), Some(Value::Int(99)));
        assert_eq!(gp.borrow().get("x"), Some(Value::Int(1)));
        assert!(child.borrow().bindings().is_empty());
    }

    #[test]
    fn test_assign_updates_declaring_frame() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("count", Value::Int(0));

        let child = child_env(&parent);
        child.borrow_mut().assign("count", Value::Int(5));

        assert_eq!(parent.borrow().get("count"), Some(Value::Int(5)));
        assert!(child.borrow().bindings().is_empty());
    }

    #[test]
    fn test_assign_undeclared_defines_locally() {
        let parent = Environment::new().into_ref();
        let child = child_env(&parent);
        child.borrow_mut().assign("fresh", Value::Bool(true));

        assert_eq!(child.borrow().get("fresh"), Some(Value::Bool(true)));
        assert!(!parent.borrow().contains("fresh"));
    }

    #[test]
    fn test_contains_parent_chain() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("x", Value::Int(1));

        let child = child_env(&parent);
        assert!(child.borrow().contains("x"));
        assert!(!child.borrow().contains("y"));
    }

    #[test]
    fn test_bindings_returns_only_local() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("a", Value::Int(1));

        let child = child_env(&parent);
        child.borrow_mut().define("b", Value::Int(2));

        assert_eq!(child.borrow().bindings().len(), 1);
        assert!(child.borrow().bindings().contains_key("b"));
    }

    #[test]
    fn test_names_include_outer_frames_once() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("b", Value::Int(1));
        parent.borrow_mut().define("a", Value::Int(1));

        let child = child_env(&parent);
        child.borrow_mut().define("a", Value::Int(2));
        child.borrow_mut().define("c", Value::Int(3));

        assert_eq!(child.borrow().names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_closure_frame_sees_later_parent_updates() {
        let parent = Environment::new().into_ref();
        let captured = child_env(&parent);
        parent.borrow_mut().define("late", Value::Int(7));
        assert_eq!(captured.borrow().get("late"), Some(Value::Int(7)));
    }

    #[test]
    fn test_multiple_children_independent() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("shared", Value::Int(0));

        let child1 = child_env(&parent);
        let child2 = child_env(&parent);

        child1.borrow_mut().define("x", Value::Int(1));
        child2.borrow_mut().define("y", Value::Int(2));

        assert_eq!(child1.borrow().get("y"), None);
        assert_eq!(child2.borrow().get("x"), None);
        assert_eq!(child1.borrow().get("shared"), Some(Value::Int(0)));
        assert_eq!(child2.borrow().get("shared"), Some(Value::Int(0)));
    }

    #[test]
    fn test_restore_bindings_replaces_frame() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("x", Value::Int(0));
        let saved = parent.borrow().bindings().clone();

        let child = child_env(&parent);
        assert!(child.borrow_mut().set("x", Value::Int(99)));
        parent.borrow_mut().define("extra", Value::Null);

        parent.borrow_mut().restore_bindings(saved);
        assert_eq!(parent.borrow().get("x"), Some(Value::Int(0)));
        assert!(!parent.borrow().contains("extra"));
        assert!(Rc::ptr_eq(child.borrow().parent().unwrap(), &parent));
    }
}
