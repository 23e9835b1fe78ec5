//! Destructuring patterns
//!
//! Patterns arrive from the front end already structurally valid. The rest
//! element is a dedicated trailing field on `ArrayPattern` / `DictPattern`
//! rather than a list position, so "rest must be last" and "at most one rest"
//! hold by construction.

use super::Expr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name that discards its operand when used as a binding target
pub const PLACEHOLDER: &str = "_";

/// Destructuring pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Binds the whole operand to a name
    Name(String),
    /// `_`: matches anything, binds nothing
    Placeholder,
    /// `[p0, p1, ...rest]`
    Array(ArrayPattern),
    /// `{key, key: pattern, key = default, ...rest}`
    Dict(DictPattern),
}

impl Pattern {
    /// Name pattern; `_` becomes a placeholder
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == PLACEHOLDER {
            Pattern::Placeholder
        } else {
            Pattern::Name(name)
        }
    }

    pub fn array(elements: Vec<Pattern>) -> Self {
        Pattern::Array(ArrayPattern::new(elements))
    }

    pub fn array_with_rest(elements: Vec<Pattern>, rest: impl Into<String>) -> Self {
        Pattern::Array(ArrayPattern::with_rest(elements, rest))
    }

    pub fn dict(entries: Vec<DictEntry>) -> Self {
        Pattern::Dict(DictPattern::new(entries))
    }

    pub fn dict_with_rest(entries: Vec<DictEntry>, rest: impl Into<String>) -> Self {
        Pattern::Dict(DictPattern::with_rest(entries, rest))
    }

    /// Whether matching may evaluate a default expression
    pub fn has_defaults(&self) -> bool {
        match self {
            Pattern::Name(_) | Pattern::Placeholder => false,
            Pattern::Array(array) => array.elements.iter().any(Pattern::has_defaults),
            Pattern::Dict(dict) => dict
                .entries
                .iter()
                .any(|entry| entry.default.is_some() || entry.target.has_defaults()),
        }
    }
}

/// Array destructuring pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayPattern {
    elements: Vec<Pattern>,
    rest: Option<String>,
}

impl ArrayPattern {
    pub fn new(elements: Vec<Pattern>) -> Self {
        ArrayPattern {
            elements,
            rest: None,
        }
    }

    pub fn with_rest(elements: Vec<Pattern>, rest: impl Into<String>) -> Self {
        ArrayPattern {
            elements,
            rest: Some(rest.into()),
        }
    }

    /// Positional sub-patterns
    pub fn elements(&self) -> &[Pattern] {
        &self.elements
    }

    /// Rest name as written (may be `_`)
    pub fn rest(&self) -> Option<&str> {
        self.rest.as_deref()
    }

    /// Rest name that actually receives a binding
    pub fn rest_target(&self) -> Option<&str> {
        self.rest().filter(|name| *name != PLACEHOLDER)
    }
}

/// One `key: target = default` entry of a dictionary pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictEntry {
    pub key: String,
    pub target: Pattern,
    pub default: Option<Expr>,
}

impl DictEntry {
    /// `{key}`: bind the value under its own key name
    pub fn shorthand(key: impl Into<String>) -> Self {
        let key = key.into();
        DictEntry {
            target: Pattern::name(key.clone()),
            key,
            default: None,
        }
    }

    /// `{key: target}`: alias or nested pattern
    pub fn with_target(key: impl Into<String>, target: Pattern) -> Self {
        DictEntry {
            key: key.into(),
            target,
            default: None,
        }
    }

    /// Attach a default used when the key is absent
    pub fn or_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

/// Dictionary destructuring pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictPattern {
    entries: Vec<DictEntry>,
    rest: Option<String>,
}

impl DictPattern {
    pub fn new(entries: Vec<DictEntry>) -> Self {
        DictPattern {
            entries,
            rest: None,
        }
    }

    pub fn with_rest(entries: Vec<DictEntry>, rest: impl Into<String>) -> Self {
        DictPattern {
            entries,
            rest: Some(rest.into()),
        }
    }

    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    pub fn rest(&self) -> Option<&str> {
        self.rest.as_deref()
    }

    pub fn rest_target(&self) -> Option<&str> {
        self.rest().filter(|name| *name != PLACEHOLDER)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Name(name) => write!(f, "{name}"),
            Pattern::Placeholder => write!(f, "_"),
            Pattern::Array(array) => {
                write!(f, "[")?;
                for (i, element) in array.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                if let Some(rest) = &array.rest {
                    if !array.elements.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...{rest}")?;
                }
                write!(f, "]")
            }
            Pattern::Dict(dict) => {
                write!(f, "{{")?;
                for (i, entry) in dict.entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &entry.target {
                        Pattern::Name(name) if *name == entry.key => write!(f, "{}", entry.key)?,
                        target => write!(f, "{}: {}", entry.key, target)?,
                    }
                    if entry.default.is_some() {
                        write!(f, " = ...")?;
                    }
                }
                if let Some(rest) = &dict.rest {
                    if !dict.entries.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...{rest}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_name_is_placeholder() {
        assert_eq!(Pattern::name("_"), Pattern::Placeholder);
        assert_eq!(Pattern::name("x"), Pattern::Name("x".to_string()));
    }

    #[test]
    fn test_rest_is_trailing_field() {
        let p = ArrayPattern::with_rest(vec![Pattern::name("a")], "rest");
        assert_eq!(p.elements().len(), 1);
        assert_eq!(p.rest(), Some("rest"));
        assert_eq!(p.rest_target(), Some("rest"));
    }

    #[test]
    fn test_placeholder_rest_binds_nothing() {
        let p = ArrayPattern::with_rest(vec![], "_");
        assert_eq!(p.rest(), Some("_"));
        assert_eq!(p.rest_target(), None);
    }

    #[test]
    fn test_has_defaults_looks_into_nested_patterns() {
        assert!(!Pattern::array(vec![Pattern::name("a")]).has_defaults());
        let nested = Pattern::array(vec![Pattern::dict(vec![
            DictEntry::shorthand("k").or_default(Expr::IntLit(1)),
        ])]);
        assert!(nested.has_defaults());
    }

    #[test]
    fn test_display() {
        let p = Pattern::array_with_rest(vec![Pattern::name("a"), Pattern::Placeholder], "rest");
        assert_eq!(p.to_string(), "[a, _, ...rest]");

        let d = Pattern::dict(vec![
            DictEntry::shorthand("a"),
            DictEntry::with_target("b", Pattern::name("c")).or_default(Expr::IntLit(1)),
        ]);
        assert_eq!(d.to_string(), "{a, b: c = ...}");
    }
}
