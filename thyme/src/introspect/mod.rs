//! Metadata registry
//!
//! Documentation records for every builtin and method, kept in tables beside
//! (not inside) the executable ones. Both sides share one namespace: a bare
//! name for builtins (`inspect`) and `type.method` for methods (`array.take`).
//! [`Registry::load`] checks that the two sides agree exactly; the global
//! [`registry`] treats any disagreement as fatal.

mod render;
mod tables;

pub use render::{builtins_value, describe_type, describe_value, inspect_value, record_value};
pub use tables::{BUILTIN_DOCS, METHOD_DOCS};

use crate::interp::{TypeTag, builtins, methods};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Accepted argument count of a callable
///
/// Notation: `"2"` exact, `"0-1"` inclusive range, `"1+"` open lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(lo) => count >= lo,
        }
    }

    /// Arity implied by a parameter list: a trailing `?` marks an optional
    /// parameter, a trailing `...` a variadic one.
    pub fn from_params(params: &[&str]) -> Result<Arity, String> {
        let mut required = 0;
        let mut optional = 0;
        let mut variadic = false;
        for (i, param) in params.iter().enumerate() {
            if variadic {
                return Err(format!("`{param}` follows a variadic parameter"));
            }
            if param.ends_with("...") {
                if i + 1 != params.len() {
                    return Err(format!("variadic `{param}` must be last"));
                }
                variadic = true;
            } else if param.ends_with('?') {
                optional += 1;
            } else if optional > 0 {
                return Err(format!("required `{param}` follows an optional parameter"));
            } else {
                required += 1;
            }
            if param_name(param).is_empty() {
                return Err("empty parameter name".to_string());
            }
        }
        Ok(match (variadic, optional) {
            (true, _) => Arity::AtLeast(required),
            (false, 0) => Arity::Exact(required),
            (false, n) => Arity::Range(required, required + n),
        })
    }

    pub fn consistent_with(self, params: &[&str]) -> bool {
        Arity::from_params(params).is_ok_and(|implied| implied == self)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Range(lo, hi) => write!(f, "{lo}-{hi}"),
            Arity::AtLeast(lo) => write!(f, "{lo}+"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid arity notation `{0}`")]
pub struct ArityParseError(pub String);

impl FromStr for Arity {
    type Err = ArityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ArityParseError(s.to_string());
        let count = |part: &str| part.parse::<usize>().map_err(|_| invalid());

        if let Some(lo) = s.strip_suffix('+') {
            return Ok(Arity::AtLeast(count(lo)?));
        }
        if let Some((lo, hi)) = s.split_once('-') {
            let (lo, hi) = (count(lo)?, count(hi)?);
            return match lo.cmp(&hi) {
                std::cmp::Ordering::Less => Ok(Arity::Range(lo, hi)),
                std::cmp::Ordering::Equal => Ok(Arity::Exact(lo)),
                std::cmp::Ordering::Greater => Err(invalid()),
            };
        }
        Ok(Arity::Exact(count(s)?))
    }
}

impl Serialize for Arity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parameter name without its `?` / `...` marker
pub fn param_name(param: &str) -> &str {
    param.trim_end_matches("...").trim_end_matches('?')
}

/// Documentation record of a global builtin, as written in the tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinInfo {
    pub name: &'static str,
    pub arity: &'static str,
    pub description: &'static str,
    pub params: &'static [&'static str],
    pub category: &'static str,
}

/// Documentation record of a method, as written in the tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodInfo {
    pub receiver: TypeTag,
    pub name: &'static str,
    pub arity: &'static str,
    pub description: &'static str,
    pub params: &'static [&'static str],
    pub category: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallableKind {
    Builtin,
    Method,
}

impl CallableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CallableKind::Builtin => "builtin",
            CallableKind::Method => "method",
        }
    }
}

/// Checked record served by `describe` / `inspect`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallableInfo {
    #[serde(rename = "type")]
    pub kind: CallableKind,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<TypeTag>,
    pub arity: Arity,
    pub description: &'static str,
    pub params: &'static [&'static str],
    pub category: &'static str,
}

impl CallableInfo {
    /// Registry key: `name` or `type.name`
    pub fn key(&self) -> String {
        match self.receiver {
            Some(tag) => method_key(tag, self.name),
            None => self.name.to_string(),
        }
    }

    /// `name(p1, p2?)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }

    /// `name(p1, p2?) - description`
    pub fn describe_line(&self) -> String {
        format!("{} - {}", self.signature(), self.description)
    }
}

pub fn method_key(receiver: TypeTag, name: &str) -> String {
    format!("{}.{}", receiver.name(), name)
}

/// Registry startup failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryInconsistency {
    #[error("`{0}` is executable but has no metadata record")]
    MissingMetadata(String),

    #[error("metadata record `{0}` has no executable implementation")]
    OrphanMetadata(String),

    #[error("`{0}` is registered more than once")]
    Duplicate(String),

    #[error("`{key}`: {source}")]
    BadArity {
        key: String,
        #[source]
        source: ArityParseError,
    },

    #[error("`{key}` is documented with arity {documented} but executes with arity {executable}")]
    ArityDisagreement {
        key: String,
        documented: Arity,
        executable: Arity,
    },

    #[error("`{key}` params ({params}) do not match arity {arity}")]
    ParamMismatch {
        key: String,
        arity: Arity,
        params: String,
    },

    #[error("type `{0}` has no method table")]
    MissingMethodTable(TypeTag),
}

/// Executable side of the namespace: every callable key with its arity
#[derive(Debug, Clone, Default)]
pub struct ExecutableIndex {
    pub callables: Vec<(String, Arity)>,
    pub method_tables: Vec<TypeTag>,
}

impl ExecutableIndex {
    /// Index of the builtin and method tables compiled into this crate
    pub fn current() -> Self {
        let mut index = ExecutableIndex::default();
        for entry in builtins::BUILTINS {
            index.callables.push((entry.name.to_string(), entry.arity));
        }
        for (tag, entries) in methods::TABLES {
            index.method_tables.push(*tag);
            for entry in *entries {
                index.callables.push((method_key(*tag, entry.name), entry.arity));
            }
        }
        index
    }
}

/// Immutable, checked view of all documentation records
#[derive(Debug)]
pub struct Registry {
    records: HashMap<String, CallableInfo>,
    builtins: Vec<CallableInfo>,
    methods: BTreeMap<TypeTag, Vec<CallableInfo>>,
}

impl Registry {
    /// Check the compiled-in tables against each other
    pub fn load() -> Result<Self, RegistryInconsistency> {
        Self::build(BUILTIN_DOCS, METHOD_DOCS, &ExecutableIndex::current())
    }

    pub fn build(
        builtin_docs: &'static [BuiltinInfo],
        method_docs: &'static [MethodInfo],
        executable: &ExecutableIndex,
    ) -> Result<Self, RegistryInconsistency> {
        let documented = builtin_docs
            .iter()
            .map(|doc| {
                resolve(
                    CallableKind::Builtin,
                    None,
                    doc.name,
                    doc.arity,
                    doc.description,
                    doc.params,
                    doc.category,
                )
            })
            .chain(method_docs.iter().map(|doc| {
                resolve(
                    CallableKind::Method,
                    Some(doc.receiver),
                    doc.name,
                    doc.arity,
                    doc.description,
                    doc.params,
                    doc.category,
                )
            }));

        let mut records = HashMap::new();
        for info in documented {
            let info = info?;
            let key = info.key();
            if records.insert(key.clone(), info).is_some() {
                return Err(RegistryInconsistency::Duplicate(key));
            }
        }

        let mut seen = HashSet::new();
        for (key, arity) in &executable.callables {
            if !seen.insert(key.as_str()) {
                return Err(RegistryInconsistency::Duplicate(key.clone()));
            }
            let info = records
                .get(key)
                .ok_or_else(|| RegistryInconsistency::MissingMetadata(key.clone()))?;
            if info.arity != *arity {
                return Err(RegistryInconsistency::ArityDisagreement {
                    key: key.clone(),
                    documented: info.arity,
                    executable: *arity,
                });
            }
        }

        let mut orphans: Vec<&String> = records.keys().filter(|k| !seen.contains(k.as_str())).collect();
        orphans.sort();
        if let Some(orphan) = orphans.first() {
            return Err(RegistryInconsistency::OrphanMetadata((*orphan).clone()));
        }

        for tag in TypeTag::ALL {
            if !executable.method_tables.contains(&tag) {
                return Err(RegistryInconsistency::MissingMethodTable(tag));
            }
        }

        let mut builtins: Vec<CallableInfo> = records
            .values()
            .filter(|info| info.kind == CallableKind::Builtin)
            .copied()
            .collect();
        builtins.sort_by_key(|info| info.name);

        let mut methods: BTreeMap<TypeTag, Vec<CallableInfo>> = BTreeMap::new();
        for info in records.values() {
            if let Some(tag) = info.receiver {
                methods.entry(tag).or_default().push(*info);
            }
        }
        for list in methods.values_mut() {
            list.sort_by_key(|info| info.name);
        }

        Ok(Registry {
            records,
            builtins,
            methods,
        })
    }

    /// Look up `inspect` or `array.take`
    pub fn describe(&self, key: &str) -> Option<&CallableInfo> {
        self.records.get(key)
    }

    pub fn builtin(&self, name: &str) -> Option<&CallableInfo> {
        self.records
            .get(name)
            .filter(|info| info.kind == CallableKind::Builtin)
    }

    pub fn method(&self, receiver: TypeTag, name: &str) -> Option<&CallableInfo> {
        self.records.get(&method_key(receiver, name))
    }

    /// Builtins sorted by name
    pub fn builtins(&self) -> &[CallableInfo] {
        &self.builtins
    }

    /// Methods of one type sorted by name
    pub fn methods_of(&self, receiver: TypeTag) -> &[CallableInfo] {
        self.methods.get(&receiver).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Builtin categories, sorted and deduplicated
    pub fn categories(&self) -> Vec<&'static str> {
        let mut categories: Vec<&'static str> = self.builtins.iter().map(|info| info.category).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn resolve(
    kind: CallableKind,
    receiver: Option<TypeTag>,
    name: &'static str,
    notation: &'static str,
    description: &'static str,
    params: &'static [&'static str],
    category: &'static str,
) -> Result<CallableInfo, RegistryInconsistency> {
    let key = match receiver {
        Some(tag) => method_key(tag, name),
        None => name.to_string(),
    };
    let arity: Arity = notation
        .parse()
        .map_err(|source| RegistryInconsistency::BadArity {
            key: key.clone(),
            source,
        })?;
    if !arity.consistent_with(params) {
        return Err(RegistryInconsistency::ParamMismatch {
            key,
            arity,
            params: params.join(", "),
        });
    }
    Ok(CallableInfo {
        kind,
        name,
        receiver,
        arity,
        description,
        params,
        category,
    })
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| match Registry::load() {
    Ok(registry) => {
        tracing::debug!(records = registry.len(), "metadata registry loaded");
        registry
    }
    Err(err) => panic!("metadata registry is inconsistent: {err}"),
});

/// Process-wide registry. Panics on first use if the tables disagree.
pub fn registry() -> &'static Registry {
    &REGISTRY
}
