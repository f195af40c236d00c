use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::ir::Primitive;

/// Primitive kind → extraction method on a generic document node.
///
/// Only method names live here; generated code calls them as `node.Method()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorTable {
    by_kind: BTreeMap<Primitive, String>,
    array_view: String,
}

impl Default for AccessorTable {
    fn default() -> Self {
        Self::rapidjson()
    }
}

impl AccessorTable {
    /// Table with no scalar accessors registered.
    pub fn empty(array_view: impl Into<String>) -> Self {
        Self { by_kind: BTreeMap::new(), array_view: array_view.into() }
    }

    /// `rapidjson::Value` accessors.
    pub fn rapidjson() -> Self {
        Self::empty("GetArray")
            .with(Primitive::Bool, "GetBool")
            .with(Primitive::Int, "GetInt")
            .with(Primitive::Float, "GetFloat")
            .with(Primitive::String, "GetString")
    }

    pub fn with(mut self, kind: Primitive, method: impl Into<String>) -> Self {
        self.set(kind, method);
        self
    }

    pub fn set(&mut self, kind: Primitive, method: impl Into<String>) {
        self.by_kind.insert(kind, method.into());
    }

    pub fn remove(&mut self, kind: Primitive) -> Option<String> {
        self.by_kind.remove(&kind)
    }

    pub fn get(&self, kind: Primitive) -> Option<&str> {
        self.by_kind.get(&kind).map(String::as_str)
    }

    pub fn array_view(&self) -> &str {
        &self.array_view
    }

    pub fn apply(&mut self, overrides: &[AccessorOverride]) {
        for o in overrides {
            self.set(o.kind, o.method.clone());
        }
    }
}

/// `KIND=METHOD`, e.g. `int=GetInt64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorOverride {
    pub kind: Primitive,
    pub method: String,
}

impl FromStr for AccessorOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, method) = s
            .split_once('=')
            .ok_or_else(|| format!("expected KIND=METHOD, got `{s}`"))?;
        let kind = kind.trim().parse::<Primitive>()?;
        let method = method.trim();
        let is_ident = method.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && method.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_ident {
            return Err(format!("accessor `{method}` is not a valid method name"));
        }
        Ok(Self { kind, method: method.to_string() })
    }
}

impl fmt::Display for AccessorOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind, self.method)
    }
}
