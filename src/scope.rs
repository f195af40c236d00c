//! Unique type-id allocation over nested scopes.
use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{GenError, Result};
use crate::ir::FieldPath;

/// Per-run naming state: the open scope path and every type-id handed out so far.
#[derive(Debug, Default)]
pub struct NamingContext {
    scopes: Vec<String>,
    reserved: BTreeSet<String>,
}

impl NamingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self, scope: impl Into<String>) {
        self.scopes.push(scope.into());
    }

    pub fn pop_scope(&mut self) -> Option<String> {
        self.scopes.pop()
    }

    /// Innermost scope last.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn is_reserved(&self, type_id: &str) -> bool {
        self.reserved.contains(type_id)
    }

    /// Claims `type_id` outright; false if it was already taken.
    pub fn reserve(&mut self, type_id: impl Into<String>) -> bool {
        self.reserved.insert(type_id.into())
    }

    /// Picks the shortest innermost-first concatenation of the open scopes
    /// that is still free and reserves it.
    ///
    /// With scopes `[Root, Work, Addr]` the candidates are `Addr`, `WorkAddr`,
    /// `RootWorkAddr`. Running out of candidates means the same nesting path
    /// was visited twice and is reported as a [`GenError::Generation`].
    pub fn allocate(&mut self, path: &FieldPath) -> Result<String> {
        let mut candidate = String::new();
        let mut tried = Vec::with_capacity(self.scopes.len());
        for scope in self.scopes.iter().rev() {
            candidate.insert_str(0, scope);
            if !self.is_reserved(&candidate) {
                debug!(%path, type_id = %candidate, "allocated type name");
                self.reserved.insert(candidate.clone());
                return Ok(candidate);
            }
            tried.push(candidate.clone());
        }
        Err(GenError::Generation {
            path: path.clone(),
            message: if tried.is_empty() {
                "no open scope to derive a type name from".to_string()
            } else {
                format!("every scope concatenation is already reserved: {}", tried.join(", "))
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(scopes: &[&str]) -> NamingContext {
        let mut ctx = NamingContext::new();
        for scope in scopes {
            ctx.push_scope(*scope);
        }
        ctx
    }

    #[test]
    fn innermost_scope_wins_when_free() {
        let mut ctx = ctx_with(&["Root", "Home", "Addr"]);
        assert_eq!(ctx.allocate(&FieldPath::root()).unwrap(), "Addr");
        assert!(ctx.is_reserved("Addr"));
    }

    #[test]
    fn extends_outward_one_scope_at_a_time() {
        let mut ctx = ctx_with(&["Root", "Home", "Addr"]);
        ctx.reserve("Addr");
        assert_eq!(ctx.allocate(&FieldPath::root()).unwrap(), "HomeAddr");
        assert_eq!(ctx.allocate(&FieldPath::root()).unwrap(), "RootHomeAddr");
    }

    #[test]
    fn exhaustion_is_a_generation_error() {
        let mut ctx = ctx_with(&["Root", "A"]);
        ctx.reserve("A");
        ctx.reserve("RootA");
        let path: FieldPath = ["a"].into_iter().collect();
        let err = ctx.allocate(&path).unwrap_err();
        match err {
            GenError::Generation { path: p, message } => {
                assert_eq!(p, path);
                assert!(message.contains("A, RootA"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_scope_stack_cannot_allocate() {
        let mut ctx = NamingContext::new();
        assert!(matches!(
            ctx.allocate(&FieldPath::root()),
            Err(GenError::Generation { .. })
        ));
    }

    #[test]
    fn scopes_push_and_pop() {
        let mut ctx = ctx_with(&["Root"]);
        ctx.push_scope("User");
        assert_eq!(ctx.scopes(), ["Root", "User"]);
        assert_eq!(ctx.pop_scope().as_deref(), Some("User"));
        assert_eq!(ctx.scopes(), ["Root"]);
    }
}
