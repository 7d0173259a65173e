//! Lexical scopes over a function's binding table.

use std::collections::HashMap;

use crate::ir::binding::{BindingId, BindingKind, BindingTable};

/// A stack of frames mapping source names to bindings.
///
/// Frames only hold names; the bindings themselves live in the function's
/// [`BindingTable`], so a scope can be dropped and a fresh one opened over
/// the same table (one per clause) without losing any binding.
#[derive(Debug)]
pub struct Scope<'t> {
    table: &'t mut BindingTable,
    frames: Vec<HashMap<String, BindingId>>,
}

impl<'t> Scope<'t> {
    /// An empty scope: nothing resolves.
    pub fn new(table: &'t mut BindingTable) -> Self {
        Self {
            table,
            frames: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Create a binding and make `name` refer to it in the innermost frame.
    pub fn declare(&mut self, name: &str, kind: BindingKind) -> BindingId {
        let id = self.table.add(name, kind);
        self.bring_into_scope(name, id);
        id
    }

    /// Make an existing binding visible under `name`.
    pub fn bring_into_scope(&mut self, name: &str, id: BindingId) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), id);
        }
    }

    pub fn resolve(&self, name: &str) -> Option<BindingId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }
}

/// `_` and `_name` never bind.
pub fn is_wildcard_name(name: &str) -> bool {
    name.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_frames_shadow_and_unwind() {
        let mut table = BindingTable::new();
        let mut scope = Scope::new(&mut table);
        let outer = scope.declare("x", BindingKind::Param(0));
        scope.push();
        let inner = scope.declare("x", BindingKind::Local);
        assert_eq!(scope.resolve("x"), Some(inner));
        scope.pop();
        assert_eq!(scope.resolve("x"), Some(outer));
        assert_eq!(scope.resolve("y"), None);
        drop(scope);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_fresh_scope_sees_nothing() {
        let mut table = BindingTable::new();
        let id = table.add("a", BindingKind::Param(0));
        let mut scope = Scope::new(&mut table);
        assert_eq!(scope.resolve("a"), None);
        scope.bring_into_scope("a", id);
        assert_eq!(scope.resolve("a"), Some(id));
    }

    #[test]
    fn test_wildcards() {
        assert!(is_wildcard_name("_"));
        assert!(is_wildcard_name("_ignored"));
        assert!(!is_wildcard_name("x_"));
    }
}
