//! Scope stack of active alternative sets

use crate::condition::{flatten_with, Alternatives, CombineMode};

/// Identifies one push onto a [`ScopeStack`]
///
/// Handles are not `Clone`, so each push can be popped at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct ScopeHandle {
    serial: u64,
}

#[derive(Debug)]
struct Scope {
    serial: u64,
    alternatives: Alternatives,
}

/// LIFO of the alternative sets guarding the statement being compiled
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    next_serial: u64,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope guarded by `alternatives`
    pub fn push(&mut self, alternatives: Alternatives) -> ScopeHandle {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.scopes.push(Scope {
            serial,
            alternatives,
        });
        ScopeHandle { serial }
    }

    /// Close the top scope, returning its alternatives
    ///
    /// Returns `None`, leaving the stack untouched, if `handle` is not the
    /// handle of the top scope.
    pub fn pop(&mut self, handle: ScopeHandle) -> Option<Alternatives> {
        if self.scopes.last().map(|top| top.serial) != Some(handle.serial) {
            return None;
        }
        self.scopes.pop().map(|scope| scope.alternatives)
    }

    /// AND every open scope together, bottom to top
    pub fn flatten(&self, mode: CombineMode) -> Alternatives {
        flatten_with(mode, self.scopes.iter().map(|s| s.alternatives.as_slice()))
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
