//! Variable registry - fixes the column order of the decision table

use ahash::AHashSet;
use serde::Serialize;

/// Insertion-ordered, duplicate-free list of tested variables
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct VariableRegistry {
    order: Vec<String>,
    #[serde(skip)]
    seen: AHashSet<String>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable; returns `false` if it was already known
    pub fn add(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string());
        self.order.push(name.to_string());
        true
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Column position of a variable
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|v| v == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }
}
