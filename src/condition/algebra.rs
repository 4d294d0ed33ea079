//! AND / NOT over alternative sets
//!
//! An alternative set is an OR of conditions, each condition an AND of pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::condition::ast::{Alternatives, Condition};
use crate::error::AcsError;

/// How two non-empty alternative sets are ANDed together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Each left condition absorbs every pair of the right set.
    /// One output condition per left condition.
    #[default]
    Merge,
    /// Full distribution of AND over OR, one output condition per
    /// (left, right) combination.
    #[serde(alias = "cartesian")]
    Distribute,
}

impl CombineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombineMode::Merge => "merge",
            CombineMode::Distribute => "distribute",
        }
    }
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CombineMode {
    type Err = AcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(CombineMode::Merge),
            "distribute" | "cartesian" => Ok(CombineMode::Distribute),
            _ => Err(AcsError::InvalidConfig(format!(
                "unknown combine mode '{s}', expected one of: merge, distribute"
            ))),
        }
    }
}

/// AND two alternative sets using [`CombineMode::Merge`]
#[inline]
pub fn combine(left: &[Condition], right: &[Condition]) -> Alternatives {
    combine_with(CombineMode::Merge, left, right)
}

/// AND two alternative sets
///
/// An empty side means "no constraint" and the other side is returned as is.
pub fn combine_with(mode: CombineMode, left: &[Condition], right: &[Condition]) -> Alternatives {
    if left.is_empty() {
        return right.to_vec();
    }
    if right.is_empty() {
        return left.to_vec();
    }

    match mode {
        CombineMode::Merge => left
            .iter()
            .map(|l| {
                let mut merged = Condition::new();
                for r in right {
                    merged.merge(l);
                    merged.merge(r);
                }
                merged
            })
            .collect(),
        CombineMode::Distribute => {
            let mut out = Vec::with_capacity(left.len() * right.len());
            for l in left {
                for r in right {
                    let mut merged = l.clone();
                    merged.merge(r);
                    out.push(merged);
                }
            }
            out
        }
    }
}

/// NOT of an alternative set using [`CombineMode::Merge`]
#[inline]
pub fn negate(alternatives: &[Condition]) -> Alternatives {
    negate_with(CombineMode::Merge, alternatives)
}

/// NOT of an alternative set
///
/// NOT(C1 OR C2 ...) = NOT C1 AND NOT C2 ..., where each NOT Ci is itself the
/// OR of its negated pairs.
pub fn negate_with(mode: CombineMode, alternatives: &[Condition]) -> Alternatives {
    let mut acc = Alternatives::new();
    for condition in alternatives {
        acc = combine_with(mode, &condition.negate(), &acc);
    }
    acc
}

/// AND every entry together, visiting each once in order
pub fn flatten_with<'a, I>(mode: CombineMode, entries: I) -> Alternatives
where
    I: IntoIterator<Item = &'a [Condition]>,
{
    let mut acc = Alternatives::new();
    for entry in entries {
        acc = combine_with(mode, entry, &acc);
    }
    acc
}
