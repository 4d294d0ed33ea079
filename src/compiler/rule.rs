//! Compilation output: rules, filter lists and the decision table

use serde::Serialize;
use std::fmt;

use crate::condition::{Alternatives, Condition, VariableRegistry};
use crate::error::Anomaly;

/// The four kinds of ACS routine, named after the variable they set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoutineKind {
    #[serde(rename = "STORCLAS")]
    StorageClass,
    #[serde(rename = "DATACLAS")]
    DataClass,
    #[serde(rename = "MGMTCLAS")]
    ManagementClass,
    #[serde(rename = "STORGRP")]
    StorageGroup,
}

impl RoutineKind {
    /// Parse a routine or read/write variable name, with or without its `&`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.strip_prefix('&').unwrap_or(name) {
            "STORCLAS" => Some(RoutineKind::StorageClass),
            "DATACLAS" => Some(RoutineKind::DataClass),
            "MGMTCLAS" => Some(RoutineKind::ManagementClass),
            "STORGRP" => Some(RoutineKind::StorageGroup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutineKind::StorageClass => "STORCLAS",
            RoutineKind::DataClass => "DATACLAS",
            RoutineKind::ManagementClass => "MGMTCLAS",
            RoutineKind::StorageGroup => "STORGRP",
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One SET statement and the conditions under which it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Value assigned by the SET
    pub target: String,
    /// OR of the conditions guarding the SET; empty when unconditional
    pub alternatives: Alternatives,
    /// Position among all SET statements, starting at 1
    pub sequence: u32,
    /// Source line of the SET
    pub line: usize,
    /// An EXIT followed this SET
    pub has_exit: bool,
}

impl Rule {
    /// Conditions to print one row each
    ///
    /// An unconditional rule has no alternatives, so it prints no rows.
    pub fn rows(&self) -> impl Iterator<Item = &Condition> + '_ {
        self.alternatives.iter()
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.alternatives.len()
    }
}

/// A FILTLIST declaration, kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterList {
    pub name: String,
    pub include: String,
    pub exclude: String,
}

/// Everything extracted from one routine
#[derive(Debug, Clone, Default, Serialize)]
pub struct DecisionTable {
    /// Routine named on the PROC statement
    pub routine: Option<RoutineKind>,
    /// Tested variables, in column order
    pub variables: VariableRegistry,
    pub rules: Vec<Rule>,
    pub filter_lists: Vec<FilterList>,
    pub anomalies: Vec<Anomaly>,
}

impl DecisionTable {
    /// Routine name for the first header column; empty without a PROC
    pub fn routine_name(&self) -> &'static str {
        self.routine.map(|r| r.as_str()).unwrap_or("")
    }

    /// Number of output rows the rules expand to
    pub fn row_count(&self) -> usize {
        self.rules.iter().map(Rule::row_count).sum()
    }
}
