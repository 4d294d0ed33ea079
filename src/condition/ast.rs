//! Pairs, conditions and alternative sets

use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Comparison operators, normalized
///
/// `NG` (not greater) is stored as [`Comparator::Le`] and `NL` (not less) as
/// [`Comparator::Ge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Comparator {
    /// Equal (EQ, =)
    Eq,
    /// Not equal (NE, ¬=, ^=)
    Ne,
    /// Greater than (GT, >)
    Gt,
    /// Less than (LT, <)
    Lt,
    /// Greater than or equal (GE, >=, NL, ¬<, ^<)
    Ge,
    /// Less than or equal (LE, <=, NG, ¬>, ^>)
    Le,
}

impl Comparator {
    pub const ALL: [Comparator; 6] = [
        Comparator::Eq,
        Comparator::Ne,
        Comparator::Gt,
        Comparator::Lt,
        Comparator::Ge,
        Comparator::Le,
    ];

    /// Parse either spelling of an operator
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "EQ" | "=" => Some(Comparator::Eq),
            "NE" | "¬=" | "^=" => Some(Comparator::Ne),
            "GT" | ">" => Some(Comparator::Gt),
            "LT" | "<" => Some(Comparator::Lt),
            "GE" | ">=" | "NL" | "¬<" | "^<" => Some(Comparator::Ge),
            "LE" | "<=" | "NG" | "¬>" | "^>" => Some(Comparator::Le),
            _ => None,
        }
    }

    /// Logical opposite
    #[inline]
    pub fn negate(self) -> Self {
        match self {
            Comparator::Eq => Comparator::Ne,
            Comparator::Ne => Comparator::Eq,
            Comparator::Gt => Comparator::Le,
            Comparator::Le => Comparator::Gt,
            Comparator::Lt => Comparator::Ge,
            Comparator::Ge => Comparator::Lt,
        }
    }

    /// Alphabetic spelling (EQ, NE, ...)
    pub fn mnemonic(self) -> &'static str {
        match self {
            Comparator::Eq => "EQ",
            Comparator::Ne => "NE",
            Comparator::Gt => "GT",
            Comparator::Lt => "LT",
            Comparator::Ge => "GE",
            Comparator::Le => "LE",
        }
    }

    /// Symbolic spelling (=, ¬=, ...)
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "¬=",
            Comparator::Gt => ">",
            Comparator::Lt => "<",
            Comparator::Ge => ">=",
            Comparator::Le => "<=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One variable / comparator / value test, such as `&DSN EQ 'SYS1.*'`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pair {
    pub variable: String,
    pub comparator: Comparator,
    pub value: String,
}

impl Pair {
    pub fn new(
        variable: impl Into<String>,
        comparator: Comparator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            variable: variable.into(),
            comparator,
            value: value.into(),
        }
    }

    /// The same test with the comparator flipped
    #[inline]
    pub fn negate(&self) -> Self {
        Self {
            variable: self.variable.clone(),
            comparator: self.comparator.negate(),
            value: self.value.clone(),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable, self.comparator, self.value)
    }
}

/// Conjunction of pairs
///
/// Pairs keep their insertion order for display; equality ignores order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Condition {
    pairs: SmallVec<[Pair; 4]>,
}

/// Disjunction of conditions. Empty means "no constraint".
pub type Alternatives = Vec<Condition>;

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Condition holding exactly one pair
    pub fn from_pair(pair: Pair) -> Self {
        let mut condition = Self::new();
        condition.pairs.push(pair);
        condition
    }

    /// Add a pair unless an identical one is already present
    ///
    /// Returns `true` if the pair was added.
    pub fn insert(&mut self, pair: Pair) -> bool {
        if self.pairs.contains(&pair) {
            return false;
        }
        self.pairs.push(pair);
        true
    }

    /// Add every pair of `other` through [`Condition::insert`]
    pub fn merge(&mut self, other: &Condition) {
        for pair in &other.pairs {
            self.insert(pair.clone());
        }
    }

    /// Add a pair without the duplicate check
    ///
    /// Callers building a condition this way should finish with [`Condition::dedup`].
    pub fn push(&mut self, pair: Pair) {
        self.pairs.push(pair);
    }

    /// Remove repeated pairs, keeping the first occurrence
    pub fn dedup(&mut self) {
        let mut kept: SmallVec<[Pair; 4]> = SmallVec::with_capacity(self.pairs.len());
        for pair in self.pairs.drain(..) {
            if !kept.contains(&pair) {
                kept.push(pair);
            }
        }
        self.pairs = kept;
    }

    #[inline]
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn contains(&self, pair: &Pair) -> bool {
        self.pairs.contains(pair)
    }

    /// Pairs testing the given variable, in insertion order
    pub fn pairs_for<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = &'a Pair> + 'a {
        self.pairs.iter().filter(move |p| p.variable == variable)
    }

    /// De Morgan: NOT(p1 AND p2 ...) = NOT p1 OR NOT p2 ...
    ///
    /// Each negated pair becomes its own single-pair condition.
    pub fn negate(&self) -> Alternatives {
        self.pairs
            .iter()
            .map(|p| Condition::from_pair(p.negate()))
            .collect()
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.pairs.iter().all(|p| other.contains(p)) && other.pairs.iter().all(|p| self.contains(p))
    }
}

impl Eq for Condition {}

impl FromIterator<Pair> for Condition {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        let mut condition = Condition::new();
        for pair in iter {
            condition.insert(pair);
        }
        condition
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{}", pair)?;
        }
        Ok(())
    }
}
