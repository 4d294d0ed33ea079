//! Condition expression parser
//!
//! Grammar, right-recursive with no operator precedence:
//!
//! ```text
//! condition := ( '(' condition ')' | pair ) [ ('AND' | '&&') condition | ('OR' | '|') condition ]
//! pair      := operand comparator operand
//! ```

use tracing::{debug, warn};

use crate::condition::algebra::{combine_with, CombineMode};
use crate::condition::ast::{Alternatives, Comparator, Condition, Pair};
use crate::condition::registry::VariableRegistry;
use crate::error::{AcsError, Anomaly, AnomalyKind, Result};
use crate::token::{Token, Tokenizer};

/// Parses condition expressions straight off the shared token stream
///
/// Borrowing the compiler's state keeps a single owner for the tokenizer,
/// the registry and the anomaly list.
pub struct ConditionParser<'p, 's> {
    tokens: &'p mut Tokenizer<'s>,
    registry: &'p mut VariableRegistry,
    anomalies: &'p mut Vec<Anomaly>,
    mode: CombineMode,
}

/// A comparison operand and whether it is a variable
struct Operand {
    text: String,
    is_variable: bool,
}

impl<'p, 's> ConditionParser<'p, 's> {
    pub fn new(
        tokens: &'p mut Tokenizer<'s>,
        registry: &'p mut VariableRegistry,
        anomalies: &'p mut Vec<Anomaly>,
        mode: CombineMode,
    ) -> Self {
        Self {
            tokens,
            registry,
            anomalies,
            mode,
        }
    }

    /// Parse one condition expression into an alternative set
    pub fn parse_condition(&mut self) -> Result<Alternatives> {
        let token = self.tokens.next_token();
        let mut alternatives = match token {
            Token::Punct('(') => {
                let inner = self.parse_condition()?;
                self.expect_punct(')', "closing parenthesis")?;
                inner
            }
            Token::Punct(')') => {
                return Err(AcsError::MissingToken {
                    expected: "condition",
                    found: ")".to_string(),
                    line: self.tokens.line(),
                })
            }
            other => {
                self.tokens.push_back(other);
                vec![Condition::from_pair(self.parse_pair()?)]
            }
        };

        let connective = self.tokens.next_token();
        if connective.is_word("AND") || connective.is_word("&&") {
            let right = self.parse_condition()?;
            alternatives = combine_with(self.mode, &alternatives, &right);
        } else if connective.is_word("OR") || connective.is_punct('|') {
            alternatives.extend(self.parse_condition()?);
        } else {
            self.tokens.push_back(connective);
        }

        debug!(line = self.tokens.line(), alternatives = alternatives.len(), "parsed condition");
        Ok(alternatives)
    }

    /// Parse `operand comparator operand` into a pair and register its variable
    pub fn parse_pair(&mut self) -> Result<Pair> {
        let left = self.read_operand()?;
        let comparator = self.read_comparator()?;
        let right = self.read_operand()?;

        let pair = if left.is_variable {
            Pair::new(left.text, comparator, right.text)
        } else if right.is_variable {
            // Valid for FILTLIST names, but usually a value missing its '&'
            let anomaly = Anomaly {
                line: self.tokens.line(),
                kind: AnomalyKind::SwappedOperands {
                    left: left.text.clone(),
                    comparator: comparator.to_string(),
                    right: right.text.clone(),
                },
            };
            warn!("{}", anomaly);
            self.anomalies.push(anomaly);
            Pair::new(right.text, comparator, left.text)
        } else {
            return Err(AcsError::InvalidComparison {
                left: left.text,
                comparator: comparator.to_string(),
                right: right.text,
                line: self.tokens.line(),
            });
        };

        self.registry.add(&pair.variable);
        Ok(pair)
    }

    /// Read a variable with its optional `(n)` qualifier, e.g. `&DSN(3)`
    ///
    /// Returns `None`, with the token pushed back, if the next token is not a
    /// variable.
    pub fn read_variable(&mut self) -> Result<Option<String>> {
        let token = self.tokens.next_token();
        if !token.is_variable() {
            self.tokens.push_back(token);
            return Ok(None);
        }
        let mut text = token.text();

        let next = self.tokens.next_token();
        if next.is_punct('(') {
            let qualifier = self.tokens.next_token();
            if qualifier == Token::End {
                return Err(self.missing("variable qualifier", &qualifier));
            }
            self.expect_punct(')', "closing parenthesis")?;
            text.push('(');
            text.push_str(&qualifier.text());
            text.push(')');
        } else {
            self.tokens.push_back(next);
        }
        Ok(Some(text))
    }

    /// Read a comparator, joining two-character symbolic forms
    pub fn read_comparator(&mut self) -> Result<Comparator> {
        let token = self.tokens.next_token();
        let mut text = token.text();

        if let Token::Punct('>' | '<' | '^' | '¬') = token {
            let next = self.tokens.next_token();
            match next {
                Token::Punct(c @ ('>' | '<' | '=')) => text.push(c),
                other => self.tokens.push_back(other),
            }
        }

        Comparator::parse(&text).ok_or_else(|| AcsError::InvalidComparator {
            found: text,
            line: self.tokens.line(),
        })
    }

    fn read_operand(&mut self) -> Result<Operand> {
        if let Some(text) = self.read_variable()? {
            return Ok(Operand {
                text,
                is_variable: true,
            });
        }
        let token = self.tokens.next_token();
        if token == Token::End {
            return Err(self.missing("comparison operand", &token));
        }
        Ok(Operand {
            text: token.text(),
            is_variable: false,
        })
    }

    fn expect_punct(&mut self, c: char, expected: &'static str) -> Result<()> {
        let token = self.tokens.next_token();
        if token.is_punct(c) {
            Ok(())
        } else {
            Err(self.missing(expected, &token))
        }
    }

    fn missing(&self, expected: &'static str, found: &Token) -> AcsError {
        AcsError::MissingToken {
            expected,
            found: found.text(),
            line: self.tokens.line(),
        }
    }
}
