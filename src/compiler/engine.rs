//! Main compilation engine
//!
//! Recursive descent over the statements of one routine. Every IF, ELSE,
//! WHEN and OTHERWISE body runs with its guard pushed on the scope stack;
//! a SET flattens the stack into the alternatives of a new [`Rule`].

use tracing::{debug, warn};

use crate::compiler::rule::{DecisionTable, FilterList, RoutineKind, Rule};
use crate::compiler::scope::{ScopeHandle, ScopeStack};
use crate::compiler::statement::{Flow, Keyword};
use crate::condition::{
    combine_with, negate_with, Alternatives, CombineMode, Comparator, Condition, ConditionParser,
    Pair, VariableRegistry,
};
use crate::error::{AcsError, Anomaly, AnomalyKind, Result};
use crate::token::{Token, Tokenizer};

/// Compile a routine into its decision table
pub fn compile(source: &str, mode: CombineMode) -> Result<DecisionTable> {
    Compiler::new(source, mode).compile()
}

/// Single-pass compiler over one routine
pub struct Compiler<'s> {
    tokens: Tokenizer<'s>,
    mode: CombineMode,
    scopes: ScopeStack,
    registry: VariableRegistry,
    anomalies: Vec<Anomaly>,
    rules: Vec<Rule>,
    filter_lists: Vec<FilterList>,
    routine: Option<RoutineKind>,
    /// Index of the most recent rule, the one an EXIT marks
    last_rule: Option<usize>,
    /// DO nesting
    depth: usize,
}

impl<'s> Compiler<'s> {
    pub fn new(source: &'s str, mode: CombineMode) -> Self {
        Self {
            tokens: Tokenizer::new(source),
            mode,
            scopes: ScopeStack::new(),
            registry: VariableRegistry::new(),
            anomalies: Vec::new(),
            rules: Vec::new(),
            filter_lists: Vec::new(),
            routine: None,
            last_rule: None,
            depth: 0,
        }
    }

    /// Run to the end of input
    pub fn compile(mut self) -> Result<DecisionTable> {
        while !self.tokens.is_exhausted() {
            self.drive_block()?;
            self.skip_stray_branch();
        }

        debug!(
            rules = self.rules.len(),
            variables = self.registry.len(),
            filter_lists = self.filter_lists.len(),
            anomalies = self.anomalies.len(),
            "compiled routine"
        );

        Ok(DecisionTable {
            routine: self.routine,
            variables: self.registry,
            rules: self.rules,
            filter_lists: self.filter_lists,
            anomalies: self.anomalies,
        })
    }

    // ========================================================================
    // Statement dispatch
    // ========================================================================

    /// Handle statements until one ends the block
    fn drive_block(&mut self) -> Result<()> {
        while self.statement()? == Flow::Continue {}
        Ok(())
    }

    /// Handle exactly one statement
    fn statement(&mut self) -> Result<Flow> {
        let token = self.tokens.next_token();
        let keyword = match Keyword::from_token(&token) {
            Some(keyword) => keyword,
            None if token == Token::End => return Ok(Flow::Stop),
            None => {
                self.report_unknown(&token);
                return Ok(Flow::Continue);
            }
        };

        debug!(
            line = self.tokens.line(),
            depth = self.depth,
            scopes = self.scopes.depth(),
            keyword = keyword.as_str(),
            "statement"
        );

        match keyword {
            Keyword::Proc => self.handle_proc()?,
            Keyword::Filtlist => self.handle_filtlist()?,
            Keyword::Set => self.handle_set()?,
            Keyword::Do => self.handle_do()?,
            Keyword::If => self.handle_if()?,
            Keyword::Select => self.handle_select()?,
            Keyword::Exit => self.handle_exit()?,
            Keyword::Write => self.handle_write(),
            Keyword::End => return Ok(Flow::Stop),
            Keyword::When | Keyword::Otherwise => {
                // Belongs to an enclosing SELECT
                self.tokens.push_back(token);
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    /// A WHEN or OTHERWISE with no SELECT around it would stop every block
    fn skip_stray_branch(&mut self) {
        let token = self.tokens.next_token();
        match Keyword::from_token(&token) {
            Some(Keyword::When | Keyword::Otherwise) => self.report_unknown(&token),
            _ => self.tokens.push_back(token),
        }
    }

    fn report_unknown(&mut self, token: &Token) {
        let anomaly = Anomaly {
            line: self.tokens.line(),
            kind: AnomalyKind::UnknownKeyword {
                keyword: token.text(),
            },
        };
        warn!("{}", anomaly);
        self.anomalies.push(anomaly);
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn handle_proc(&mut self) -> Result<()> {
        let mut token = self.tokens.next_token();
        if token.is_number() {
            token = self.tokens.next_token();
        }

        let name = token.text();
        let routine = RoutineKind::from_name(&name).ok_or_else(|| AcsError::InvalidRoutine {
            name,
            line: self.tokens.line(),
        })?;

        debug!(line = self.tokens.line(), routine = routine.as_str(), "PROC");
        self.routine = Some(routine);
        Ok(())
    }

    /// `FILTLIST name INCLUDE(...) EXCLUDE(...)`
    fn handle_filtlist(&mut self) -> Result<()> {
        let name = self.tokens.next_token();
        if name == Token::End {
            return Err(self.missing("FILTLIST name", &name));
        }
        let mut list = FilterList {
            name: name.text(),
            ..FilterList::default()
        };

        loop {
            let section = self.tokens.next_token();
            let include = if section.is_word("INCLUDE") {
                true
            } else if section.is_word("EXCLUDE") {
                false
            } else {
                self.tokens.push_back(section);
                break;
            };

            self.expect_punct('(', "( after INCLUDE or EXCLUDE")?;
            let text = self.read_until_close()?;
            if include {
                list.include = text;
            } else {
                list.exclude = text;
            }
        }

        debug!(line = self.tokens.line(), name = %list.name, "FILTLIST");
        self.filter_lists.push(list);
        Ok(())
    }

    /// Concatenate token text up to, not including, the next `)`
    fn read_until_close(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            let token = self.tokens.next_token();
            match &token {
                Token::Punct(')') => return Ok(text),
                Token::End => return Err(self.missing("closing parenthesis", &token)),
                other => text.push_str(&other.text()),
            }
        }
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    /// `SET &STORCLAS = value`
    fn handle_set(&mut self) -> Result<()> {
        let token = self.tokens.next_token();
        let target = token.text();
        let kind = token
            .is_variable()
            .then(|| RoutineKind::from_name(&target))
            .flatten()
            .ok_or_else(|| AcsError::InvalidTarget {
                found: target.clone(),
                line: self.tokens.line(),
            })?;

        if let Some(routine) = self.routine {
            if routine != kind {
                return Err(AcsError::TargetMismatch {
                    found: target,
                    routine: routine.as_str().to_string(),
                    line: self.tokens.line(),
                });
            }
        }

        let assign = self.tokens.next_token();
        if !(assign.is_punct('=') || assign.is_word("EQ")) {
            return Err(self.missing("= or EQ", &assign));
        }

        let value = self.tokens.next_token();
        if value == Token::End {
            return Err(self.missing("SET value", &value));
        }

        let rule = Rule {
            target: value.text(),
            alternatives: self.scopes.flatten(self.mode),
            sequence: self.rules.len() as u32 + 1,
            line: self.tokens.line(),
            has_exit: false,
        };
        debug!(
            line = rule.line,
            depth = self.depth,
            sequence = rule.sequence,
            alternatives = rule.alternatives.len(),
            "SET {}",
            rule.target
        );

        self.rules.push(rule);
        self.last_rule = Some(self.rules.len() - 1);
        Ok(())
    }

    /// `EXIT [CODE(n)]` marks the most recent rule
    fn handle_exit(&mut self) -> Result<()> {
        let line = self.tokens.line();
        let token = self.tokens.next_token();
        if token.is_word("CODE") {
            self.expect_punct('(', "( after CODE")?;
            let code = self.tokens.next_token();
            if code == Token::End {
                return Err(self.missing("exit code", &code));
            }
            self.expect_punct(')', "closing parenthesis")?;
            debug!(line = self.tokens.line(), code = %code, "EXIT CODE");
        } else {
            self.tokens.push_back(token);
        }

        let rule = self
            .last_rule
            .and_then(|index| self.rules.get_mut(index))
            .ok_or(AcsError::ExitWithoutRule { line })?;
        rule.has_exit = true;
        Ok(())
    }

    /// WRITE text is dropped: literals and variables up to the next other token
    fn handle_write(&mut self) {
        loop {
            let token = self.tokens.next_token();
            if !(token.is_literal() || token.is_variable()) {
                self.tokens.push_back(token);
                break;
            }
        }
    }

    // ========================================================================
    // Blocks and branches
    // ========================================================================

    fn handle_do(&mut self) -> Result<()> {
        let start = self.tokens.line();
        self.depth += 1;
        self.drive_block()?;
        self.depth -= 1;
        debug!(line = self.tokens.line(), depth = self.depth, "leaving DO from {}", start);
        Ok(())
    }

    /// `IF condition THEN statement [ELSE statement]`
    fn handle_if(&mut self) -> Result<()> {
        let start = self.tokens.line();
        let alternatives = self.parse_condition()?;
        let handle = self.scopes.push(alternatives);

        let then = self.tokens.next_token();
        if !then.is_word("THEN") {
            return Err(self.missing("THEN after IF", &then));
        }
        self.statement()?;
        let alternatives = self.pop_scope(handle, "IF")?;

        let next = self.tokens.next_token();
        if next.is_word("ELSE") {
            let handle = self.scopes.push(negate_with(self.mode, &alternatives));
            self.statement()?;
            self.pop_scope(handle, "ELSE")?;
        } else {
            self.tokens.push_back(next);
        }

        debug!(line = self.tokens.line(), depth = self.depth, "leaving IF from {}", start);
        Ok(())
    }

    /// `SELECT [(&VAR)] WHEN (...) ... [OTHERWISE ...] END`
    fn handle_select(&mut self) -> Result<()> {
        let start = self.tokens.line();
        let token = self.tokens.next_token();
        let subject = if token.is_punct('(') {
            let subject = self.read_select_subject()?;
            self.expect_punct(')', "closing parenthesis")?;
            Some(subject)
        } else {
            self.tokens.push_back(token);
            None
        };

        let mut branches: Vec<Alternatives> = Vec::new();
        let mut token = self.tokens.next_token();
        while token.is_word("WHEN") {
            self.expect_punct('(', "( after WHEN")?;
            let alternatives = match &subject {
                Some(variable) => self.read_when_values(variable)?,
                None => self.parse_condition()?,
            };
            self.expect_punct(')', "closing parenthesis on WHEN")?;

            let handle = self.scopes.push(alternatives);
            self.drive_block()?;
            branches.push(self.pop_scope(handle, "WHEN")?);

            token = self.tokens.next_token();
        }

        if token.is_word("OTHERWISE") {
            let mut otherwise = Alternatives::new();
            for branch in &branches {
                otherwise = combine_with(self.mode, &otherwise, &negate_with(self.mode, branch));
            }
            let handle = self.scopes.push(otherwise);
            self.drive_block()?;
            self.pop_scope(handle, "OTHERWISE")?;
        } else {
            // The last WHEN body consumed the END
            self.tokens.push_back(token);
        }

        debug!(
            line = self.tokens.line(),
            depth = self.depth,
            branches = branches.len(),
            "leaving SELECT from {}",
            start
        );
        Ok(())
    }

    fn read_select_subject(&mut self) -> Result<String> {
        if let Some(variable) = self.condition_parser().read_variable()? {
            return Ok(variable);
        }
        let found = self.tokens.next_token();
        Err(AcsError::InvalidSelect {
            found: found.text(),
            line: self.tokens.line(),
        })
    }

    /// `value[, value...]` of a WHEN under `SELECT (&VAR)`, one alternative each
    fn read_when_values(&mut self, variable: &str) -> Result<Alternatives> {
        let mut alternatives = Alternatives::new();
        loop {
            let value = self.tokens.next_token();
            if value == Token::End || value.is_punct(')') || value.is_punct(',') {
                return Err(self.missing("WHEN value", &value));
            }
            self.registry.add(variable);
            alternatives.push(Condition::from_pair(Pair::new(
                variable,
                Comparator::Eq,
                value.text(),
            )));

            let separator = self.tokens.next_token();
            if !separator.is_punct(',') {
                self.tokens.push_back(separator);
                return Ok(alternatives);
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn condition_parser(&mut self) -> ConditionParser<'_, 's> {
        ConditionParser::new(
            &mut self.tokens,
            &mut self.registry,
            &mut self.anomalies,
            self.mode,
        )
    }

    fn parse_condition(&mut self) -> Result<Alternatives> {
        self.condition_parser().parse_condition()
    }

    fn pop_scope(&mut self, handle: ScopeHandle, construct: &'static str) -> Result<Alternatives> {
        self.scopes.pop(handle).ok_or(AcsError::ScopeMismatch {
            construct,
            line: self.tokens.line(),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn single(var: &str, cmp: Comparator, val: &str) -> Condition {
        Condition::from_pair(Pair::new(var, cmp, val))
    }

    fn cond(pairs: &[(&str, Comparator, &str)]) -> Condition {
        pairs.iter().map(|(v, c, x)| Pair::new(*v, *c, *x)).collect()
    }

    fn compile_merge(source: &str) -> DecisionTable {
        compile(source, CombineMode::Merge).unwrap()
    }

    #[test]
    fn test_if_else() {
        let table = compile_merge(
            "PROC STORCLAS; IF &SIZE > 1000 THEN SET &STORCLAS = 'BIG'; \
             ELSE SET &STORCLAS = 'SMALL'; END;",
        );
        assert_eq!(table.routine, Some(RoutineKind::StorageClass));
        assert_eq!(table.rules.len(), 2);

        assert_eq!(table.rules[0].target, "'BIG'");
        assert_eq!(table.rules[0].sequence, 1);
        assert_eq!(
            table.rules[0].alternatives,
            vec![single("&SIZE", Comparator::Gt, "1000")]
        );

        assert_eq!(table.rules[1].target, "'SMALL'");
        assert_eq!(table.rules[1].sequence, 2);
        assert_eq!(
            table.rules[1].alternatives,
            vec![single("&SIZE", Comparator::Le, "1000")]
        );
        assert!(table.anomalies.is_empty());
    }

    #[test]
    fn test_select_with_subject() {
        let source = "\
PROC STORCLAS
SELECT (&DEPT)
  WHEN ('A') SET &STORCLAS = 'SCA'
  WHEN ('B') SET &STORCLAS = 'SCB'
  OTHERWISE SET &STORCLAS = 'SCX'
END
END
";
        let table = compile_merge(source);
        assert_eq!(table.rules.len(), 3);
        assert_eq!(table.rules[0].alternatives, vec![single("&DEPT", Comparator::Eq, "'A'")]);
        assert_eq!(table.rules[1].alternatives, vec![single("&DEPT", Comparator::Eq, "'B'")]);
        assert_eq!(
            table.rules[2].alternatives,
            vec![cond(&[
                ("&DEPT", Comparator::Ne, "'A'"),
                ("&DEPT", Comparator::Ne, "'B'"),
            ])]
        );
        assert_eq!(table.rules[2].line, 5);
        assert_eq!(table.variables.as_slice(), &["&DEPT"]);
    }

    #[test]
    fn test_select_without_subject() {
        let source = "\
PROC MGMTCLAS
SELECT
  WHEN (&DSN = SYS1.** | &HLQ = 'SYS2') SET &MGMTCLAS = 'SYSTEM'
  WHEN (&SIZE > 500) SET &MGMTCLAS = 'LARGE'
END
SET &MGMTCLAS = 'DEFAULT'
END
";
        let table = compile_merge(source);
        assert_eq!(table.rules.len(), 3);
        assert_eq!(
            table.rules[0].alternatives,
            vec![
                single("&DSN", Comparator::Eq, "SYS1.**"),
                single("&HLQ", Comparator::Eq, "'SYS2'"),
            ]
        );
        assert_eq!(table.rules[1].alternatives, vec![single("&SIZE", Comparator::Gt, "500")]);
        // Outside the SELECT again
        assert!(table.rules[2].alternatives.is_empty());
        assert_eq!(table.variables.as_slice(), &["&DSN", "&HLQ", "&SIZE"]);
    }

    #[test]
    fn test_when_value_list() {
        let source = "\
PROC STORGRP
SELECT (&UNIT)
  WHEN ('3390', '3380') SET &STORGRP = 'DASD'
  OTHERWISE SET &STORGRP = 'TAPE'
END
END
";
        let table = compile_merge(source);
        assert_eq!(
            table.rules[0].alternatives,
            vec![
                single("&UNIT", Comparator::Eq, "'3390'"),
                single("&UNIT", Comparator::Eq, "'3380'"),
            ]
        );
        assert_eq!(
            table.rules[1].alternatives,
            vec![cond(&[
                ("&UNIT", Comparator::Ne, "'3390'"),
                ("&UNIT", Comparator::Ne, "'3380'"),
            ])]
        );
    }

    #[test]
    fn test_nested_if_merges_scopes() {
        let table = compile_merge(
            "PROC DATACLAS IF (&DSORG = 'PS') THEN IF (&RECFM = 'FB') THEN SET &DATACLAS = 'SEQFB' END END",
        );
        assert_eq!(table.rules.len(), 1);
        assert_eq!(
            table.rules[0].alternatives,
            vec![cond(&[
                ("&DSORG", Comparator::Eq, "'PS'"),
                ("&RECFM", Comparator::Eq, "'FB'"),
            ])]
        );
    }

    #[test]
    fn test_do_block_under_if() {
        let source = "\
PROC STORCLAS
IF &DSN = PROD.** THEN
  DO
    SET &STORCLAS = 'PROD'
    EXIT
  END
SET &STORCLAS = 'TEST'
END
";
        let table = compile_merge(source);
        assert_eq!(table.rules.len(), 2);
        assert_eq!(table.rules[0].alternatives, vec![single("&DSN", Comparator::Eq, "PROD.**")]);
        assert!(table.rules[0].has_exit);
        assert!(table.rules[1].alternatives.is_empty());
        assert!(!table.rules[1].has_exit);
        assert_eq!(table.rules[1].sequence, 2);
    }

    #[test]
    fn test_select_inside_do_leaves_block_open() {
        let source = "\
PROC STORCLAS
IF &SIZE > 0 THEN DO
  SELECT (&DEPT)
    WHEN ('A') SET &STORCLAS = 'SCA'
    OTHERWISE SET &STORCLAS = 'SCX'
  END
  SET &STORCLAS = 'AFTER'
END
END
";
        let table = compile_merge(source);
        assert_eq!(table.rules.len(), 3);
        // Still under the IF after the SELECT closes
        assert_eq!(table.rules[2].target, "'AFTER'");
        assert_eq!(table.rules[2].alternatives, vec![single("&SIZE", Comparator::Gt, "0")]);
        assert_eq!(
            table.rules[1].alternatives,
            vec![cond(&[("&DEPT", Comparator::Ne, "'A'"), ("&SIZE", Comparator::Gt, "0")])]
        );
    }

    #[test]
    fn test_else_if_chain() {
        let source = "\
PROC STORCLAS
IF &SIZE > 1000 THEN SET &STORCLAS = 'BIG'
ELSE IF &SIZE > 10 THEN SET &STORCLAS = 'MID'
ELSE SET &STORCLAS = 'SMALL'
END
";
        let table = compile_merge(source);
        assert_eq!(table.rules.len(), 3);
        assert_eq!(
            table.rules[1].alternatives,
            vec![cond(&[("&SIZE", Comparator::Le, "1000"), ("&SIZE", Comparator::Gt, "10")])]
        );
        assert_eq!(
            table.rules[2].alternatives,
            vec![cond(&[("&SIZE", Comparator::Le, "1000"), ("&SIZE", Comparator::Le, "10")])]
        );
    }

    #[test]
    fn test_exit_code_marks_last_rule() {
        let table = compile_merge("PROC STORCLAS SET &STORCLAS = '' EXIT CODE(12) END");
        assert_eq!(table.rules.len(), 1);
        assert!(table.rules[0].has_exit);
        assert_eq!(table.rules[0].target, "''");
    }

    #[test]
    fn test_exit_before_set_is_fatal() {
        let err = compile("PROC STORCLAS\nEXIT\nEND", CombineMode::Merge).unwrap_err();
        assert!(matches!(err, AcsError::ExitWithoutRule { line: 2 }));
    }

    #[test]
    fn test_filtlist_is_recorded() {
        let source = "\
PROC STORCLAS
FILTLIST HLQLIST INCLUDE(SYS1.**, 'PROD.*') EXCLUDE(SYS1.TEST.*)
FILTLIST EMPTY
IF &DSN = &HLQLIST THEN SET &STORCLAS = 'SYS'
END
";
        let table = compile_merge(source);
        assert_eq!(
            table.filter_lists,
            vec![
                FilterList {
                    name: "HLQLIST".to_string(),
                    include: "SYS1.**,'PROD.*'".to_string(),
                    exclude: "SYS1.TEST.*".to_string(),
                },
                FilterList {
                    name: "EMPTY".to_string(),
                    include: String::new(),
                    exclude: String::new(),
                },
            ]
        );
        assert_eq!(table.rules[0].alternatives, vec![single("&DSN", Comparator::Eq, "&HLQLIST")]);
    }

    #[test]
    fn test_filtlist_without_paren_is_fatal() {
        let err = compile("FILTLIST X INCLUDE SYS1.**", CombineMode::Merge).unwrap_err();
        assert!(matches!(err, AcsError::MissingToken { .. }));
    }

    #[test]
    fn test_unterminated_filtlist_is_fatal() {
        let err = compile("FILTLIST X INCLUDE(SYS1.**", CombineMode::Merge).unwrap_err();
        assert!(matches!(err, AcsError::MissingToken { expected: "closing parenthesis", .. }));
    }

    #[test]
    fn test_write_is_skipped() {
        let source = "\
PROC STORCLAS
IF &SIZE = 0 THEN DO
  WRITE 'EMPTY DATA SET ' &DSN ' REJECTED'
  SET &STORCLAS = ''
  EXIT
END
END
";
        let table = compile_merge(source);
        assert_eq!(table.rules.len(), 1);
        assert!(table.anomalies.is_empty());
        assert!(table.rules[0].has_exit);
    }

    #[test]
    fn test_unknown_keyword_is_an_anomaly() {
        let table = compile_merge("PROC STORCLAS\nFOO\nSET &STORCLAS = 'X'\nEND");
        assert_eq!(table.rules.len(), 1);
        assert_eq!(
            table.anomalies,
            vec![Anomaly {
                line: 2,
                kind: AnomalyKind::UnknownKeyword {
                    keyword: "FOO".to_string()
                },
            }]
        );
    }

    #[test]
    fn test_stray_when_does_not_hang() {
        let table = compile_merge("PROC STORCLAS WHEN SET &STORCLAS = 'X' END");
        assert_eq!(table.rules.len(), 1);
        assert_eq!(table.anomalies.len(), 1);
    }

    #[test]
    fn test_sequence_numbers_ignore_nesting() {
        let source = "\
PROC STORCLAS
SET &STORCLAS = 'A'
IF &X = 1 THEN DO
  IF &Y = 2 THEN SET &STORCLAS = 'B'
  SET &STORCLAS = 'C'
END
SET &STORCLAS = 'D'
END
";
        let table = compile_merge(source);
        let sequences: Vec<u32> = table.rules.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        let lines: Vec<usize> = table.rules.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 4, 5, 7]);
    }

    #[test]
    fn test_proc_with_label_and_sigil() {
        let table = compile_merge("PROC 1 &STORGRP SET &STORGRP = 'POOL1' END");
        assert_eq!(table.routine, Some(RoutineKind::StorageGroup));
    }

    #[test]
    fn test_invalid_proc_is_fatal() {
        let err = compile("PROC STORAGE", CombineMode::Merge).unwrap_err();
        assert!(matches!(err, AcsError::InvalidRoutine { .. }));
    }

    #[test]
    fn test_set_target_mismatch_is_fatal() {
        let err = compile("PROC STORCLAS\nSET &MGMTCLAS = 'X'", CombineMode::Merge).unwrap_err();
        match err {
            AcsError::TargetMismatch { found, routine, line } => {
                assert_eq!(found, "&MGMTCLAS");
                assert_eq!(routine, "STORCLAS");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_set_invalid_target_is_fatal() {
        let err = compile("PROC STORCLAS SET &DSN = 'X'", CombineMode::Merge).unwrap_err();
        assert!(matches!(err, AcsError::InvalidTarget { .. }));
        let err = compile("PROC STORCLAS SET STORCLAS = 'X'", CombineMode::Merge).unwrap_err();
        assert!(matches!(err, AcsError::InvalidTarget { .. }));
    }

    #[test]
    fn test_set_accepts_eq_and_rejects_other_operators() {
        let table = compile_merge("PROC STORCLAS SET &STORCLAS EQ 'X' END");
        assert_eq!(table.rules[0].target, "'X'");
        let err = compile("PROC STORCLAS SET &STORCLAS > 'X'", CombineMode::Merge).unwrap_err();
        assert!(matches!(err, AcsError::MissingToken { expected: "= or EQ", .. }));
    }

    #[test]
    fn test_missing_then_is_fatal() {
        let err = compile("PROC STORCLAS\nIF &A = 1\nSET &STORCLAS = 'X'", CombineMode::Merge)
            .unwrap_err();
        assert!(matches!(err, AcsError::MissingToken { expected: "THEN after IF", line: 3, .. }));
    }

    #[test]
    fn test_select_subject_must_be_variable() {
        let err = compile("SELECT (DEPT) WHEN ('A') SET &STORCLAS = 'X' END", CombineMode::Merge)
            .unwrap_err();
        match err {
            AcsError::InvalidSelect { found, .. } => assert_eq!(found, "DEPT"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_when_without_paren_is_fatal() {
        let err = compile("SELECT (&DEPT) WHEN 'A' SET &STORCLAS = 'X' END", CombineMode::Merge)
            .unwrap_err();
        assert!(matches!(err, AcsError::MissingToken { expected: "( after WHEN", .. }));
    }

    #[test]
    fn test_distribute_mode_expands_rows() {
        let source = "\
PROC STORCLAS
IF &A = 1 | &A = 2 THEN
  IF &B = 3 | &B = 4 THEN SET &STORCLAS = 'X'
END
";
        let merged = compile(source, CombineMode::Merge).unwrap();
        let distributed = compile(source, CombineMode::Distribute).unwrap();
        assert_eq!(merged.rules[0].alternatives.len(), 2);
        assert_eq!(distributed.rules[0].alternatives.len(), 4);
        assert_eq!(
            distributed.rules[0].alternatives[0],
            cond(&[("&A", Comparator::Eq, "1"), ("&B", Comparator::Eq, "3")])
        );
    }

    #[test]
    fn test_sequence_number_columns_are_ignored() {
        let source = "PROC STORCLAS                                                           00010000\n\
                      SET &STORCLAS = 'X'                                                     00020000\n\
                      END                                                                     00030000\n";
        let table = compile_merge(source);
        assert_eq!(table.rules.len(), 1);
        assert!(table.anomalies.is_empty());
    }
}
