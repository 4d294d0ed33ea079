//! ACS routine tokenizer

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Columns 73-80 of card-image source hold an eight digit sequence number
static SEQUENCE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("valid regex"));

/// All-digit word, used for PROC labels
static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

/// Lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Keyword, variable, mask or number, uppercased
    Word(String),
    /// Quoted literal, uppercased, without the quotes
    Literal(String),
    /// Any other single character
    Punct(char),
    /// End of input; repeats once reached
    End,
}

impl Token {
    /// True if this is the given word
    #[inline]
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w == word)
    }

    /// True if this is the given punctuation character
    #[inline]
    pub fn is_punct(&self, c: char) -> bool {
        matches!(self, Token::Punct(p) if *p == c)
    }

    /// True for a read/write or read-only variable such as `&DSN`
    #[inline]
    pub fn is_variable(&self) -> bool {
        matches!(self, Token::Word(w) if is_variable(w))
    }

    /// True for a quoted literal
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Literal(_))
    }

    /// True for a word made only of digits
    pub fn is_number(&self) -> bool {
        matches!(self, Token::Word(w) if NUMERIC.is_match(w))
    }

    /// Source-like text of the token; literals keep their quotes
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => f.write_str(w),
            Token::Literal(l) => write!(f, "'{}'", l),
            Token::Punct(c) => write!(f, "{}", c),
            Token::End => f.write_str("EOF"),
        }
    }
}

/// True if the text names a variable (starts with the `&` sigil)
#[inline]
pub fn is_variable(text: &str) -> bool {
    text.starts_with('&')
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '&' | '%' | '*' | '.')
}

#[inline]
fn is_whitespace(c: char) -> bool {
    // '+' and '-' carry no meaning in ACS expressions, ';' separates statements
    matches!(c, '\u{09}'..='\u{20}' | '+' | '-' | ';')
}

/// Tokenizer over a whole routine held in memory
///
/// `next_token` never fails: anything that is not whitespace, a comment, a
/// word or a literal comes back as a one-character [`Token::Punct`].
pub struct Tokenizer<'s> {
    chars: Peekable<Chars<'s>>,
    line: usize,
    pending: Option<Token>,
    exhausted: bool,
}

impl<'s> Tokenizer<'s> {
    /// Create a tokenizer positioned at the start of `source`
    pub fn new(source: &'s str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            pending: None,
            exhausted: false,
        }
    }

    /// Current source line (1-based)
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// True once [`Token::End`] has been handed out
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Return a token so the next call to `next_token` yields it again
    ///
    /// Only one token may be pending at a time.
    ///
    /// # Panics
    ///
    /// Panics if a token is already pending.
    pub fn push_back(&mut self, token: Token) {
        assert!(
            self.pending.is_none(),
            "push_back called twice without an intervening read"
        );
        self.pending = Some(token);
    }

    /// Read the next token
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pending.take() {
            return token;
        }
        loop {
            let token = self.scan();
            match &token {
                Token::Word(w) if SEQUENCE_NUMBER.is_match(w) => continue,
                Token::End => self.exhausted = true,
                _ => {}
            }
            return token;
        }
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn scan(&mut self) -> Token {
        while let Some(&c) = self.chars.peek() {
            if is_whitespace(c) {
                self.bump();
                continue;
            }
            if c == '/' {
                self.bump();
                if self.chars.peek() == Some(&'*') {
                    self.bump();
                    self.skip_comment();
                    continue;
                }
                return Token::Punct('/');
            }
            if c == '\'' {
                self.bump();
                return self.scan_literal();
            }
            if is_word_char(c) {
                return self.scan_word();
            }
            self.bump();
            return Token::Punct(c);
        }
        Token::End
    }

    fn skip_comment(&mut self) {
        let mut star = false;
        while let Some(c) = self.bump() {
            if star && c == '/' {
                return;
            }
            star = c == '*';
        }
    }

    fn scan_literal(&mut self) -> Token {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                // Unterminated literals stop at the end of the line
                break;
            }
            self.bump();
            if c == '\'' {
                break;
            }
            text.push(c);
        }
        Token::Literal(text.to_uppercase())
    }

    fn scan_word(&mut self) -> Token {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_word_char(c) {
                break;
            }
            self.bump();
            text.push(c);
        }
        Token::Word(text.to_uppercase())
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.next_token() {
            Token::End => None,
            token => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &str) -> Vec<Token> {
        Tokenizer::new(source).collect()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_words_are_uppercased() {
        assert_eq!(
            collect("proc storclas"),
            vec![word("PROC"), word("STORCLAS")]
        );
    }

    #[test]
    fn test_variables_masks_and_numbers_are_words() {
        assert_eq!(
            collect("&DSN = SYS1.** 1000 %ABC_1"),
            vec![
                word("&DSN"),
                Token::Punct('='),
                word("SYS1.**"),
                word("1000"),
                word("%ABC_1"),
            ]
        );
    }

    #[test]
    fn test_literal_keeps_quotes_in_text() {
        let tokens = collect("SET &STORCLAS = 'fast'");
        assert_eq!(tokens[3], Token::Literal("FAST".to_string()));
        assert_eq!(tokens[3].text(), "'FAST'");
    }

    #[test]
    fn test_unterminated_literal_stops_at_newline() {
        let tokens = collect("'ABC\nDEF");
        assert_eq!(tokens, vec![Token::Literal("ABC".to_string()), word("DEF")]);
    }

    #[test]
    fn test_comments_are_skipped_and_lines_counted() {
        let mut tokenizer = Tokenizer::new("/* one\n two */ IF\nTHEN");
        assert_eq!(tokenizer.next_token(), word("IF"));
        assert_eq!(tokenizer.line(), 2);
        assert_eq!(tokenizer.next_token(), word("THEN"));
        assert_eq!(tokenizer.line(), 3);
    }

    #[test]
    fn test_lone_slash_is_punctuation() {
        assert_eq!(collect("A / B"), vec![word("A"), Token::Punct('/'), word("B")]);
    }

    #[test]
    fn test_plus_minus_semicolon_are_whitespace() {
        assert_eq!(collect("A+B-C;D"), vec![word("A"), word("B"), word("C"), word("D")]);
    }

    #[test]
    fn test_sequence_numbers_are_discarded() {
        assert_eq!(
            collect("IF 00010000\nTHEN 1234567 12345678"),
            vec![word("IF"), word("THEN"), word("1234567")]
        );
    }

    #[test]
    fn test_operators_are_single_characters() {
        assert_eq!(
            collect(">=¬=|"),
            vec![
                Token::Punct('>'),
                Token::Punct('='),
                Token::Punct('¬'),
                Token::Punct('='),
                Token::Punct('|'),
            ]
        );
    }

    #[test]
    fn test_double_ampersand_is_a_word() {
        assert_eq!(collect("&&"), vec![word("&&")]);
    }

    #[test]
    fn test_push_back_returns_same_token() {
        let mut tokenizer = Tokenizer::new("A B");
        let first = tokenizer.next_token();
        tokenizer.push_back(first.clone());
        assert_eq!(tokenizer.next_token(), first);
        assert_eq!(tokenizer.next_token(), word("B"));
    }

    #[test]
    #[should_panic(expected = "push_back called twice")]
    fn test_double_push_back_panics() {
        let mut tokenizer = Tokenizer::new("A B");
        let first = tokenizer.next_token();
        let second = tokenizer.next_token();
        tokenizer.push_back(second);
        tokenizer.push_back(first);
    }

    #[test]
    fn test_end_repeats() {
        let mut tokenizer = Tokenizer::new("A");
        assert_eq!(tokenizer.next_token(), word("A"));
        assert!(!tokenizer.is_exhausted());
        assert_eq!(tokenizer.next_token(), Token::End);
        assert_eq!(tokenizer.next_token(), Token::End);
        assert!(tokenizer.is_exhausted());
    }

    #[test]
    fn test_token_predicates() {
        assert!(word("&DSN").is_variable());
        assert!(!word("DSN").is_variable());
        assert!(word("42").is_number());
        assert!(!word("4A").is_number());
        assert!(Token::Literal("X".to_string()).is_literal());
        assert!(Token::Punct('(').is_punct('('));
        assert!(word("THEN").is_word("THEN"));
    }
}
