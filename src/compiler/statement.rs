//! Statement keywords

use crate::token::Token;

/// Statement keywords the compiler dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Proc,
    Filtlist,
    Set,
    Do,
    If,
    Select,
    Exit,
    Write,
    End,
    When,
    Otherwise,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "PROC" => Some(Keyword::Proc),
            "FILTLIST" => Some(Keyword::Filtlist),
            "SET" => Some(Keyword::Set),
            "DO" => Some(Keyword::Do),
            "IF" => Some(Keyword::If),
            "SELECT" => Some(Keyword::Select),
            "EXIT" => Some(Keyword::Exit),
            "WRITE" => Some(Keyword::Write),
            "END" => Some(Keyword::End),
            "WHEN" => Some(Keyword::When),
            "OTHERWISE" => Some(Keyword::Otherwise),
            _ => None,
        }
    }

    /// Keyword for a token, if it is a keyword word
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Word(word) => Self::from_word(word),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Proc => "PROC",
            Keyword::Filtlist => "FILTLIST",
            Keyword::Set => "SET",
            Keyword::Do => "DO",
            Keyword::If => "IF",
            Keyword::Select => "SELECT",
            Keyword::Exit => "EXIT",
            Keyword::Write => "WRITE",
            Keyword::End => "END",
            Keyword::When => "WHEN",
            Keyword::Otherwise => "OTHERWISE",
        }
    }
}

/// What the block driver does after a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading statements
    Continue,
    /// The enclosing block is finished
    Stop,
}
