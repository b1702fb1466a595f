//! Token definitions for the SDL lexer.

use std::fmt;

use crate::span::Span;

/// A lexical token of the GraphQL schema definition language.
///
/// Commas, whitespace and `#` comments are insignificant in SDL and never
/// reach the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Name(&'a str),
    /// An int or float literal, kept as written.
    Number(&'a str),
    /// A `"..."` string with escapes resolved.
    String(String),
    /// A `"""..."""` block string, dedented.
    BlockString(String),

    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Colon,
    Bang,
    Equals,
    At,
    Amp,
    Pipe,
}

impl Token<'_> {
    /// Returns true if this token is the name `keyword`.
    pub fn is_name(&self, keyword: &str) -> bool {
        matches!(self, Token::Name(name) if *name == keyword)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(name) => write!(f, "`{name}`"),
            Token::Number(number) => write!(f, "number `{number}`"),
            Token::String(_) => write!(f, "string"),
            Token::BlockString(_) => write!(f, "block string"),
            Token::LeftBrace => write!(f, "`{{`"),
            Token::RightBrace => write!(f, "`}}`"),
            Token::LeftParen => write!(f, "`(`"),
            Token::RightParen => write!(f, "`)`"),
            Token::LeftBracket => write!(f, "`[`"),
            Token::RightBracket => write!(f, "`]`"),
            Token::Colon => write!(f, "`:`"),
            Token::Bang => write!(f, "`!`"),
            Token::Equals => write!(f, "`=`"),
            Token::At => write!(f, "`@`"),
            Token::Amp => write!(f, "`&`"),
            Token::Pipe => write!(f, "`|`"),
        }
    }
}

/// A token together with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'a> {
    pub token: Token<'a>,
    pub span: Span,
}

impl<'a> PositionedToken<'a> {
    pub fn new(token: Token<'a>, span: Span) -> Self {
        Self { token, span }
    }
}
