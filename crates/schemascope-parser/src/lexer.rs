//! Lexical analyzer for SDL source text.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.
//! Whitespace, commas, byte order marks and `#` comments are skipped.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{AsChar, LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

const BLOCK_QUOTE: &str = "\"\"\"";

/// Parse the `uXXXX` part of a unicode escape (after the backslash).
fn string_escape_unicode(input: &mut Input<'_>, escape_start: usize) -> IResult<char> {
    preceded(
        'u',
        cut_err(
            take_while(4, AsChar::is_hex_digit)
                .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)),
        )
        .context(LexerDiagnostic {
            code: ErrorCode::E004,
            message: "invalid unicode escape",
            help: Some("use `\\uXXXX` with exactly four hex digits naming a valid codepoint"),
            start: escape_start,
        }),
    )
    .parse_next(input)
}

/// Parse a single-character escape after the backslash.
fn string_escape_char(input: &mut Input<'_>) -> IResult<char> {
    one_of(['"', '\\', '/', 'b', 'f', 'n', 'r', 't'])
        .map(|c| match c {
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            other => other,
        })
        .parse_next(input)
}

/// Parse an escape sequence starting with a backslash.
fn string_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();
    preceded('\\', |input: &mut Input<'_>| escape_body(input, escape_start)).parse_next(input)
}

/// Parse the part of an escape sequence after the backslash.
fn escape_body(input: &mut Input<'_>, escape_start: usize) -> IResult<char> {
    match string_escape_unicode(input, escape_start) {
        Ok(ch) => return Ok(ch),
        Err(ErrMode::Backtrack(_)) => {}
        Err(e) => return Err(e),
    }

    if let Ok(ch) = string_escape_char(input) {
        return Ok(ch);
    }

    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        LexerDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some("valid escapes: `\\\"`, `\\\\`, `\\/`, `\\b`, `\\f`, `\\n`, `\\r`, `\\t`, `\\uXXXX`"),
            start: escape_start,
        },
    )))
}

/// Parse a single-line `"..."` string.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let string_char = none_of(['"', '\\', '\n', '\r']);
    let string_content =
        repeat(0.., alt((string_escape, string_char))).fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        });

    let start_pos = input.current_token_start();

    preceded(
        '"',
        cut_err(terminated(string_content, '"')).context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add a closing `\"` before the end of the line"),
            start: start_pos,
        }),
    )
    .map(Token::String)
    .parse_next(input)
}

/// Finds the byte offset of the closing `"""`, skipping escaped `\"""`.
fn find_block_end(rest: &str) -> Option<usize> {
    let mut offset = 0;
    while offset < rest.len() {
        let tail = &rest[offset..];
        if tail.starts_with("\\\"\"\"") {
            offset += 4;
        } else if tail.starts_with(BLOCK_QUOTE) {
            return Some(offset);
        } else {
            offset += tail.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

/// Parse the raw body of a block string up to, not including, the closing quotes.
fn block_string_body<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    let rest = input.peek_slice(input.eof_offset());
    match find_block_end(rest) {
        Some(offset) => Ok(input.next_slice(offset)),
        None => Err(ErrMode::Backtrack(ContextError::new())),
    }
}

/// Parse a `"""..."""` block string.
fn block_string<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    preceded(
        literal(BLOCK_QUOTE),
        cut_err(terminated(block_string_body, literal(BLOCK_QUOTE))).context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated block string",
            help: Some("add a closing `\"\"\"`"),
            start: start_pos,
        }),
    )
    .map(|raw: &str| Token::BlockString(block_string_value(&raw.replace("\\\"\"\"", BLOCK_QUOTE))))
    .parse_next(input)
}

/// Dedents a raw block string and strips leading and trailing blank lines.
pub(crate) fn block_string_value(raw: &str) -> String {
    let lines: Vec<&str> = raw.split("\r\n").flat_map(|l| l.split(['\n', '\r'])).collect();

    let indent_of = |line: &str| line.len() - line.trim_start_matches([' ', '\t']).len();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_matches([' ', '\t']).is_empty())
        .map(|line| indent_of(*line))
        .min()
        .unwrap_or(0);

    let dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                *line
            } else if indent_of(*line) >= common_indent {
                &line[common_indent..]
            } else {
                line.trim_start_matches([' ', '\t'])
            }
        })
        .collect();

    let is_blank = |line: &&str| line.trim_matches([' ', '\t']).is_empty();
    let first = dedented.iter().position(|l| !is_blank(l));
    let last = dedented.iter().rposition(|l| !is_blank(l));
    match (first, last) {
        (Some(first), Some(last)) => dedented[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Parse an int or float literal.
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        opt('-'),
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
        opt((
            one_of(['e', 'E']),
            opt(one_of(['+', '-'])),
            take_while(1.., |c: char| c.is_ascii_digit()),
        )),
        peek(not(one_of(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'))),
    )
        .take()
        .map(Token::Number)
        .parse_next(input)
}

/// Parse a name: `[_A-Za-z][_0-9A-Za-z]*`.
fn name<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .map(Token::Name)
        .parse_next(input)
}

/// Parse punctuation tokens.
fn punctuator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        ':'.value(Token::Colon),
        '!'.value(Token::Bang),
        '='.value(Token::Equals),
        '@'.value(Token::At),
        '&'.value(Token::Amp),
        '|'.value(Token::Pipe),
    ))
    .parse_next(input)
}

/// Parse insignificant input: whitespace, commas, BOM and comments.
fn ignored(input: &mut Input<'_>) -> IResult<()> {
    alt((
        take_while(1.., |c: char| c.is_whitespace() || c == ',' || c == '\u{FEFF}').void(),
        ('#', take_while(0.., |c: char| c != '\n' && c != '\r')).void(),
    ))
    .parse_next(input)
}

/// Parse a single token with position tracking; `None` for ignored input.
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<Option<PositionedToken<'a>>> {
    if ignored(input).is_ok() {
        return Ok(None);
    }

    let start_pos = input.current_token_start();

    let token = alt((
        block_string,   // Must come before string_literal
        string_literal, // Must come before punctuation
        number,
        name,
        punctuator,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(Some(PositionedToken::new(token, Span::new(start_pos..end_pos))))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(Some(token)) => self.tokens.push(token),
                Ok(None) => {}
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));

                    // Skip the rest of the line so an unterminated string does not
                    // cascade into a diagnostic per character.
                    let rest = input.peek_slice(input.eof_offset());
                    let skip = rest.find('\n').map_or(rest.len(), |i| i + 1);
                    input.next_slice(skip.max(1));
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|_| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 (unexpected character) when no context is attached.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenize SDL source, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(tokens)` - all significant tokens, in source order
/// - `Err(ParseError)` - one or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}
