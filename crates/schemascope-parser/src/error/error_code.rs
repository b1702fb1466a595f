//! Error codes for the SDL diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Elaboration errors
//! - `E3xx` - Name resolution errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string or block string was opened but never closed.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that cannot start any SDL token.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are `\"`, `\\`, `\/`, `\b`, `\f`, `\n`, `\r`, `\t`
    /// and `\uXXXX`.
    E003,

    /// Invalid unicode escape.
    ///
    /// A `\u` escape must be followed by exactly four hexadecimal digits
    /// naming a valid codepoint.
    E004,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Incomplete input.
    ///
    /// The input ended before a complete definition was parsed.
    E101,

    /// Unknown definition keyword.
    ///
    /// Only type system definitions (`type`, `interface`, `input`, `enum`,
    /// `scalar`, `union`, `directive`, `schema`) and their extensions are
    /// allowed in a schema document.
    E102,

    // =========================================================================
    // Elaboration Errors (E2xx)
    // =========================================================================
    /// Duplicate type definition.
    E200,

    /// Extension of an undefined type.
    E201,

    /// Extension kind mismatch.
    ///
    /// `extend interface Foo` was applied to a `Foo` that is not an interface.
    E202,

    /// Duplicate field.
    ///
    /// The same field name appears twice in one type, possibly through an
    /// extension.
    E203,

    /// Duplicate schema definition.
    E204,

    // =========================================================================
    // Name Resolution Errors (E3xx)
    // =========================================================================
    /// Undefined type reference.
    ///
    /// A field, argument, interface or union member names a type that is
    /// neither built in nor defined. Reported as a warning.
    E300,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "invalid unicode escape",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "unknown definition",
            ErrorCode::E200 => "duplicate type definition",
            ErrorCode::E201 => "extension of undefined type",
            ErrorCode::E202 => "extension kind mismatch",
            ErrorCode::E203 => "duplicate field",
            ErrorCode::E204 => "duplicate schema definition",
            ErrorCode::E300 => "undefined type",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
