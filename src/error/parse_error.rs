use thiserror::Error;

/// The two classes hosts distinguish parse failures by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorClass {
    /// Malformed input.
    Syntax,
    /// An identifier absent from the registry while free unknowns are
    /// disabled.
    UnknownIdentifier,
}

/// Represents all errors that can occur while parsing an expression.
///
/// Positions are byte offsets into the canonical (normalized) input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token appeared where the grammar does not allow it.
    #[error("Unexpected {token} at position {position}.")]
    UnexpectedToken {
        /// A description of the token.
        token:    String,
        /// Byte offset of the token.
        position: usize,
    },
    /// The input ended in the middle of an expression.
    #[error("Unexpected end of expression.")]
    UnexpectedEnd,
    /// A `(` without `)` or the other way round.
    #[error("Unbalanced parenthesis at position {position}.")]
    UnbalancedParenthesis {
        /// Byte offset of the offending parenthesis.
        position: usize,
    },
    /// A numeric literal that cannot be represented.
    #[error("Invalid number \"{text}\" at position {position}.")]
    InvalidNumber {
        /// The literal as typed.
        text:     String,
        /// Byte offset of the literal.
        position: usize,
    },
    /// An identifier that is not in the registry.
    #[error("Unknown identifier \"{name}\" at position {position}.")]
    UnknownIdentifier {
        /// The identifier as typed.
        name:     String,
        /// Byte offset of the identifier.
        position: usize,
    },
    /// A variable or unit applied to an argument list.
    #[error("\"{name}\" is not a function (position {position}).")]
    NotAFunction {
        /// The symbol that was called.
        name:     String,
        /// Byte offset of the symbol.
        position: usize,
    },
    /// A function name with nothing to apply it to.
    #[error("Function \"{name}\" is missing its arguments (position {position}).")]
    MissingArguments {
        /// The function name.
        name:     String,
        /// Byte offset of the function name.
        position: usize,
    },
    /// Nothing to parse.
    #[error("Empty expression.")]
    Empty,
}

impl ParseError {
    /// Classifies the error for hosts that only distinguish syntax errors
    /// from unknown identifiers.
    ///
    /// # Example
    /// ```
    /// use reckon::error::{ParseError, ParseErrorClass};
    ///
    /// let error = ParseError::UnknownIdentifier { name:     "foo".to_string(),
    ///                                             position: 0, };
    /// assert_eq!(error.class(), ParseErrorClass::UnknownIdentifier);
    /// assert_eq!(ParseError::Empty.class(), ParseErrorClass::Syntax);
    /// ```
    #[must_use]
    pub const fn class(&self) -> ParseErrorClass {
        match self {
            Self::UnknownIdentifier { .. } => ParseErrorClass::UnknownIdentifier,
            _ => ParseErrorClass::Syntax,
        }
    }
}
