/// Rendering of expression and result trees.
///
/// Defines the `Formatter`, which walks a tree and places parentheses by
/// precedence, operator signs and separators.
pub mod core;

/// Number layout.
///
/// Integers, positional expansions in any base from 2 to 36, fractions and
/// scientific notation, with digit grouping and base prefixes.
pub mod number;

/// Output markup flavours.
///
/// Plain text and HTML spell exponents, fractions, roots and symbols
/// differently; both implement `MarkupStyle`.
pub mod markup;
