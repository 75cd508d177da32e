/// The locale module rewrites localized input into canonical syntax.
///
/// Decimal and argument separators, digit grouping, Unicode operator
/// spellings and localized keywords are translated before the lexer runs.
pub mod locale;
/// The lexer module tokenizes canonical input for further parsing.
///
/// The lexer (tokenizer) reads the canonical text and produces a stream of
/// tokens, each corresponding to a number, an identifier, an operator or a
/// delimiter. Every token keeps its byte span so the parser can tell touching
/// tokens from separated ones.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source spans.
/// - Converts numeric literals into exact rationals.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the structure of the expression. Identifiers are
/// resolved against the symbol registry while parsing.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Applies the implicit multiplication policy.
/// - Validates grammar, reporting errors with their byte offset.
pub mod parser;
/// The evaluator module simplifies expressions into result trees.
///
/// The evaluator folds constants exactly, combines like terms and factors,
/// applies built-in functions and approximates irrational results when the
/// options ask for it. Work is bounded by a cooperative time budget.
///
/// # Responsibilities
/// - Exact rational arithmetic with symbolic fallbacks.
/// - Reports non-fatal anomalies such as division by zero as warnings.
/// - Fails on structural errors such as a wrong argument count.
pub mod evaluator;
/// The value module defines the data the evaluator produces.
///
/// Numbers (exact, approximate, interval), result tree nodes and the
/// complete evaluation outcome.
pub mod value;
/// The format module renders expressions and results as text.
///
/// Output is plain text or HTML, with Unicode or ASCII operator signs and
/// configurable number bases, grouping and precision.
pub mod format;
