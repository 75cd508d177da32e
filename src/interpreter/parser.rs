/// Core parsing entry points.
///
/// Defines the `Parser` state, the `parse` entry point and the top-level
/// expression rule.
pub mod core;

/// Binary operator parsing.
///
/// Handles comparisons, uncertainties, additive and multiplicative levels,
/// including the implicit multiplication policy.
pub mod binary;

/// Unary, power, postfix and primary parsing.
///
/// Includes identifier resolution against the symbol registry and function
/// application with or without parentheses.
pub mod unary;

/// Utility functions for the parser.
///
/// Token peeking, adjacency checks, comma-separated lists and the splitting
/// of unresolved identifiers into known symbols.
pub mod utils;
